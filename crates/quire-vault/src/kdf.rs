// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the device fingerprint.
//!
//! The derived key is never persisted. It is recomputed from the fingerprint
//! for every operation and wrapped in [`Zeroizing`] so it is wiped on drop.

use std::num::NonZeroU32;

use quire_config::model::VaultConfig;
use quire_core::QuireError;
use ring::pbkdf2;
use zeroize::Zeroizing;

use crate::fingerprint::DeviceFingerprint;

/// Fixed application salt. Changing it orphans every stored record.
pub const APPLICATION_SALT: &[u8] = b"quire-credential-vault:v1";

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Length of the derived key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Key derivation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl From<&VaultConfig> for KdfParams {
    fn from(config: &VaultConfig) -> Self {
        Self {
            iterations: config.kdf_iterations,
        }
    }
}

/// Derive the 256-bit record key for a fingerprint.
///
/// Deterministic: the same fingerprint and parameters always give the same key.
/// Zero iterations means the deployment is misconfigured and is fatal.
pub fn derive_key(
    fingerprint: &DeviceFingerprint,
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, QuireError> {
    derive_with_salt(fingerprint.as_str().as_bytes(), APPLICATION_SALT, params.iterations)
}

/// Derive on tokio's blocking pool so the runtime is not stalled.
pub async fn derive_key_async(
    fingerprint: DeviceFingerprint,
    params: KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, QuireError> {
    tokio::task::spawn_blocking(move || derive_key(&fingerprint, &params))
        .await
        .map_err(|e| QuireError::Crypto(format!("key derivation task failed: {e}")))?
}

fn derive_with_salt(
    secret: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, QuireError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| QuireError::Crypto("PBKDF2 iteration count must be non-zero".to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        secret,
        &mut key[..],
    );
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Environment;

    const FAST: KdfParams = KdfParams { iterations: 1_000 };

    fn fingerprint(locale: &str) -> DeviceFingerprint {
        Environment {
            locale: Some(locale.to_string()),
            ..Environment::default()
        }
        .fingerprint()
    }

    #[test]
    fn derive_key_is_deterministic() {
        let a = derive_key(&fingerprint("en-US"), &FAST).unwrap();
        let b = derive_key(&fingerprint("en-US"), &FAST).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_fingerprint_gives_different_key() {
        let a = derive_key(&fingerprint("en-US"), &FAST).unwrap();
        let b = derive_key(&fingerprint("de-DE"), &FAST).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn iteration_count_changes_key() {
        let a = derive_key(&fingerprint("en-US"), &FAST).unwrap();
        let b = derive_key(&fingerprint("en-US"), &KdfParams { iterations: 1_001 }).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn zero_iterations_is_fatal() {
        let err = derive_key(&fingerprint("en-US"), &KdfParams { iterations: 0 }).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn matches_rfc7914_vector() {
        // PBKDF2-HMAC-SHA256, P = "passwd", S = "salt", c = 1, first 32 bytes.
        let key = derive_with_salt(b"passwd", b"salt", 1).unwrap();
        let expected: [u8; 32] = [
            0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
            0xb6, 0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b, 0x9d, 0x57,
            0xc2, 0x0d, 0xac, 0xbc,
        ];
        assert_eq!(*key, expected);
    }

    #[test]
    fn params_follow_vault_config() {
        let config = VaultConfig {
            kdf_iterations: 4_242,
        };
        assert_eq!(KdfParams::from(&config).iterations, 4_242);
        assert_eq!(KdfParams::default().iterations, 100_000);
    }

    #[tokio::test]
    async fn async_derivation_matches_sync() {
        let sync = derive_key(&fingerprint("en-GB"), &FAST).unwrap();
        let from_pool = derive_key_async(fingerprint("en-GB"), FAST).await.unwrap();
        assert_eq!(*sync, *from_pool);
    }
}
