// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM record encryption.
//!
//! A record is `base64(nonce ‖ ciphertext ‖ tag)`. Every call to
//! [`AuthenticatedCipher::encrypt`] draws a fresh random 96-bit nonce from the
//! system CSPRNG. Nonce reuse would be catastrophic for GCM security.
//!
//! Decryption fails closed: any malformed, truncated, tampered or foreign
//! record yields `None`. The reason is only visible in the logs.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quire_core::QuireError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretString;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// A base64-encoded AEAD record as it sits in a persistence surface.
///
/// The empty record means "nothing stored".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EncryptedRecord(String);

impl EncryptedRecord {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for EncryptedRecord {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for EncryptedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedRecord({} chars)", self.0.len())
    }
}

/// AES-256-GCM bound to one derived key.
///
/// Construction fails if the provider rejects the key; there is no fallback
/// to a weaker encoding.
pub struct AuthenticatedCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl fmt::Debug for AuthenticatedCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl AuthenticatedCipher {
    pub fn new(key: &[u8; 32]) -> Result<Self, QuireError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| QuireError::Crypto("AES-256-GCM rejected the derived key".to_string()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt a plaintext into a record.
    ///
    /// Empty input short-circuits to [`EncryptedRecord::empty`] without
    /// consuming randomness.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedRecord, QuireError> {
        if plaintext.is_empty() {
            return Ok(EncryptedRecord::empty());
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| QuireError::Crypto("system RNG failed to produce a nonce".to_string()))?;

        let mut in_out = Zeroizing::new(plaintext.as_bytes().to_vec());
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut *in_out,
            )
            .map_err(|_| QuireError::Crypto("AES-256-GCM encryption failed".to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + in_out.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&in_out);
        Ok(EncryptedRecord(STANDARD.encode(blob)))
    }

    /// Decrypt a record. Every failure is `None`.
    pub fn decrypt(&self, record: &EncryptedRecord) -> Option<SecretString> {
        if record.is_empty() {
            debug!("empty record treated as absent");
            return None;
        }

        let blob = match STANDARD.decode(record.as_str()) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "encrypted record is not valid base64");
                return None;
            }
        };

        if blob.len() < NONCE_LEN + TAG_LEN {
            warn!(len = blob.len(), "encrypted record is truncated");
            return None;
        }

        let (nonce_bytes, sealed) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes).ok()?;
        let mut in_out = Zeroizing::new(sealed.to_vec());
        let plaintext = match self.key.open_in_place(nonce, Aad::empty(), &mut in_out[..]) {
            Ok(plaintext) => plaintext,
            Err(_) => {
                warn!("encrypted record failed authentication (foreign device or tampered)");
                return None;
            }
        };

        match std::str::from_utf8(plaintext) {
            Ok(text) => Some(SecretString::from(text.to_owned())),
            Err(_) => {
                warn!("decrypted record is not valid UTF-8");
                None
            }
        }
    }
}
