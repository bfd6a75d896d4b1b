// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store: keyed CRUD over the session and durable surfaces.
//!
//! Every value goes through [`AuthenticatedCipher`] under a key derived from
//! the current device fingerprint. The key is derived per operation and
//! dropped (zeroized) when the operation ends.
//!
//! Outcomes follow three classes:
//! - absent (`None`): never stored, unreadable, or not decryptable on this device;
//! - write failure (`SaveStatus::WriteFailed` / `false`): the surface refused;
//! - fatal (`Err`): the crypto provider is unusable.

use std::sync::Arc;

use quire_core::{KeyValueStore, QuireError, StorageScope};
use secrecy::SecretString;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

use crate::crypto::{AuthenticatedCipher, EncryptedRecord};
use crate::fingerprint::{DeviceFingerprint, EnvironmentSource};
use crate::kdf::{self, KdfParams};

/// The closed set of credentials Quire knows how to store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CredentialName {
    /// GitHub personal access token used for content commits.
    Github,
    /// Groq API key.
    Groq,
    /// Backend session identifier.
    Session,
}

impl CredentialName {
    /// The one surface this credential lives on.
    pub fn scope(self) -> StorageScope {
        match self {
            CredentialName::Github | CredentialName::Groq => StorageScope::Durable,
            CredentialName::Session => StorageScope::Session,
        }
    }

    /// Physical key on that surface.
    pub fn physical_key(self) -> &'static str {
        match self {
            CredentialName::Github => "quire.durable.github",
            CredentialName::Groq => "quire.durable.groq",
            CredentialName::Session => "quire.session.session_id",
        }
    }
}

/// Result of a save that did not hit a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SaveStatus {
    Saved,
    /// Empty token or unknown name; nothing was written.
    Rejected,
    /// The surface refused the write (quota, disabled storage, I/O).
    WriteFailed,
}

/// Encrypting credential store over two persistence surfaces.
pub struct CredentialStore {
    session: Arc<dyn KeyValueStore>,
    durable: Arc<dyn KeyValueStore>,
    env: Arc<dyn EnvironmentSource>,
    kdf: KdfParams,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("session", &self.session.name())
            .field("durable", &self.durable.name())
            .field("kdf", &self.kdf)
            .finish()
    }
}

impl CredentialStore {
    pub fn new(
        session: Arc<dyn KeyValueStore>,
        durable: Arc<dyn KeyValueStore>,
        env: Arc<dyn EnvironmentSource>,
        kdf: KdfParams,
    ) -> Self {
        Self {
            session,
            durable,
            env,
            kdf,
        }
    }

    /// The surface backing a scope.
    pub fn surface(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Session => self.session.as_ref(),
            StorageScope::Durable => self.durable.as_ref(),
        }
    }

    /// Fingerprint of the environment as it is right now.
    pub fn fingerprint(&self) -> DeviceFingerprint {
        self.env.snapshot().fingerprint()
    }

    async fn cipher(&self) -> Result<AuthenticatedCipher, QuireError> {
        let key = kdf::derive_key_async(self.fingerprint(), self.kdf).await?;
        AuthenticatedCipher::new(&key)
    }

    /// Encrypt and store a token, overwriting any previous value.
    pub async fn save(&self, name: CredentialName, token: &str) -> Result<SaveStatus, QuireError> {
        if token.is_empty() {
            debug!(credential = %name, "refusing to store an empty token");
            return Ok(SaveStatus::Rejected);
        }

        let record = self.cipher().await?.encrypt(token)?;
        let surface = self.surface(name.scope());
        match surface.set(name.physical_key(), record.as_str()).await {
            Ok(()) => {
                debug!(credential = %name, surface = surface.name(), "credential stored");
                Ok(SaveStatus::Saved)
            }
            Err(e) => {
                warn!(credential = %name, surface = surface.name(), error = %e, "credential write failed");
                Ok(SaveStatus::WriteFailed)
            }
        }
    }

    /// Like [`save`](Self::save), but for a textual name. Unknown names are rejected.
    pub async fn save_named(&self, name: &str, token: &str) -> Result<SaveStatus, QuireError> {
        match name.parse::<CredentialName>() {
            Ok(name) => self.save(name, token).await,
            Err(_) => {
                warn!(name, "unknown credential name");
                Ok(SaveStatus::Rejected)
            }
        }
    }

    /// Load and decrypt a token.
    ///
    /// A missing record, a surface read error and a record that does not
    /// decrypt on this device are all `Ok(None)`.
    pub async fn load(&self, name: CredentialName) -> Result<Option<SecretString>, QuireError> {
        let surface = self.surface(name.scope());
        let raw = match surface.get(name.physical_key()).await {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Ok(None),
            Err(e) => {
                warn!(credential = %name, surface = surface.name(), error = %e, "credential read failed");
                return Ok(None);
            }
        };

        let secret = self.cipher().await?.decrypt(&EncryptedRecord::from(raw));
        if secret.is_none() {
            debug!(credential = %name, "stored credential is not readable on this device");
        }
        Ok(secret)
    }

    /// Whether a record exists for `name`, readable or not.
    pub async fn contains(&self, name: CredentialName) -> bool {
        matches!(
            self.surface(name.scope()).get(name.physical_key()).await,
            Ok(Some(raw)) if !raw.is_empty()
        )
    }

    /// Delete a credential. Removing an absent credential succeeds.
    ///
    /// Returns `false` only if the surface refused the delete.
    pub async fn remove(&self, name: CredentialName) -> Result<bool, QuireError> {
        let surface = self.surface(name.scope());
        match surface.delete(name.physical_key()).await {
            Ok(()) => {
                debug!(credential = %name, "credential removed");
                Ok(true)
            }
            Err(e) => {
                warn!(credential = %name, surface = surface.name(), error = %e, "credential delete failed");
                Ok(false)
            }
        }
    }

    /// Delete every known credential from both surfaces.
    pub async fn clear_all(&self) -> Result<bool, QuireError> {
        let mut all_removed = true;
        for name in CredentialName::iter() {
            all_removed &= self.remove(name).await?;
        }
        Ok(all_removed)
    }
}

/// Mask a secret value for display: `"ghp_...wxyz"`.
///
/// Shows the first and last four characters. Values shorter than ten
/// characters are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use quire_storage::MemoryStore;
    use secrecy::ExposeSecret;
    use tracing_test::traced_test;

    use super::*;
    use crate::fingerprint::{Environment, ScreenGeometry};

    const FAST: KdfParams = KdfParams { iterations: 1_000 };

    fn device(width: u32) -> Environment {
        Environment {
            user_agent: Some("test-agent".into()),
            locale: Some("en-US".into()),
            screen: Some(ScreenGeometry {
                width,
                height: 1080,
            }),
            timezone_offset_minutes: Some(60),
            hardware_concurrency: Some(4),
        }
    }

    struct Fixture {
        session: Arc<MemoryStore>,
        durable: Arc<MemoryStore>,
        store: CredentialStore,
    }

    fn fixture_with(durable: MemoryStore) -> Fixture {
        let session = Arc::new(MemoryStore::session());
        let durable = Arc::new(durable);
        let store = CredentialStore::new(
            session.clone(),
            durable.clone(),
            Arc::new(device(1920)),
            FAST,
        );
        Fixture {
            session,
            durable,
            store,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemoryStore::durable())
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(CredentialName::from_str("github").unwrap(), CredentialName::Github);
        assert_eq!(CredentialName::from_str("GROQ").unwrap(), CredentialName::Groq);
        assert_eq!(CredentialName::Session.to_string(), "SESSION");
        assert!(CredentialName::from_str("gitlab").is_err());
    }

    #[test]
    fn physical_keys_carry_their_scope_prefix() {
        for name in CredentialName::iter() {
            assert!(name.physical_key().starts_with(name.scope().key_prefix()));
        }
    }

    #[tokio::test]
    async fn save_then_load_roundtrip() {
        let f = fixture();
        let status = f.store.save(CredentialName::Github, "ghp_abc123").await.unwrap();
        assert_eq!(status, SaveStatus::Saved);

        let loaded = f.store.load(CredentialName::Github).await.unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "ghp_abc123");
    }

    #[tokio::test]
    async fn stored_value_is_not_plaintext() {
        let f = fixture();
        f.store.save(CredentialName::Groq, "gsk_plaintext_check").await.unwrap();
        let raw = f.durable.get("quire.durable.groq").await.unwrap().unwrap();
        assert!(!raw.contains("gsk_"));
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let f = fixture();
        let status = f.store.save(CredentialName::Github, "").await.unwrap();
        assert_eq!(status, SaveStatus::Rejected);
        assert!(f.durable.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_textual_name_is_rejected() {
        let f = fixture();
        let status = f.store.save_named("BITBUCKET", "token").await.unwrap();
        assert_eq!(status, SaveStatus::Rejected);
        let status = f.store.save_named("groq", "gsk_1").await.unwrap();
        assert_eq!(status, SaveStatus::Saved);
    }

    #[tokio::test]
    async fn scopes_do_not_cross() {
        let f = fixture();
        f.store.save(CredentialName::Session, "sess-42").await.unwrap();
        f.store.save(CredentialName::Github, "ghp_abc").await.unwrap();

        assert_eq!(f.session.keys().await, vec!["quire.session.session_id".to_string()]);
        assert_eq!(f.durable.keys().await, vec!["quire.durable.github".to_string()]);
    }

    #[tokio::test]
    async fn missing_credential_loads_as_none() {
        let f = fixture();
        assert!(f.store.load(CredentialName::Groq).await.unwrap().is_none());
        assert!(!f.store.contains(CredentialName::Groq).await);
    }

    #[tokio::test]
    async fn corrupted_record_loads_as_none() {
        let f = fixture();
        f.durable.set("quire.durable.github", "AAAAbogus").await.unwrap();
        assert!(f.store.load(CredentialName::Github).await.unwrap().is_none());
        assert!(f.store.contains(CredentialName::Github).await);
    }

    #[tokio::test]
    async fn foreign_device_record_loads_as_none() {
        let f = fixture();
        f.store.save(CredentialName::Github, "ghp_device_a").await.unwrap();

        let other = CredentialStore::new(
            f.session.clone(),
            f.durable.clone(),
            Arc::new(device(1280)),
            FAST,
        );
        assert!(other.load(CredentialName::Github).await.unwrap().is_none());
    }

    #[tokio::test]
    #[traced_test]
    async fn quota_failure_is_write_failed() {
        let f = fixture_with(MemoryStore::durable().with_quota(8));
        let status = f.store.save(CredentialName::Github, "ghp_abc123").await.unwrap();
        assert_eq!(status, SaveStatus::WriteFailed);
        assert!(logs_contain("credential write failed"));
        assert!(!logs_contain("ghp_abc123"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let f = fixture();
        f.store.save(CredentialName::Groq, "gsk_123").await.unwrap();
        assert!(f.store.remove(CredentialName::Groq).await.unwrap());
        assert!(f.store.remove(CredentialName::Groq).await.unwrap());
        assert!(f.store.load(CredentialName::Groq).await.unwrap().is_none());
        assert!(f.durable.is_empty().await);
    }

    #[tokio::test]
    async fn clear_all_removes_every_credential() {
        let f = fixture();
        f.store.save(CredentialName::Github, "ghp_one").await.unwrap();
        f.store.save(CredentialName::Session, "sess-two").await.unwrap();

        assert!(f.store.clear_all().await.unwrap());
        assert!(f.store.load(CredentialName::Github).await.unwrap().is_none());
        assert!(f.store.load(CredentialName::Session).await.unwrap().is_none());
        assert!(f.store.clear_all().await.unwrap());
    }

    #[tokio::test]
    async fn save_overwrites_previous_value() {
        let f = fixture();
        f.store.save(CredentialName::Github, "ghp_old").await.unwrap();
        f.store.save(CredentialName::Github, "ghp_new").await.unwrap();
        let loaded = f.store.load(CredentialName::Github).await.unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "ghp_new");
        assert_eq!(f.durable.len().await, 1);
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("ghp_abcdefghijklmnop1234"), "ghp_...1234");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_counts_characters() {
        assert_eq!(mask_secret("ééééééééééé"), "éééé...éééé");
    }
}
