// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device-bound credential protection for Quire.
//!
//! Secrets are encrypted with AES-256-GCM under a key derived (PBKDF2-HMAC-SHA256)
//! from a non-secret device fingerprint. The key is recomputed for every
//! operation and never stored. Anyone able to run code as the same user on the
//! same host can rebuild it; the protection is against casual inspection of
//! stored values and against records being readable on another device.
//!
//! [`MigrationPipeline`] moves tokens out of the older plain-text and
//! XOR-obfuscated locations.

pub mod crypto;
pub mod fingerprint;
pub mod kdf;
pub mod legacy;
pub mod migration;
pub mod prompt;
pub mod store;

pub use crypto::{AuthenticatedCipher, EncryptedRecord};
pub use fingerprint::{DeviceFingerprint, Environment, EnvironmentSource, HostEnvironment};
pub use kdf::KdfParams;
pub use migration::{MigrationOutcome, MigrationPipeline, MigrationReport};
pub use prompt::read_token;
pub use store::{CredentialName, CredentialStore, SaveStatus, mask_secret};
