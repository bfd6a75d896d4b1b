// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Quire credential subsystem.

use thiserror::Error;

/// The primary error type used across Quire crates.
///
/// Only conditions the caller cannot recover from surface as errors.
/// "No value" and "value could not be decrypted" are reported as `None`
/// by the vault, never through this type.
#[derive(Debug, Error)]
pub enum QuireError {
    /// Configuration errors (invalid TOML, out-of-range KDF parameters).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence surface errors (database failure, quota exceeded, disabled storage).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The cryptographic provider is unusable (RNG failure, key rejected,
    /// derivation task lost). No credential operation can proceed.
    #[error("crypto provider failure: {0}")]
    Crypto(String),

    /// Vault-level errors that are not tied to the provider.
    #[error("vault error: {0}")]
    Vault(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuireError {
    /// Build a storage error from any message.
    pub fn storage(message: impl Into<String>) -> Self {
        QuireError::Storage {
            source: message.into().into(),
        }
    }

    /// Whether this error means the crypto provider is gone.
    pub fn is_fatal(&self) -> bool {
        matches!(self, QuireError::Crypto(_))
    }
}
