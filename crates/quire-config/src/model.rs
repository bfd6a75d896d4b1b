// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Quire.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Quire configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuireConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Durable storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key derivation settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Overrides for environment attributes that cannot be detected on the host.
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Durable storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database backing the durable surface.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("quire").join("quire.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("quire.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Key derivation configuration.
///
/// Changing `kdf_iterations` changes the derived key, so every record written
/// under the old value becomes unreadable (it loads as absent).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    100_000
}

/// Environment attribute overrides.
///
/// A desktop process has no screen geometry or browser locale of its own;
/// these values stand in for them in the device fingerprint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Locale tag such as `en-US`. Falls back to `LC_ALL` / `LANG`.
    #[serde(default)]
    pub locale: Option<String>,

    /// Screen width in pixels.
    #[serde(default)]
    pub screen_width: Option<u32>,

    /// Screen height in pixels.
    #[serde(default)]
    pub screen_height: Option<u32>,
}
