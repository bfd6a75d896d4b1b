// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./quire.toml` > `~/.config/quire/quire.toml` > `/etc/quire/quire.toml`
//! with environment variable overrides via `QUIRE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QuireConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/quire/quire.toml` (system-wide)
/// 3. `~/.config/quire/quire.toml` (user XDG config)
/// 4. `./quire.toml` (local directory)
/// 5. `QUIRE_*` environment variables
pub fn load_config() -> Result<QuireConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<QuireConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuireConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuireConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuireConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(QuireConfig::default()))
        .merge(Toml::file("/etc/quire/quire.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("quire/quire.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("quire.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")`: `QUIRE_VAULT_KDF_ITERATIONS` must map to
/// `vault.kdf_iterations`, not `vault.kdf.iterations`.
///
/// `QUIRE_TOKEN` is read by the CLI directly and is not a config key.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("QUIRE_")
        .ignore(&["token"])
        .map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env var name to its dotted config path.
///
/// Figment passes the name through in its original case, so it is lowercased here.
pub(crate) fn map_env_key(key: &str) -> String {
    key.to_ascii_lowercase()
        .replacen("general_", "general.", 1)
        .replacen("storage_", "storage.", 1)
        .replacen("vault_", "vault.", 1)
        .replacen("environment_", "environment.", 1)
}
