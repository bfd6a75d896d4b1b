// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Quire.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use quire_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("KDF iterations: {}", config.vault.kdf_iterations);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::QuireConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Figment errors are converted into diagnostics with source spans for
/// whichever config file introduced them.
pub fn load_and_validate() -> Result<QuireConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<QuireConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<QuireConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources([path.to_path_buf()])
    })
}

fn finish(
    loaded: Result<QuireConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<QuireConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(
                database = %config.storage.database_path,
                kdf_iterations = config.vault.kdf_iterations,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join("quire.toml"))
        .unwrap_or_else(|_| PathBuf::from("quire.toml"));
    let user = dirs::config_dir().map(|d| d.join("quire/quire.toml"));
    let system = PathBuf::from("/etc/quire/quire.toml");

    read_sources(std::iter::once(local).chain(user).chain(std::iter::once(system)))
}

fn read_sources(paths: impl IntoIterator<Item = PathBuf>) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
