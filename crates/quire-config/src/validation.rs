// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints that serde attributes cannot express, such as
//! a minimum KDF work factor and consistent screen geometry overrides.

use crate::diagnostic::ConfigError;
use crate::model::QuireConfig;

/// Lowest PBKDF2 iteration count accepted from configuration.
pub const MIN_KDF_ITERATIONS: u32 = 1_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &QuireConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.general.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "general.log_level `{}` is not one of {}",
            config.general.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        fail(format!(
            "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
            config.vault.kdf_iterations
        ));
    }

    let env = &config.environment;
    match (env.screen_width, env.screen_height) {
        (Some(0), _) | (_, Some(0)) => {
            fail("environment.screen_width and screen_height must be positive".to_string())
        }
        (Some(_), None) | (None, Some(_)) => fail(
            "environment.screen_width and environment.screen_height must be set together"
                .to_string(),
        ),
        _ => {}
    }

    if let Some(locale) = &env.locale
        && (locale.trim().is_empty() || locale.contains('|'))
    {
        fail(format!("environment.locale `{locale}` is not a valid locale tag"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &QuireConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&QuireConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = QuireConfig::default();
        config.storage.database_path = "  ".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("database_path")));
    }

    #[test]
    fn low_kdf_iterations_fail_validation() {
        let mut config = QuireConfig::default();
        config.vault.kdf_iterations = 10;
        assert!(messages(&config).iter().any(|m| m.contains("kdf_iterations")));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = QuireConfig::default();
        config.general.log_level = "loud".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("log_level")));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = QuireConfig::default();
        config.general.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn half_screen_geometry_fails_validation() {
        let mut config = QuireConfig::default();
        config.environment.screen_width = Some(1920);
        assert!(messages(&config).iter().any(|m| m.contains("set together")));
    }

    #[test]
    fn zero_screen_dimension_fails_validation() {
        let mut config = QuireConfig::default();
        config.environment.screen_width = Some(0);
        config.environment.screen_height = Some(1080);
        assert!(messages(&config).iter().any(|m| m.contains("positive")));
    }

    #[test]
    fn locale_with_separator_fails_validation() {
        let mut config = QuireConfig::default();
        config.environment.locale = Some("en|US".to_string());
        assert!(messages(&config).iter().any(|m| m.contains("locale")));
    }

    #[test]
    fn blank_locale_fails_but_tag_passes() {
        let mut config = QuireConfig::default();
        config.environment.locale = Some("   ".to_string());
        assert!(messages(&config).iter().any(|m| m.contains("locale")));

        config.environment.locale = Some("en-US".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = QuireConfig::default();
        config.storage.database_path = String::new();
        config.vault.kdf_iterations = 1;
        config.general.log_level = "noisy".to_string();
        assert_eq!(validate_config(&config).unwrap_err().len(), 3);
    }
}
