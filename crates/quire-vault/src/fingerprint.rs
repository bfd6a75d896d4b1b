// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device fingerprint: a stable, non-secret descriptor of the host.
//!
//! The fingerprint is the only input to key derivation. It is a pure function
//! of an [`Environment`] snapshot; nothing is stored, so the same host yields
//! the same fingerprint on every run and a different host yields a different one.

use std::fmt;

use quire_config::model::EnvironmentConfig;

/// Literal used for any attribute the environment cannot provide.
pub const UNKNOWN: &str = "unknown";

/// Maximum number of user-agent characters that enter the fingerprint.
pub const USER_AGENT_LIMIT: usize = 50;

const SEPARATOR: char = '|';

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
}

/// The environment attributes a fingerprint is computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub user_agent: Option<String>,
    pub locale: Option<String>,
    pub screen: Option<ScreenGeometry>,
    /// Minutes east of UTC.
    pub timezone_offset_minutes: Option<i32>,
    pub hardware_concurrency: Option<usize>,
}

impl Environment {
    /// Read the current host, filling gaps from configuration overrides.
    pub fn detect(overrides: &EnvironmentConfig) -> Self {
        let screen = match (overrides.screen_width, overrides.screen_height) {
            (Some(width), Some(height)) => Some(ScreenGeometry { width, height }),
            _ => None,
        };

        Self {
            user_agent: Some(host_user_agent()),
            locale: overrides.locale.clone().or_else(detect_locale),
            screen,
            timezone_offset_minutes: Some(chrono::Local::now().offset().local_minus_utc() / 60),
            hardware_concurrency: std::thread::available_parallelism()
                .ok()
                .map(|n| n.get()),
        }
    }

    /// Compute the fingerprint for this snapshot. Never fails, never empty.
    pub fn fingerprint(&self) -> DeviceFingerprint {
        let user_agent = self
            .user_agent
            .as_deref()
            .filter(|ua| !ua.is_empty())
            .map(|ua| ua.chars().take(USER_AGENT_LIMIT).collect::<String>());
        let locale = self.locale.clone().filter(|l| !l.is_empty());
        let screen = self.screen.map(|s| format!("{}x{}", s.width, s.height));
        let timezone = self.timezone_offset_minutes.map(|m| m.to_string());
        let cores = self.hardware_concurrency.map(|n| n.to_string());

        let parts = [user_agent, locale, screen, timezone, cores];
        let joined = parts
            .iter()
            .map(|part| part.as_deref().unwrap_or(UNKNOWN))
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string());

        DeviceFingerprint(joined)
    }
}

/// `LC_ALL` / `LC_MESSAGES` / `LANG`, normalized from `en_US.UTF-8` to `en-US`.
/// Synthetic user agent for the host. Carries no crate version, so upgrades keep the same key.
fn host_user_agent() -> String {
    format!(
        "quire ({}; {})",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn detect_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| normalize_locale(&value))
}

fn normalize_locale(raw: &str) -> Option<String> {
    let tag = raw.split(['.', '@']).next()?.trim();
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.replace('_', "-"))
}

/// The joined fingerprint string. Not secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceFingerprint(String);

impl DeviceFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies an environment snapshot for every credential operation.
pub trait EnvironmentSource: Send + Sync + 'static {
    fn snapshot(&self) -> Environment;
}

/// A fixed snapshot, used to simulate devices.
impl EnvironmentSource for Environment {
    fn snapshot(&self) -> Environment {
        self.clone()
    }
}

/// Reads the real host on every call.
#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    overrides: EnvironmentConfig,
}

impl HostEnvironment {
    pub fn new(overrides: EnvironmentConfig) -> Self {
        Self { overrides }
    }
}

impl EnvironmentSource for HostEnvironment {
    fn snapshot(&self) -> Environment {
        Environment::detect(&self.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> Environment {
        Environment {
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".into()),
            locale: Some("en-US".into()),
            screen: Some(ScreenGeometry {
                width: 1920,
                height: 1080,
            }),
            timezone_offset_minutes: Some(-300),
            hardware_concurrency: Some(8),
        }
    }

    #[test]
    fn fingerprint_joins_attributes_in_order() {
        let fp = desktop().fingerprint();
        assert_eq!(
            fp.as_str(),
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20|en-US|1920x1080|-300|8"
        );
    }

    #[test]
    fn user_agent_is_truncated_to_fifty_chars() {
        let fp = desktop().fingerprint();
        let ua = fp.as_str().split('|').next().unwrap();
        assert_eq!(ua.chars().count(), USER_AGENT_LIMIT);
    }

    #[test]
    fn missing_attributes_fall_back_to_unknown() {
        let fp = Environment::default().fingerprint();
        assert_eq!(fp.as_str(), "unknown|unknown|unknown|unknown|unknown");
    }

    #[test]
    fn only_missing_concurrency_degrades() {
        let mut env = desktop();
        env.hardware_concurrency = None;
        assert!(env.fingerprint().as_str().ends_with("|-300|unknown"));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(desktop().fingerprint(), desktop().fingerprint());
    }

    #[test]
    fn different_devices_differ() {
        let mut laptop = desktop();
        laptop.screen = Some(ScreenGeometry {
            width: 1440,
            height: 900,
        });
        assert_ne!(desktop().fingerprint(), laptop.fingerprint());
    }

    #[test]
    fn fixed_environment_is_a_source() {
        let source: &dyn EnvironmentSource = &desktop();
        assert_eq!(source.snapshot(), desktop());
    }

    #[test]
    fn host_environment_uses_overrides() {
        let host = HostEnvironment::new(EnvironmentConfig {
            locale: Some("fr-FR".into()),
            screen_width: Some(1280),
            screen_height: Some(800),
        });
        let env = host.snapshot();
        assert_eq!(env.locale.as_deref(), Some("fr-FR"));
        assert_eq!(
            env.screen,
            Some(ScreenGeometry {
                width: 1280,
                height: 800
            })
        );
        assert!(env.user_agent.unwrap().starts_with("quire ("));
        assert!(env.hardware_concurrency.unwrap_or(1) >= 1);
    }

    #[test]
    fn host_user_agent_ignores_crate_version() {
        let ua = host_user_agent();
        assert!(!ua.contains(env!("CARGO_PKG_VERSION")));
        assert!(ua.contains(std::env::consts::OS));
    }

    #[test]
    fn host_fingerprint_is_stable_across_snapshots() {
        let host = HostEnvironment::default();
        assert_eq!(host.snapshot().fingerprint(), host.snapshot().fingerprint());
    }

    #[test]
    fn locale_normalization() {
        assert_eq!(normalize_locale("en_US.UTF-8").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale(""), None);
    }
}
