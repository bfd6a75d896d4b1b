// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-time migration of credentials from legacy storage locations.
//!
//! Earlier releases stored tokens either in plain text or XOR-obfuscated
//! under fixed keys. Each pass reads those keys, recovers a plaintext that
//! looks like a real credential, writes it through the [`CredentialStore`]
//! and deletes the legacy copy. A source whose read fails, or whose
//! recovered token cannot be written, is left in place for the next run.

use quire_core::{QuireError, StorageScope};
use strum::Display;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::legacy::legacy_decode;
use crate::store::{CredentialName, CredentialStore, SaveStatus};

/// A legacy storage location and the credential it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySource {
    pub key: &'static str,
    pub scope: StorageScope,
    pub target: CredentialName,
}

/// Legacy locations in precedence order, newest format first.
///
/// Within one pass the first source to produce a credential for a target
/// wins; later sources for the same target are superseded. A recovered
/// token always replaces whatever the target held before the pass.
pub const LEGACY_SOURCES: &[LegacySource] = &[
    LegacySource {
        key: "cms_encrypted_token",
        scope: StorageScope::Durable,
        target: CredentialName::Github,
    },
    LegacySource {
        key: "blog_encrypted_token",
        scope: StorageScope::Durable,
        target: CredentialName::Github,
    },
    LegacySource {
        key: "github_token",
        scope: StorageScope::Durable,
        target: CredentialName::Github,
    },
    LegacySource {
        key: "github_token",
        scope: StorageScope::Session,
        target: CredentialName::Github,
    },
    LegacySource {
        key: "groq_api_key",
        scope: StorageScope::Durable,
        target: CredentialName::Groq,
    },
];

/// Known token prefixes for each credential.
fn accepted_prefixes(name: CredentialName) -> &'static [&'static str] {
    match name {
        CredentialName::Github => &["ghp_", "github_pat_"],
        CredentialName::Groq => &["gsk_"],
        CredentialName::Session => &[],
    }
}

/// Whether `value` looks like a genuine credential of kind `name`.
///
/// Requires a known prefix followed by at least one character, with no
/// whitespace or control characters anywhere.
pub fn is_credential_shaped(name: CredentialName, value: &str) -> bool {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    accepted_prefixes(name)
        .iter()
        .any(|prefix| value.len() > prefix.len() && value.starts_with(prefix))
}

/// Terminal state of one legacy source within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum MigrationOutcome {
    /// Recovered, stored encrypted, legacy copy deleted.
    Migrated,
    /// Recovered, but a newer source already migrated this target in the same pass;
    /// legacy copy deleted.
    Superseded,
    /// Nothing credential-shaped could be recovered; legacy copy deleted.
    InvalidShapeDeleted,
    /// Left in place: unreadable, or the encrypted write failed.
    Kept,
}

/// What happened to one legacy source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: LegacySource,
    pub outcome: MigrationOutcome,
}

/// Report of what a migration pass did.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// One entry per legacy source that was present.
    pub sources: Vec<SourceReport>,
    /// Non-fatal problems, such as a legacy copy that could not be deleted.
    pub warnings: Vec<String>,
}

impl MigrationReport {
    /// True when no legacy source was present.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn count(&self, outcome: MigrationOutcome) -> usize {
        self.sources.iter().filter(|s| s.outcome == outcome).count()
    }

    /// Targets that received a credential in this pass.
    pub fn migrated(&self) -> Vec<CredentialName> {
        self.with_outcome(MigrationOutcome::Migrated)
            .map(|s| s.source.target)
            .collect()
    }

    /// Legacy keys still present after this pass.
    pub fn kept(&self) -> Vec<&'static str> {
        self.with_outcome(MigrationOutcome::Kept)
            .map(|s| s.source.key)
            .collect()
    }

    fn with_outcome(&self, outcome: MigrationOutcome) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(move |s| s.outcome == outcome)
    }
}

/// Moves legacy credentials into the encrypted store.
#[derive(Debug)]
pub struct MigrationPipeline<'a> {
    store: &'a CredentialStore,
    sources: &'static [LegacySource],
}

impl<'a> MigrationPipeline<'a> {
    pub fn new(store: &'a CredentialStore) -> Self {
        Self {
            store,
            sources: LEGACY_SOURCES,
        }
    }

    /// Run one pass over every legacy source.
    ///
    /// A problem with one source never stops the others. Only a fatal crypto
    /// failure is returned as `Err`. Running again after a clean pass does nothing.
    pub async fn migrate(&self) -> Result<MigrationReport, QuireError> {
        let mut report = MigrationReport::default();
        let fingerprint = self.store.fingerprint();
        let mut claimed: Vec<CredentialName> = Vec::new();

        for source in self.sources {
            if let Some(outcome) = self
                .migrate_source(source, fingerprint.as_str(), &claimed, &mut report)
                .await?
            {
                debug!(key = source.key, scope = %source.scope, %outcome, "legacy source processed");
                if outcome == MigrationOutcome::Migrated {
                    claimed.push(source.target);
                }
                report.sources.push(SourceReport {
                    source: *source,
                    outcome,
                });
            }
        }

        if report.is_empty() {
            debug!("no legacy credentials found");
        } else {
            info!(
                migrated = report.count(MigrationOutcome::Migrated),
                superseded = report.count(MigrationOutcome::Superseded),
                invalid = report.count(MigrationOutcome::InvalidShapeDeleted),
                kept = report.count(MigrationOutcome::Kept),
                "legacy credential migration finished"
            );
        }
        Ok(report)
    }

    async fn migrate_source(
        &self,
        source: &LegacySource,
        fingerprint: &str,
        claimed: &[CredentialName],
        report: &mut MigrationReport,
    ) -> Result<Option<MigrationOutcome>, QuireError> {
        let surface = self.store.surface(source.scope);
        let raw = match surface.get(source.key).await {
            Ok(Some(raw)) => Zeroizing::new(raw),
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(key = source.key, scope = %source.scope, error = %e, "legacy source unreadable, keeping it");
                return Ok(Some(MigrationOutcome::Kept));
            }
        };

        let Some(token) = recover(&raw, source.target, fingerprint) else {
            warn!(key = source.key, scope = %source.scope, "legacy value is not a credential, deleting it");
            self.delete_source(source, report).await;
            return Ok(Some(MigrationOutcome::InvalidShapeDeleted));
        };

        if claimed.contains(&source.target) {
            self.delete_source(source, report).await;
            return Ok(Some(MigrationOutcome::Superseded));
        }

        match self.store.save(source.target, &token).await? {
            SaveStatus::Saved => {
                self.delete_source(source, report).await;
                Ok(Some(MigrationOutcome::Migrated))
            }
            status => {
                warn!(
                    key = source.key,
                    credential = %source.target,
                    %status,
                    "could not store recovered credential, keeping legacy value"
                );
                Ok(Some(MigrationOutcome::Kept))
            }
        }
    }

    async fn delete_source(&self, source: &LegacySource, report: &mut MigrationReport) {
        if let Err(e) = self.store.surface(source.scope).delete(source.key).await {
            let warning = format!(
                "failed to delete legacy key `{}` from {} storage: {e}",
                source.key, source.scope
            );
            warn!("{}", warning);
            report.warnings.push(warning);
        }
    }
}

/// Try the XOR decoding first, then the raw value as-is.
fn recover(raw: &str, target: CredentialName, fingerprint: &str) -> Option<Zeroizing<String>> {
    if let Some(decoded) = legacy_decode(raw, fingerprint).map(Zeroizing::new)
        && is_credential_shaped(target, &decoded)
    {
        return Some(decoded);
    }
    let trimmed = raw.trim();
    is_credential_shaped(target, trimmed).then(|| Zeroizing::new(trimmed.to_string()))
}
