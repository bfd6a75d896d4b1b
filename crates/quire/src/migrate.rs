// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quire migrate` command implementation.

use quire_core::QuireError;
use quire_vault::migration::{MigrationOutcome, MigrationReport};
use quire_vault::MigrationPipeline;

use crate::context::Context;

/// Run one migration pass and print what happened to each legacy key.
pub async fn run_migrate(ctx: &Context) -> Result<(), QuireError> {
    let report = MigrationPipeline::new(ctx.store()).migrate().await?;
    print!("{}", render_report(&report));
    Ok(())
}

fn render_report(report: &MigrationReport) -> String {
    if report.is_empty() {
        return "No legacy credentials found.\n".to_string();
    }

    let mut out = String::new();
    for entry in &report.sources {
        let action = match entry.outcome {
            MigrationOutcome::Migrated => format!("migrated to {}", entry.source.target),
            MigrationOutcome::Superseded => {
                format!("removed (newer {} source won)", entry.source.target)
            }
            MigrationOutcome::InvalidShapeDeleted => "removed (not a valid token)".to_string(),
            MigrationOutcome::Kept => "kept (will retry next run)".to_string(),
        };
        out.push_str(&format!(
            "  {:<22} [{}] {action}\n",
            entry.source.key, entry.source.scope
        ));
    }
    for warning in &report.warnings {
        out.push_str(&format!("  warning: {warning}\n"));
    }
    out
}
