// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quire status` command implementation.
//!
//! Lists every known credential with its scope and whether it is stored and
//! readable on this device.

use std::io::IsTerminal;

use quire_core::QuireError;
use quire_vault::{CredentialName, CredentialStore};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::context::Context;

/// State of one credential on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialState {
    Ready,
    /// A record exists but does not decrypt here (another device, or corrupted).
    Unreadable,
    NotSet,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct CredentialStatus {
    pub name: String,
    pub scope: String,
    pub state: CredentialState,
}

async fn collect(store: &CredentialStore) -> Result<Vec<CredentialStatus>, QuireError> {
    let mut statuses = Vec::new();
    for name in CredentialName::iter() {
        let state = if store.load(name).await?.is_some() {
            CredentialState::Ready
        } else if store.contains(name).await {
            CredentialState::Unreadable
        } else {
            CredentialState::NotSet
        };
        statuses.push(CredentialStatus {
            name: name.to_string(),
            scope: name.scope().to_string(),
            state,
        });
    }
    Ok(statuses)
}

/// Run the `quire status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(ctx: &Context, json: bool, plain: bool) -> Result<(), QuireError> {
    let statuses = collect(ctx.store()).await?;

    if json {
        let body = serde_json::to_string_pretty(&statuses)
            .map_err(|e| QuireError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{body}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_statuses(&statuses, use_color);
    }
    Ok(())
}

fn print_statuses(statuses: &[CredentialStatus], use_color: bool) {
    println!();
    println!("  quire status");
    println!("  {}", "-".repeat(35));
    for status in statuses {
        println!(
            "    {:<8} {:<8} {}",
            status.name,
            status.scope,
            state_label(status.state, use_color)
        );
    }
    println!();
}

fn state_label(state: CredentialState, use_color: bool) -> String {
    use colored::Colorize;

    match (state, use_color) {
        (CredentialState::Ready, true) => format!("{} {}", "✓".green(), "ready".green()),
        (CredentialState::Ready, false) => "[OK] ready".to_string(),
        (CredentialState::Unreadable, true) => {
            format!("{} {}", "!".yellow(), "stored, unreadable on this device".yellow())
        }
        (CredentialState::Unreadable, false) => "[WARN] stored, unreadable on this device".to_string(),
        (CredentialState::NotSet, true) => format!("{} {}", "-".dimmed(), "not set".dimmed()),
        (CredentialState::NotSet, false) => "[--] not set".to_string(),
    }
}
