// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quire - device-bound credential vault for the site editor.
//!
//! This is the binary entry point.

mod context;
mod credentials;
mod migrate;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quire_config::QuireConfig;
use quire_vault::CredentialName;

/// Quire - device-bound credential vault for the site editor.
#[derive(Parser, Debug)]
#[command(name = "quire", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Move tokens out of legacy storage locations.
    Migrate,
    /// Store a credential (token from QUIRE_TOKEN or a hidden prompt).
    Set {
        /// GITHUB, GROQ or SESSION.
        name: CredentialName,
    },
    /// Show a stored credential, masked unless --reveal is given.
    Get {
        name: CredentialName,
        #[arg(long)]
        reveal: bool,
    },
    /// Delete a stored credential.
    Remove { name: CredentialName },
    /// Delete every stored credential.
    Clear,
    /// Show which credentials are stored and readable on this device.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print the device fingerprint the vault key is derived from.
    Fingerprint,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => quire_config::load_and_validate_path(path),
        None => quire_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            quire_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.general.log_level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("quire: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &QuireConfig) -> Result<(), quire_core::QuireError> {
    let ctx = context::Context::open(config).await?;
    let result = dispatch(&ctx, command).await;
    ctx.close().await;
    result
}

async fn dispatch(ctx: &context::Context, command: Commands) -> Result<(), quire_core::QuireError> {
    // Each invocation is a fresh process; legacy values are picked up by the
    // first credential command after an upgrade.
    if !matches!(command, Commands::Migrate | Commands::Fingerprint) {
        ctx.migrate_quietly().await?;
    }

    match command {
        Commands::Migrate => migrate::run_migrate(ctx).await,
        Commands::Set { name } => credentials::run_set(ctx, name).await,
        Commands::Get { name, reveal } => credentials::run_get(ctx, name, reveal).await,
        Commands::Remove { name } => credentials::run_remove(ctx, name).await,
        Commands::Clear => credentials::run_clear(ctx).await,
        Commands::Status { json, plain } => status::run_status(ctx, json, plain).await,
        Commands::Fingerprint => {
            println!("{}", ctx.store().fingerprint());
            Ok(())
        }
    }
}

/// Initialize tracing with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quire={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn credential_names_parse_case_insensitively() {
        let cli = Cli::try_parse_from(["quire", "get", "github", "--reveal"]).unwrap();
        match cli.command {
            Commands::Get { name, reveal } => {
                assert_eq!(name, CredentialName::Github);
                assert!(reveal);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_credential_name_is_rejected() {
        assert!(Cli::try_parse_from(["quire", "set", "gitlab"]).is_err());
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from(["quire", "status", "--config", "/tmp/q.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/q.toml")));
    }
}
