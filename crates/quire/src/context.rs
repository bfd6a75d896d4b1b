// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring from configuration to a ready credential store.

use std::sync::Arc;

use quire_config::QuireConfig;
use quire_core::QuireError;
use quire_storage::{MemoryStore, SqliteStore};
use quire_vault::{CredentialStore, HostEnvironment, KdfParams, MigrationPipeline};
use tracing::{debug, warn};

/// Per-process handles shared by every subcommand.
pub struct Context {
    store: CredentialStore,
    durable: Arc<SqliteStore>,
}

impl Context {
    /// Open the durable database and build the store.
    ///
    /// The session surface is in-memory and dies with this process.
    pub async fn open(config: &QuireConfig) -> Result<Self, QuireError> {
        let durable = Arc::new(
            SqliteStore::open(&config.storage.database_path, config.storage.wal_mode).await?,
        );
        let store = CredentialStore::new(
            Arc::new(MemoryStore::session()),
            durable.clone(),
            Arc::new(HostEnvironment::new(config.environment.clone())),
            KdfParams::from(&config.vault),
        );
        debug!(database = %config.storage.database_path, "credential store ready");
        Ok(Self { store, durable })
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Run a migration pass, logging instead of printing.
    pub async fn migrate_quietly(&self) -> Result<(), QuireError> {
        let report = MigrationPipeline::new(&self.store).migrate().await?;
        for warning in &report.warnings {
            warn!("{warning}");
        }
        Ok(())
    }

    /// Checkpoint the WAL before exit.
    pub async fn close(&self) {
        if let Err(e) = self.durable.database().close().await {
            warn!(error = %e, "failed to checkpoint database");
        }
    }
}
