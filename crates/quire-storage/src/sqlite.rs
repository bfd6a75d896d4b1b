// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the durable persistence surface.

use async_trait::async_trait;
use tracing::debug;

use quire_core::{KeyValueStore, QuireError, StorageScope};

use crate::database::Database;
use crate::queries::entries;

/// SQLite-backed durable key-value store.
///
/// Survives process restarts. Concurrent processes sharing the same file race
/// with last-writer-wins semantics.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wrap an already-opened database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database at `path` and wrap it.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, QuireError> {
        let db = Database::open_with(path, wal_mode).await?;
        Ok(Self::new(db))
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// List every physical key currently stored.
    pub async fn keys(&self) -> Result<Vec<String>, QuireError> {
        entries::list_keys(&self.db).await
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn scope(&self) -> StorageScope {
        StorageScope::Durable
    }

    async fn get(&self, key: &str) -> Result<Option<String>, QuireError> {
        entries::get_entry(&self.db, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), QuireError> {
        entries::put_entry(&self.db, key, value).await?;
        debug!(key = %key, "durable entry written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), QuireError> {
        if entries::delete_entry(&self.db, key).await? {
            debug!(key = %key, "durable entry deleted");
        }
        Ok(())
    }
}
