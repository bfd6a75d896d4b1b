// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use quire_core::QuireError;
use tracing::debug;

use crate::migrations;

/// Handle to the durable SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, QuireError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing whether to enable WAL journaling.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, QuireError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| QuireError::Storage {
                source: Box::new(e),
            })?;
        }

        // Migrations run on a short-lived synchronous connection before the
        // single writer is started.
        {
            let mut setup = rusqlite::Connection::open(path).map_err(|e| QuireError::Storage {
                source: Box::new(e),
            })?;
            if wal_mode {
                setup
                    .execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(|e| QuireError::Storage {
                        source: Box::new(e),
                    })?;
            }
            migrations::run_migrations(&mut setup)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA busy_timeout = 5000;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying single-writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn close(&self) -> Result<(), QuireError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert tokio-rusqlite errors to QuireError::Storage.
pub fn map_tr_err<E: std::fmt::Display>(e: E) -> QuireError {
    QuireError::storage(format!("database error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_parent_directories_and_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("quire.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("quire.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        // Second open must not fail on already-applied migrations.
        let db = Database::open_with(path, false).await.unwrap();
        db.close().await.unwrap();
    }
}
