// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value entry operations on the `kv_entries` table.

use quire_core::QuireError;
use rusqlite::params;

use crate::database::Database;

/// Get the value stored under `key`.
pub async fn get_entry(db: &Database, key: &str) -> Result<Option<String>, QuireError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT value FROM kv_entries WHERE key = ?1")?;
            let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or replace the value stored under `key`.
pub async fn put_entry(db: &Database, key: &str, value: &str) -> Result<(), QuireError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete the entry stored under `key`. Returns whether a row was removed.
pub async fn delete_entry(db: &Database, key: &str) -> Result<bool, QuireError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let removed = conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
            Ok(removed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all stored keys in lexical order.
pub async fn list_keys(db: &Database) -> Result<Vec<String>, QuireError> {
    db.connection()
        .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT key FROM kv_entries ORDER BY key")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut keys = Vec::new();
            for row in rows {
                keys.push(row?);
            }
            Ok(keys)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
