// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence surface.
//!
//! Used as the session-scoped surface (contents vanish with the process) and
//! as a deterministic fake for either scope in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use quire_core::{KeyValueStore, QuireError, StorageScope};

/// Process-lifetime key-value store with an optional byte quota.
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    scope: StorageScope,
    /// Maximum total bytes of keys plus values; `None` means unlimited.
    quota: Option<usize>,
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an unlimited store for the given scope.
    pub fn new(name: impl Into<String>, scope: StorageScope) -> Self {
        Self {
            name: name.into(),
            scope,
            quota: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A session-scoped store, the normal use of this type.
    pub fn session() -> Self {
        Self::new("memory-session", StorageScope::Session)
    }

    /// A durable-labelled in-memory store for tests and simulations.
    pub fn durable() -> Self {
        Self::new("memory-durable", StorageScope::Durable)
    }

    /// Limit the total size of stored keys and values, rejecting writes beyond it.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn footprint(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> StorageScope {
        self.scope
    }

    async fn get(&self, key: &str) -> Result<Option<String>, QuireError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), QuireError> {
        let mut entries = self.entries.write().await;
        if let Some(limit) = self.quota {
            let current = footprint(&entries);
            let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = current - replaced + key.len() + value.len();
            if needed > limit {
                return Err(QuireError::storage(format!(
                    "quota exceeded on {}: {needed} bytes needed, limit {limit}",
                    self.name
                )));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        debug!(store = %self.name, key = %key, "entry written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), QuireError> {
        if self.entries.write().await.remove(key).is_some() {
            debug!(store = %self.name, key = %key, "entry deleted");
        }
        Ok(())
    }
}
