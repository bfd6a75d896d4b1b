// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence surface trait (session-scoped or durable key-value store).

use async_trait::async_trait;

use crate::error::QuireError;
use crate::types::StorageScope;

/// A string-keyed, string-valued persistence surface.
///
/// Implementations are shared global state: there are no transactions and the
/// last writer wins. Reading or deleting a missing key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the human-readable name of this surface.
    fn name(&self) -> &str;

    /// Returns the lifetime class of this surface.
    fn scope(&self) -> StorageScope;

    /// Reads a value. A missing key yields `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, QuireError>;

    /// Writes a value, replacing any previous one.
    ///
    /// Fails when the surface rejects the write (quota exceeded, storage disabled).
    async fn set(&self, key: &str, value: &str) -> Result<(), QuireError>;

    /// Deletes a value. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> Result<(), QuireError>;
}
