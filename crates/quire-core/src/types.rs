// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the storage and vault crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifetime class of a persistence surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    /// Data disappears when the session (process) ends.
    Session,
    /// Data survives restarts.
    Durable,
}

impl StorageScope {
    /// Prefix used when building physical storage keys for this scope.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            StorageScope::Session => "quire.session.",
            StorageScope::Durable => "quire.durable.",
        }
    }
}
