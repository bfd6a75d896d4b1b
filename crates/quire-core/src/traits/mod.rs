// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits injected into the vault.

pub mod storage;

pub use storage::KeyValueStore;
