// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence surfaces for the Quire credential subsystem.
//!
//! Two implementations of [`quire_core::KeyValueStore`]:
//! - [`MemoryStore`]: process-lifetime map, used as the session-scoped surface
//!   and as an in-memory fake in tests.
//! - [`SqliteStore`]: WAL-mode SQLite with embedded migrations and a
//!   single-writer concurrency model via `tokio-rusqlite`; the durable surface.

pub mod database;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod sqlite;

pub use database::Database;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
