// SPDX-FileCopyrightText: 2026 Quire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Quire credential subsystem.
//!
//! This crate provides the error type, the storage scope enumeration, and the
//! persistence surface trait that the storage and vault crates build on.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QuireError;
pub use traits::KeyValueStore;
pub use types::StorageScope;
