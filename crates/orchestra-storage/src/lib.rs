// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable stores for encrypted credential records.
//!
//! [`SqliteCredentialStore`] is the production store: WAL-mode SQLite with
//! embedded migrations and a single-writer model via `tokio-rusqlite`.
//! [`MemoryCredentialStore`] has the same semantics without persistence.

pub mod adapter;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteCredentialStore;
pub use database::Database;
pub use memory::MemoryCredentialStore;
