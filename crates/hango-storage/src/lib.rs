// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for HanGo conversation state.
//!
//! WAL-mode SQLite with embedded refinery migrations and a single-writer
//! `tokio-rusqlite` connection. One row per thread holds the encoded
//! conversation state.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteThreadStore;
pub use database::Database;
