// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for TaskQuest.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed queries for tasks, user
//! stats, and users. [`SqliteStorage`] implements every store trait from
//! `taskquest-core` plus the token-based [`IdentityProvider`](taskquest_core::IdentityProvider).

pub mod adapter;
mod codec;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use queries::users::{generate_token, hash_token};
