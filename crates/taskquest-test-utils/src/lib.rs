// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for TaskQuest integration tests.
//!
//! Provides a recording mail adapter and a temp-database harness for fast,
//! deterministic tests without an SMTP server.
//!
//! # Components
//!
//! - [`MockMailer`] - Mailer that captures messages and can be told to fail
//! - [`TestStore`] - Temp SQLite storage with user and task fixtures

pub mod harness;
pub mod mock_mailer;

pub use harness::{TestStore, sample_task};
pub use mock_mailer::{MockMailer, SentMail};
