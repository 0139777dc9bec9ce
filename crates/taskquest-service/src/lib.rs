// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task lifecycle service for TaskQuest.
//!
//! [`TaskService`] sits between the HTTP gateway and storage. It validates
//! input, enforces ownership, hands completions to the gamification engine,
//! and keeps reminders scheduled as tasks change.

pub mod tasks;
pub mod validate;

pub use tasks::{TaskService, UpdateOutcome};
