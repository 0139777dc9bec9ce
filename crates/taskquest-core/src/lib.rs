// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for TaskQuest.
//!
//! This crate provides the domain types, the shared error type, the time
//! source, and the collaborator traits that storage, mail, and identity
//! backends implement.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::TaskQuestError;
pub use types::{
    Achievement, AwardOutcome, Delivery, Difficulty, HealthStatus, LeaderboardEntry, NewTask,
    Page, Priority, Reminder, ReminderInput, SortField, SortOrder, SortSpec, Task, TaskQuery,
    TaskStatus, TaskUpdate, User, UserStats,
};

pub use traits::{
    Adapter, IdentityProvider, Mailer, StatsStore, StorageAdapter, TaskStore, UserStore,
};
