// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits.
//!
//! Backends extend the [`Adapter`] base trait and use `#[async_trait]` so
//! they can be held as trait objects.

pub mod adapter;
pub mod identity;
pub mod mailer;
pub mod storage;

pub use adapter::Adapter;
pub use identity::IdentityProvider;
pub use mailer::Mailer;
pub use storage::{StatsStore, StorageAdapter, TaskStore, UserStore};
