// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for tasks, stats, and users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TaskQuestError;
use crate::traits::adapter::Adapter;
use crate::types::{LeaderboardEntry, Task, TaskQuery, User, UserStats};

/// Lifecycle of a storage backend.
#[async_trait]
pub trait StorageAdapter: Adapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), TaskQuestError>;

    /// Closes the backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), TaskQuestError>;
}

/// Task persistence.
///
/// Methods taking a `user_id` filter by ownership: a task owned by another
/// user behaves exactly like a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<(), TaskQuestError>;

    /// Unfiltered lookup, for scanners and reminder scheduling.
    async fn get_task(&self, id: &str) -> Result<Option<Task>, TaskQuestError>;

    async fn get_task_for_user(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Task>, TaskQuestError>;

    async fn list_tasks(
        &self,
        user_id: &str,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, TaskQuestError>;

    async fn count_tasks(&self, user_id: &str) -> Result<u64, TaskQuestError>;

    /// Writes user-editable fields and status bookkeeping.
    ///
    /// Never clears `xp_awarded` and never touches `overdue_notification_sent`;
    /// those flags belong to the engine and the overdue scan.
    async fn update_task(&self, task: &Task) -> Result<(), TaskQuestError>;

    /// Returns whether a row was deleted.
    async fn delete_task(&self, user_id: &str, id: &str) -> Result<bool, TaskQuestError>;

    /// Enabled, unsent reminders due at or before `now` on tasks that are not completed.
    async fn due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Task>, TaskQuestError>;

    /// Tasks past due, not completed, and not yet notified, across all users.
    async fn overdue_unnotified(&self, now: DateTime<Utc>)
    -> Result<Vec<Task>, TaskQuestError>;

    /// One user's overdue tasks, oldest due date first, regardless of notification state.
    async fn overdue_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Task>, TaskQuestError>;

    /// Flags the reminder scheduled for `at` as delivered. Returns false, and
    /// changes nothing, when the reminder is no longer enabled, already sent,
    /// or now set for a different time.
    async fn mark_reminder_sent(&self, id: &str, at: DateTime<Utc>)
    -> Result<bool, TaskQuestError>;

    /// Overwrites the reminder flags. Returns false when the task does not exist.
    async fn set_reminder_state(
        &self,
        id: &str,
        enabled: bool,
        sent: bool,
    ) -> Result<bool, TaskQuestError>;

    /// Sets `overdue_notification_sent` on every listed task in one transaction.
    async fn mark_overdue_notified(&self, ids: &[String]) -> Result<(), TaskQuestError>;
}

/// Gamification record persistence.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Returns the user's record, inserting a fresh one if none exists.
    async fn get_or_create_stats(&self, user_id: &str) -> Result<UserStats, TaskQuestError>;

    async fn get_stats(&self, user_id: &str) -> Result<Option<UserStats>, TaskQuestError>;

    /// Atomically writes `stats` and flips `xp_awarded` on the task.
    ///
    /// Returns `false`, writing nothing, when the task was already awarded.
    async fn commit_award(&self, stats: &UserStats, task_id: &str)
    -> Result<bool, TaskQuestError>;

    /// Writes `stats` without any task bookkeeping (manual XP grants).
    async fn save_stats(&self, stats: &UserStats) -> Result<(), TaskQuestError>;

    /// Top users by level, then XP.
    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, TaskQuestError>;
}

/// User records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores a new user. `token_hash` is the hex SHA-256 of the API token.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        token_hash: &str,
    ) -> Result<User, TaskQuestError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, TaskQuestError>;

    async fn find_user_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, TaskQuestError>;
}
