// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and identity traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use taskquest_config::model::StorageConfig;
use taskquest_core::types::{LeaderboardEntry, Task, TaskQuery, User, UserStats};
use taskquest_core::{
    Adapter, HealthStatus, IdentityProvider, StatsStore, StorageAdapter, TaskQuestError,
    TaskStore, UserStore,
};

use crate::database::{Database, checkpoint, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Construct and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, TaskQuestError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, TaskQuestError> {
        self.db.get().ok_or_else(|| TaskQuestError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Adapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskQuestError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), TaskQuestError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TaskQuestError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TaskQuestError> {
        let db = self.db()?;
        db.connection().call(checkpoint).await.map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteStorage {
    async fn insert_task(&self, task: &Task) -> Result<(), TaskQuestError> {
        queries::tasks::insert_task(self.db()?, task).await
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, TaskQuestError> {
        queries::tasks::get_task(self.db()?, id).await
    }

    async fn get_task_for_user(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Task>, TaskQuestError> {
        queries::tasks::get_task_for_user(self.db()?, user_id, id).await
    }

    async fn list_tasks(
        &self,
        user_id: &str,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, TaskQuestError> {
        queries::tasks::list_tasks(self.db()?, user_id, query).await
    }

    async fn count_tasks(&self, user_id: &str) -> Result<u64, TaskQuestError> {
        queries::tasks::count_tasks(self.db()?, user_id).await
    }

    async fn update_task(&self, task: &Task) -> Result<(), TaskQuestError> {
        queries::tasks::update_task(self.db()?, task).await
    }

    async fn delete_task(&self, user_id: &str, id: &str) -> Result<bool, TaskQuestError> {
        queries::tasks::delete_task(self.db()?, user_id, id).await
    }

    async fn due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Task>, TaskQuestError> {
        queries::tasks::due_reminders(self.db()?, now).await
    }

    async fn overdue_unnotified(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Task>, TaskQuestError> {
        queries::tasks::overdue_unnotified(self.db()?, now).await
    }

    async fn overdue_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Task>, TaskQuestError> {
        queries::tasks::overdue_for_user(self.db()?, user_id, now).await
    }

    async fn mark_reminder_sent(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, TaskQuestError> {
        queries::tasks::mark_reminder_sent(self.db()?, id, at).await
    }

    async fn set_reminder_state(
        &self,
        id: &str,
        enabled: bool,
        sent: bool,
    ) -> Result<bool, TaskQuestError> {
        queries::tasks::set_reminder_state(self.db()?, id, enabled, sent).await
    }

    async fn mark_overdue_notified(&self, ids: &[String]) -> Result<(), TaskQuestError> {
        queries::tasks::mark_overdue_notified(self.db()?, ids).await
    }
}

#[async_trait]
impl StatsStore for SqliteStorage {
    async fn get_or_create_stats(&self, user_id: &str) -> Result<UserStats, TaskQuestError> {
        queries::stats::get_or_create_stats(self.db()?, user_id).await
    }

    async fn get_stats(&self, user_id: &str) -> Result<Option<UserStats>, TaskQuestError> {
        queries::stats::get_stats(self.db()?, user_id).await
    }

    async fn commit_award(
        &self,
        stats: &UserStats,
        task_id: &str,
    ) -> Result<bool, TaskQuestError> {
        queries::stats::commit_award(self.db()?, stats, task_id).await
    }

    async fn save_stats(&self, stats: &UserStats) -> Result<(), TaskQuestError> {
        queries::stats::save_stats(self.db()?, stats).await
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, TaskQuestError> {
        queries::stats::leaderboard(self.db()?, limit).await
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        token_hash: &str,
    ) -> Result<User, TaskQuestError> {
        queries::users::create_user(self.db()?, name, email, token_hash).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, TaskQuestError> {
        queries::users::get_user(self.db()?, id).await
    }

    async fn find_user_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, TaskQuestError> {
        queries::users::find_user_by_token_hash(self.db()?, token_hash).await
    }
}

#[async_trait]
impl IdentityProvider for SqliteStorage {
    async fn authenticate(&self, token: &str) -> Result<Option<User>, TaskQuestError> {
        if token.is_empty() {
            return Ok(None);
        }
        let hash = queries::users::hash_token(token);
        queries::users::find_user_by_token_hash(self.db()?, &hash).await
    }
}
