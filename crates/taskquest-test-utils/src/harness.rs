// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-database harness for integration tests.
//!
//! `TestStore` opens a fresh SQLite database in a temp directory that lives
//! as long as the harness, and offers shortcuts for the fixtures most tests
//! need: users with API tokens and tasks in a given state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use taskquest_config::model::StorageConfig;
use taskquest_core::types::{Reminder, Task, TaskStatus, User};
use taskquest_core::{TaskQuestError, TaskStore, UserStore};
use taskquest_storage::{SqliteStorage, generate_token, hash_token};

/// A task with defaults suitable for most tests: `todo`, medium priority,
/// 20 XP, no due date, no reminder.
pub fn sample_task(user_id: &str, title: &str) -> Task {
    let now = Utc::now();
    Task {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        description: None,
        labels: Vec::new(),
        tags: Vec::new(),
        difficulty: Default::default(),
        status: TaskStatus::Todo,
        priority: Default::default(),
        xp_value: 20,
        due_date: None,
        xp_awarded: false,
        completed_at: None,
        reminder: Reminder::default(),
        overdue_notification_sent: false,
        created_at: now,
        updated_at: now,
    }
}

/// Fresh SQLite storage in a temp directory.
pub struct TestStore {
    pub storage: Arc<SqliteStorage>,
    _temp_dir: tempfile::TempDir,
}

impl TestStore {
    pub async fn new() -> Result<Self, TaskQuestError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| TaskQuestError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");
        let storage = SqliteStorage::open(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        })
        .await?;
        Ok(Self {
            storage: Arc::new(storage),
            _temp_dir: temp_dir,
        })
    }

    /// Create a user and return it with its raw API token.
    pub async fn add_user(&self, name: &str, email: &str) -> Result<(User, String), TaskQuestError> {
        let token = generate_token();
        let user = self
            .storage
            .create_user(name, email, &hash_token(&token))
            .await?;
        Ok((user, token))
    }

    /// Insert a task as given.
    pub async fn insert(&self, task: Task) -> Result<Task, TaskQuestError> {
        self.storage.insert_task(&task).await?;
        Ok(task)
    }

    /// Insert a task with a reminder enabled for `at`.
    pub async fn task_with_reminder(
        &self,
        user_id: &str,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<Task, TaskQuestError> {
        let mut task = sample_task(user_id, title);
        task.reminder = Reminder {
            enabled: true,
            datetime: Some(at),
            sent: false,
        };
        self.insert(task).await
    }

    /// Insert a task due at `due`.
    pub async fn task_due(
        &self,
        user_id: &str,
        title: &str,
        due: DateTime<Utc>,
    ) -> Result<Task, TaskQuestError> {
        let mut task = sample_task(user_id, title);
        task.due_date = Some(due);
        self.insert(task).await
    }

    /// Reload a task by id, failing if it is gone.
    pub async fn reload(&self, id: &str) -> Result<Task, TaskQuestError> {
        self.storage
            .get_task(id)
            .await?
            .ok_or_else(|| TaskQuestError::task_not_found(id))
    }
}
