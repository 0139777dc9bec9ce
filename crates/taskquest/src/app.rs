// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of storage, mail, gamification, scanners, and the task service.
//!
//! Every command that touches the database goes through [`App::open`], so
//! the CLI and the server share one construction path.

use std::sync::Arc;

use taskquest_config::model::TaskQuestConfig;
use taskquest_core::{Clock, Mailer, StorageAdapter, SystemClock, TaskQuestError};
use taskquest_gamification::GamificationEngine;
use taskquest_gateway::{GatewayState, HealthState};
use taskquest_scheduler::{OverdueScanner, ReminderScanner};
use taskquest_service::TaskService;
use taskquest_storage::SqliteStorage;

pub struct App {
    pub storage: Arc<SqliteStorage>,
    pub mailer: Arc<dyn Mailer>,
    pub clock: Arc<dyn Clock>,
    pub engine: Arc<GamificationEngine>,
    pub reminders: Arc<ReminderScanner>,
    pub overdue: Arc<OverdueScanner>,
    pub tasks: Arc<TaskService>,
}

impl App {
    /// Opens the configured database and mail transport.
    pub async fn open(config: &TaskQuestConfig) -> Result<Self, TaskQuestError> {
        let storage = Arc::new(SqliteStorage::open(config.storage.clone()).await?);
        let mailer = taskquest_mail::build_mailer(&config.mail)?;
        Ok(Self::assemble(config, storage, mailer, Arc::new(SystemClock)))
    }

    /// Builds the component graph over already-opened collaborators.
    pub fn assemble(
        config: &TaskQuestConfig,
        storage: Arc<SqliteStorage>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let engine = Arc::new(GamificationEngine::new(
            storage.clone(),
            clock.clone(),
            &config.gamification,
        ));
        let reminders = Arc::new(ReminderScanner::new(
            storage.clone(),
            storage.clone(),
            mailer.clone(),
            clock.clone(),
        ));
        let overdue = Arc::new(OverdueScanner::new(
            storage.clone(),
            storage.clone(),
            mailer.clone(),
            clock.clone(),
        ));
        let tasks = Arc::new(TaskService::new(
            storage.clone(),
            engine.clone(),
            reminders.clone(),
            clock.clone(),
        ));
        Self {
            storage,
            mailer,
            clock,
            engine,
            reminders,
            overdue,
            tasks,
        }
    }

    pub fn gateway_state(&self) -> GatewayState {
        GatewayState {
            tasks: self.tasks.clone(),
            engine: self.engine.clone(),
            reminders: self.reminders.clone(),
            overdue: self.overdue.clone(),
            identity: self.storage.clone(),
            health: HealthState::default(),
        }
    }

    /// Checkpoints the database.
    pub async fn close(&self) -> Result<(), TaskQuestError> {
        self.storage.close().await
    }
}
