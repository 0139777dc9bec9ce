// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log-only mailer used when no SMTP relay is configured.

use async_trait::async_trait;
use tracing::info;

use taskquest_config::model::MailConfig;
use taskquest_core::types::{Delivery, HealthStatus, Task, User};
use taskquest_core::{Adapter, Mailer, TaskQuestError};

use crate::render;

/// Renders each message and writes its subject and recipient to the log.
/// Every send succeeds, so once-only flags are still set.
pub struct LogMailer {
    frontend_url: String,
}

impl LogMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            frontend_url: config.frontend_url.clone(),
        }
    }

    fn delivery() -> Delivery {
        Delivery {
            id: format!("log-{}", uuid::Uuid::new_v4()),
        }
    }
}

#[async_trait]
impl Adapter for LogMailer {
    fn name(&self) -> &str {
        "log"
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskQuestError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reminder(&self, to: &User, task: &Task) -> Result<Delivery, TaskQuestError> {
        let mail = render::reminder(to, task, &self.frontend_url);
        let delivery = Self::delivery();
        info!(to = %to.email, subject = %mail.subject, id = %delivery.id, "reminder (not sent, log-only mailer)");
        Ok(delivery)
    }

    async fn send_overdue_digest(
        &self,
        to: &User,
        tasks: &[Task],
    ) -> Result<Delivery, TaskQuestError> {
        let mail = render::overdue_digest(to, tasks, &self.frontend_url);
        let delivery = Self::delivery();
        info!(
            to = %to.email,
            subject = %mail.subject,
            tasks = tasks.len(),
            id = %delivery.id,
            "overdue digest (not sent, log-only mailer)"
        );
        Ok(delivery)
    }
}
