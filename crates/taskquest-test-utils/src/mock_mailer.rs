// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock mail adapter for deterministic testing.
//!
//! `MockMailer` implements `Mailer` by capturing every accepted message for
//! later assertion. Failures can be injected for all recipients or for
//! specific addresses to exercise retry paths.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskquest_core::types::{Delivery, HealthStatus, Task, User};
use taskquest_core::{Adapter, Mailer, TaskQuestError};

/// A message the mock accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum SentMail {
    Reminder { to: String, task_id: String },
    OverdueDigest { to: String, task_ids: Vec<String> },
}

impl SentMail {
    pub fn recipient(&self) -> &str {
        match self {
            SentMail::Reminder { to, .. } | SentMail::OverdueDigest { to, .. } => to,
        }
    }
}

#[derive(Default)]
struct Failures {
    all: bool,
    addresses: HashSet<String>,
}

/// A recording mailer for tests.
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    failures: Arc<Mutex<Failures>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail until cleared.
    pub async fn fail_all(&self, fail: bool) {
        self.failures.lock().await.all = fail;
    }

    /// Make sends to `email` fail.
    pub async fn fail_for(&self, email: &str) {
        self.failures
            .lock()
            .await
            .addresses
            .insert(email.to_lowercase());
    }

    pub async fn clear_failures(&self) {
        let mut failures = self.failures.lock().await;
        failures.all = false;
        failures.addresses.clear();
    }

    /// All messages accepted so far.
    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Task ids of every reminder accepted so far.
    pub async fn reminded_task_ids(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|mail| match mail {
                SentMail::Reminder { task_id, .. } => Some(task_id.clone()),
                SentMail::OverdueDigest { .. } => None,
            })
            .collect()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    async fn check(&self, to: &User) -> Result<(), TaskQuestError> {
        let failures = self.failures.lock().await;
        if failures.all || failures.addresses.contains(&to.email.to_lowercase()) {
            return Err(TaskQuestError::Delivery {
                message: format!("mock delivery to {} refused", to.email),
                source: None,
            });
        }
        Ok(())
    }

    async fn record(&self, mail: SentMail) -> Delivery {
        self.sent.lock().await.push(mail);
        Delivery {
            id: format!("mock-mail-{}", uuid::Uuid::new_v4()),
        }
    }
}

#[async_trait]
impl Adapter for MockMailer {
    fn name(&self) -> &str {
        "mock-mailer"
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskQuestError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_reminder(&self, to: &User, task: &Task) -> Result<Delivery, TaskQuestError> {
        self.check(to).await?;
        Ok(self
            .record(SentMail::Reminder {
                to: to.email.clone(),
                task_id: task.id.clone(),
            })
            .await)
    }

    async fn send_overdue_digest(
        &self,
        to: &User,
        tasks: &[Task],
    ) -> Result<Delivery, TaskQuestError> {
        self.check(to).await?;
        Ok(self
            .record(SentMail::OverdueDigest {
                to: to.email.clone(),
                task_ids: tasks.iter().map(|t| t.id.clone()).collect(),
            })
            .await)
    }
}
