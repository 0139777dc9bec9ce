// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Overdue scan: one digest per user covering every newly overdue task.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use taskquest_core::types::Task;
use taskquest_core::{Clock, Mailer, TaskQuestError, TaskStore, UserStore};

use crate::guard::RunGuard;
use crate::report::{OverdueScanReport, ScanOutcome};

pub struct OverdueScanner {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    guard: RunGuard,
}

impl OverdueScanner {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            users,
            mailer,
            clock,
            guard: RunGuard::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Notify each user about their overdue, not-yet-notified tasks.
    ///
    /// Counts are per user. Tasks are flagged only after their digest was
    /// accepted, so a failed user is retried in full on the next scan.
    pub async fn scan(&self) -> Result<ScanOutcome<OverdueScanReport>, TaskQuestError> {
        let Some(_permit) = self.guard.try_acquire() else {
            info!("overdue scan already in progress, skipping");
            return Ok(ScanOutcome::Skipped);
        };

        let overdue = self.tasks.overdue_unnotified(self.clock.now()).await?;
        let mut by_user: BTreeMap<String, Vec<Task>> = BTreeMap::new();
        for task in overdue {
            by_user.entry(task.user_id.clone()).or_default().push(task);
        }
        debug!(users = by_user.len(), "overdue tasks grouped");

        let mut report = OverdueScanReport::default();
        for (user_id, tasks) in &by_user {
            let user = match self.users.get_user(user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    debug!(user_id, tasks = tasks.len(), "overdue owner missing, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(user_id, error = %e, "failed to load overdue owner");
                    report.failed += 1;
                    continue;
                }
            };

            if let Err(e) = self.mailer.send_overdue_digest(&user, tasks).await {
                warn!(to = %user.email, error = %e, "overdue digest not sent, will retry next scan");
                report.failed += 1;
                continue;
            }

            let ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
            match self.tasks.mark_overdue_notified(&ids).await {
                Ok(()) => {
                    debug!(to = %user.email, tasks = ids.len(), "overdue digest sent");
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(to = %user.email, error = %e, "digest sent but tasks not flagged");
                    report.failed += 1;
                }
            }
        }

        info!(sent = report.sent, failed = report.failed, "overdue scan complete");
        Ok(ScanOutcome::Completed(report))
    }

    /// The user's overdue, not completed tasks by due date, notified or not.
    pub async fn overdue_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, TaskQuestError> {
        self.tasks.overdue_for_user(user_id, self.clock.now()).await
    }
}
