// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder scan and per-task reminder scheduling.
//!
//! A reminder is sent at most once: the `sent` flag is set only after the
//! mailer accepts the message. Each send (scan or immediate) holds the send
//! lock for that one task and re-reads the task inside it, and the flag is
//! only set if the reminder still has the time that was mailed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use taskquest_core::{Clock, Mailer, TaskQuestError, TaskStore, UserStore};

use crate::error::SchedulingError;
use crate::guard::RunGuard;
use crate::report::{ReminderScanReport, ScanOutcome, Scheduled};

pub struct ReminderScanner {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    guard: RunGuard,
    send_lock: Mutex<()>,
}

enum SendResult {
    Sent,
    OwnerMissing,
    NoLongerDue,
}

impl ReminderScanner {
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
            send_lock: Mutex::new(()),
        }
    }

    /// Whether a scan is running right now.
    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Send every due, unsent reminder on a task that is not completed.
    ///
    /// Failures for individual tasks are counted and retried next scan; only
    /// a failure to query due reminders fails the scan.
    pub async fn scan(&self) -> Result<ScanOutcome<ReminderScanReport>, TaskQuestError> {
        let Some(_permit) = self.guard.try_acquire() else {
            info!("reminder scan already in progress, skipping");
            return Ok(ScanOutcome::Skipped);
        };

        let now = self.clock.now();
        let due = self.tasks.due_reminders(now).await?;
        debug!(count = due.len(), "due reminders found");

        let mut report = ReminderScanReport::default();
        for task in &due {
            match self.send(&task.id, now).await {
                Ok(SendResult::Sent) => report.sent += 1,
                Ok(SendResult::OwnerMissing) => {
                    debug!(task_id = %task.id, user_id = %task.user_id, "reminder owner missing, skipping");
                    report.skipped += 1;
                }
                Ok(SendResult::NoLongerDue) => {
                    debug!(task_id = %task.id, "reminder changed since the scan started, skipping");
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!(task_id = %task.id, error = %e, "reminder not sent, will retry next scan");
                    report.failed += 1;
                }
            }
        }

        info!(
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "reminder scan complete"
        );
        Ok(ScanOutcome::Completed(report))
    }

    /// Send the reminder for `task_id` now if its time has passed, otherwise
    /// leave it for the periodic scan.
    pub async fn schedule_reminder(&self, task_id: &str) -> Result<Scheduled, SchedulingError> {
        let _sending = self.send_lock.lock().await;

        let task = self
            .tasks
            .get_task(task_id)
            .await
            .map_err(SchedulingError::Store)?
            .ok_or_else(|| SchedulingError::TaskNotFound(task_id.to_string()))?;

        let reminder = &task.reminder;
        let at = match reminder.datetime {
            Some(at) if reminder.enabled && !reminder.sent && !task.is_completed() => at,
            _ => return Ok(Scheduled::Inactive),
        };

        if at > self.clock.now() {
            debug!(task_id, %at, "reminder pending");
            return Ok(Scheduled::Pending { at });
        }

        let user = self
            .users
            .get_user(&task.user_id)
            .await
            .map_err(SchedulingError::Store)?
            .ok_or_else(|| SchedulingError::OwnerNotFound {
                task_id: task.id.clone(),
                user_id: task.user_id.clone(),
            })?;
        let delivery = self
            .mailer
            .send_reminder(&user, &task)
            .await
            .map_err(SchedulingError::Delivery)?;
        let flagged = self
            .tasks
            .mark_reminder_sent(&task.id, at)
            .await
            .map_err(SchedulingError::Store)?;
        if !flagged {
            debug!(task_id, "reminder changed while sending, left unflagged");
        }

        info!(task_id, to = %user.email, "reminder time already passed, sent immediately");
        Ok(Scheduled::SentImmediately(delivery))
    }

    /// Disable the reminder and clear its `sent` flag.
    pub async fn cancel_reminder(&self, task_id: &str) -> Result<(), SchedulingError> {
        let found = self
            .tasks
            .set_reminder_state(task_id, false, false)
            .await
            .map_err(SchedulingError::Store)?;
        if !found {
            return Err(SchedulingError::TaskNotFound(task_id.to_string()));
        }
        debug!(task_id, "reminder cancelled");
        Ok(())
    }

    async fn send(&self, task_id: &str, now: DateTime<Utc>) -> Result<SendResult, TaskQuestError> {
        let _sending = self.send_lock.lock().await;

        let Some(task) = self.tasks.get_task(task_id).await? else {
            return Ok(SendResult::NoLongerDue);
        };
        let at = match task.reminder.datetime {
            Some(at) if task.reminder.is_due(now) && !task.is_completed() => at,
            _ => return Ok(SendResult::NoLongerDue),
        };
        let Some(user) = self.users.get_user(&task.user_id).await? else {
            return Ok(SendResult::OwnerMissing);
        };

        self.mailer.send_reminder(&user, &task).await?;
        if !self.tasks.mark_reminder_sent(task_id, at).await? {
            debug!(task_id, "reminder changed while sending, left unflagged");
        }
        debug!(task_id, to = %user.email, "reminder sent");
        Ok(SendResult::Sent)
    }
}
