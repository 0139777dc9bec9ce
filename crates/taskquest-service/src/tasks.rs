// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task lifecycle: create, read, list, update, delete.
//!
//! Every operation is scoped to the calling user; a task owned by someone
//! else is reported as not found. A transition into `completed` awards XP
//! through the gamification engine before the task is written, so a failed
//! award leaves the task untouched.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use taskquest_core::types::{
    AwardOutcome, NewTask, Page, Reminder, ReminderInput, Task, TaskQuery, TaskStatus, TaskUpdate,
    UserStats,
};
use taskquest_core::{Clock, TaskQuestError, TaskStore};
use taskquest_gamification::GamificationEngine;
use taskquest_scheduler::{ReminderScanner, Scheduled};

use crate::validate;

/// Result of a task update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    pub task: Task,
    /// The caller's stats after the update, if they have any.
    pub user_stats: Option<UserStats>,
    /// Present when this update awarded XP.
    pub award: Option<AwardOutcome>,
}

pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    engine: Arc<GamificationEngine>,
    reminders: Arc<ReminderScanner>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        engine: Arc<GamificationEngine>,
        reminders: Arc<ReminderScanner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            engine,
            reminders,
            clock,
        }
    }

    pub async fn create(&self, user_id: &str, input: NewTask) -> Result<Task, TaskQuestError> {
        let now = self.clock.now();
        let priority = input.priority.unwrap_or_default();
        let status = input.status.unwrap_or_default();
        let reminder = match input.reminder {
            Some(r) => reminder_from(r, None)?,
            None => Reminder::default(),
        };

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: validate::title(&input.title)?,
            description: validate::description(input.description.as_deref())?,
            labels: validate::words(input.labels),
            tags: validate::words(input.tags),
            difficulty: input.difficulty.unwrap_or_default(),
            status,
            priority,
            xp_value: input.xp_value.unwrap_or_else(|| priority.xp_value()),
            due_date: input.due_date,
            xp_awarded: false,
            completed_at: (status == TaskStatus::Completed).then_some(now),
            reminder,
            overdue_notification_sent: false,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert_task(&task).await?;
        info!(user_id, task_id = %task.id, "task created");

        if task.reminder.enabled {
            return Ok(self.schedule(task).await);
        }
        Ok(task)
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Task, TaskQuestError> {
        self.tasks
            .get_task_for_user(user_id, id)
            .await?
            .ok_or_else(|| TaskQuestError::task_not_found(id))
    }

    pub async fn list(&self, user_id: &str, query: &TaskQuery) -> Result<Page<Task>, TaskQuestError> {
        let data = self.tasks.list_tasks(user_id, query).await?;
        let total = self.tasks.count_tasks(user_id).await?;
        Ok(Page::new(data, total, query))
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: TaskUpdate,
    ) -> Result<UpdateOutcome, TaskQuestError> {
        let mut task = self.get(user_id, id).await?;
        let now = self.clock.now();

        if let Some(title) = &update.title {
            task.title = validate::title(title)?;
        }
        if let Some(description) = &update.description {
            task.description = validate::description(description.as_deref())?;
        }
        if let Some(labels) = update.labels {
            task.labels = validate::words(labels);
        }
        if let Some(tags) = update.tags {
            task.tags = validate::words(tags);
        }
        if let Some(difficulty) = update.difficulty {
            task.difficulty = difficulty;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        let reminder_changed = update.reminder.is_some();
        if let Some(input) = update.reminder {
            task.reminder = reminder_from(input, Some(&task.reminder))?;
        }

        let was_completed = task.is_completed();
        if let Some(status) = update.status {
            task.status = status;
        }
        let completing = !was_completed && task.is_completed();
        if completing {
            task.completed_at = Some(now);
        } else if was_completed && !task.is_completed() {
            debug!(task_id = %task.id, "completion reverted, xp kept");
            task.completed_at = None;
        }

        let award = if completing && !task.xp_awarded {
            let award = self.engine.award_completion(&task).await?;
            // Whether we or a concurrent request awarded it, the flag is set in storage.
            task.xp_awarded = true;
            award
        } else {
            None
        };

        task.updated_at = now;
        self.tasks.update_task(&task).await?;
        info!(user_id, task_id = %task.id, status = %task.status, "task updated");

        let task = if reminder_changed {
            if task.reminder.enabled {
                self.schedule(task).await
            } else {
                if let Err(e) = self.reminders.cancel_reminder(&task.id).await {
                    warn!(task_id = %task.id, error = %e, "failed to cancel reminder");
                }
                task
            }
        } else {
            task
        };

        let user_stats = self.engine.stats(user_id).await?;
        Ok(UpdateOutcome {
            task,
            user_stats,
            award,
        })
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), TaskQuestError> {
        if !self.tasks.delete_task(user_id, id).await? {
            return Err(TaskQuestError::task_not_found(id));
        }
        info!(user_id, task_id = id, "task deleted");
        Ok(())
    }

    /// Best-effort reminder scheduling. The task is already stored, so
    /// failures here are logged and never surface to the caller.
    async fn schedule(&self, mut task: Task) -> Task {
        match self.reminders.schedule_reminder(&task.id).await {
            Ok(Scheduled::SentImmediately(_)) => {
                task.reminder.sent = true;
                match self.tasks.get_task(&task.id).await {
                    Ok(stored) => stored.unwrap_or(task),
                    Err(e) => {
                        warn!(task_id = %task.id, error = %e, "reminder sent but task reload failed");
                        task
                    }
                }
            }
            Ok(Scheduled::Pending { at }) => {
                debug!(task_id = %task.id, %at, "reminder scheduled");
                task
            }
            Ok(Scheduled::Inactive) => task,
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "reminder scheduling failed");
                task
            }
        }
    }
}

/// Merge reminder input over the current reminder.
///
/// An enabled reminder needs a time, either supplied or already set. Moving
/// the time or re-enabling clears `sent` so the new reminder can fire.
fn reminder_from(input: ReminderInput, current: Option<&Reminder>) -> Result<Reminder, TaskQuestError> {
    let current = current.cloned().unwrap_or_default();
    if !input.enabled {
        return Ok(Reminder {
            enabled: false,
            datetime: input.datetime.or(current.datetime),
            sent: false,
        });
    }
    let datetime = input.datetime.or(current.datetime).ok_or_else(|| {
        TaskQuestError::Validation("reminder datetime is required when enabled".into())
    })?;
    let rearmed = !current.enabled || current.datetime != Some(datetime);
    Ok(Reminder {
        enabled: true,
        datetime: Some(datetime),
        sent: current.sent && !rearmed,
    })
}
