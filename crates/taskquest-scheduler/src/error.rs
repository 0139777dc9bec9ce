// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors returned by reminder scheduling and scheduler setup.

use taskquest_core::TaskQuestError;

/// Why a reminder could not be scheduled, sent, or cancelled.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("owner {user_id} of task {task_id} not found")]
    OwnerNotFound { task_id: String, user_id: String },

    #[error("reminder delivery failed: {0}")]
    Delivery(#[source] TaskQuestError),

    #[error("task store error: {0}")]
    Store(#[source] TaskQuestError),

    #[error("invalid cadence: {0}")]
    InvalidCadence(String),
}

impl From<SchedulingError> for TaskQuestError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::TaskNotFound(id) => TaskQuestError::task_not_found(id),
            SchedulingError::OwnerNotFound { user_id, .. } => TaskQuestError::user_not_found(user_id),
            SchedulingError::Delivery(e) | SchedulingError::Store(e) => e,
            SchedulingError::InvalidCadence(msg) => TaskQuestError::Config(msg),
        }
    }
}
