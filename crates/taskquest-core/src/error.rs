// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for TaskQuest.

use thiserror::Error;

/// The primary error type used across all TaskQuest crates and collaborator traits.
#[derive(Debug, Error)]
pub enum TaskQuestError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected before any state was mutated.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested entity does not exist, or is not owned by the caller.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Missing or unrecognized credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Mail collaborator failed to deliver a message.
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A scan of the named kind is already running.
    #[error("{scan} scan already in progress")]
    ScanInProgress { scan: &'static str },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskQuestError {
    /// Shorthand for a task lookup miss.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "task",
            id: id.into(),
        }
    }

    /// Shorthand for a user lookup miss.
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "user",
            id: id.into(),
        }
    }

    /// Whether a retry by the calling layer could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Delivery { .. } | Self::Timeout { .. }
        )
    }
}
