// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use taskquest_core::TaskQuestError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A handler error. Server-side failures are logged and answered with a
/// generic message.
#[derive(Debug)]
pub struct ApiError(pub TaskQuestError);

impl From<TaskQuestError> for ApiError {
    fn from(err: TaskQuestError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TaskQuestError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskQuestError::NotFound { .. } => StatusCode::NOT_FOUND,
            TaskQuestError::Unauthorized => StatusCode::UNAUTHORIZED,
            TaskQuestError::ScanInProgress { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
