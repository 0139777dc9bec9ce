// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the TaskQuest REST API.
//!
//! Every `/v1` handler receives the caller as an [`AuthUser`] extension set
//! by the auth middleware and scopes its work to that user.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use taskquest_core::TaskQuestError;
use taskquest_core::types::{
    AwardOutcome, LeaderboardEntry, NewTask, Page, SortSpec, Task, TaskQuery, TaskUpdate,
    UserStats,
};
use taskquest_gamification::MAX_LEADERBOARD;
use taskquest_scheduler::{OverdueScanReport, ReminderScanReport, ScanOutcome};
use taskquest_service::UpdateOutcome;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::GatewayState;

type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_LEADERBOARD: u32 = 10;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Query string for GET /v1/tasks.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// `field` or `field:asc|desc`.
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ListParams {
    fn into_query(self) -> Result<TaskQuery, TaskQuestError> {
        let sort = match self.sort_by.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<SortSpec>()?,
            _ => SortSpec::default(),
        };
        Ok(TaskQuery::new(sort, self.page, self.limit))
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Request body for POST /v1/stats/xp.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XpRequest {
    pub amount: i64,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| TaskQuestError::Validation(rejection.body_text()).into())
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| TaskQuestError::Validation(rejection.body_text()).into())
}

/// GET /health
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /v1/tasks
pub async fn list_tasks(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<Task>>> {
    let query = query(params)?.into_query()?;
    Ok(Json(state.tasks.list(&user.id, &query).await?))
}

/// POST /v1/tasks
pub async fn create_task(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let input = body(payload)?;
    let task = state.tasks.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /v1/tasks/{id}
pub async fn get_task(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.get(&user.id, &id).await?))
}

/// PUT /v1/tasks/{id}
pub async fn update_task(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> ApiResult<Json<UpdateOutcome>> {
    let update = body(payload)?;
    Ok(Json(state.tasks.update(&user.id, &id, update).await?))
}

/// DELETE /v1/tasks/{id}
pub async fn delete_task(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/stats/me
pub async fn get_my_stats(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Json<UserStats>> {
    match state.engine.stats(&user.id).await? {
        Some(stats) => Ok(Json(stats)),
        None => Err(TaskQuestError::NotFound {
            entity: "stats",
            id: user.id,
        }
        .into()),
    }
}

/// POST /v1/stats/xp
pub async fn post_xp(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<XpRequest>, JsonRejection>,
) -> ApiResult<Json<AwardOutcome>> {
    let XpRequest { amount } = body(payload)?;
    Ok(Json(state.engine.add_xp(&user.id, amount).await?))
}

/// GET /v1/leaderboard
pub async fn get_leaderboard(
    State(state): State<GatewayState>,
    params: Result<Query<LeaderboardParams>, QueryRejection>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let limit = query(params)?
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD)
        .clamp(1, MAX_LEADERBOARD);
    Ok(Json(state.engine.leaderboard(limit).await?))
}

/// GET /v1/overdue/mine
pub async fn get_my_overdue(
    State(state): State<GatewayState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.overdue.overdue_tasks_for_user(&user.id).await?))
}

/// POST /v1/overdue/check
pub async fn post_overdue_check(
    State(state): State<GatewayState>,
) -> ApiResult<Json<OverdueScanReport>> {
    match state.overdue.scan().await? {
        ScanOutcome::Completed(report) => Ok(Json(report)),
        ScanOutcome::Skipped => Err(TaskQuestError::ScanInProgress { scan: "overdue" }.into()),
    }
}

/// POST /v1/reminders/check
pub async fn post_reminders_check(
    State(state): State<GatewayState>,
) -> ApiResult<Json<ReminderScanReport>> {
    match state.reminders.scan().await? {
        ScanOutcome::Completed(report) => Ok(Json(report)),
        ScanOutcome::Skipped => Err(TaskQuestError::ScanInProgress { scan: "reminder" }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskquest_core::types::{SortField, SortOrder};

    #[test]
    fn list_params_default_to_newest_first() {
        let query = ListParams::default().into_query().unwrap();
        assert_eq!(query, TaskQuery::default());
        assert_eq!(query.sort.field, SortField::CreatedAt);
        assert_eq!(query.sort.order, SortOrder::Desc);
    }

    #[test]
    fn list_params_parse_sort_and_clamp_limit() {
        let params = ListParams {
            sort_by: Some("due_date:asc".into()),
            page: Some(0),
            limit: Some(500),
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.sort.field, SortField::DueDate);
        assert_eq!(query.sort.order, SortOrder::Asc);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn unknown_sort_field_is_a_validation_error() {
        let params = ListParams {
            sort_by: Some("colour".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(TaskQuestError::Validation(_))
        ));
    }
}
