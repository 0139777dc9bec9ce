// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskquest_core::{IdentityProvider, TaskQuestError};
use taskquest_gamification::GamificationEngine;
use taskquest_scheduler::{OverdueScanner, ReminderScanner};
use taskquest_service::TaskService;

use crate::auth::auth_middleware;
use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub tasks: Arc<TaskService>,
    pub engine: Arc<GamificationEngine>,
    pub reminders: Arc<ReminderScanner>,
    pub overdue: Arc<OverdueScanner>,
    /// Resolves bearer tokens to users.
    pub identity: Arc<dyn IdentityProvider>,
    pub health: HealthState,
}

/// Address the gateway binds to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the full route table.
///
/// - GET /health (public)
/// - /v1/tasks, /v1/tasks/{id}
/// - /v1/stats/me, /v1/stats/xp, /v1/leaderboard
/// - /v1/overdue/mine, /v1/overdue/check, /v1/reminders/check
pub fn build_router(state: GatewayState) -> Router {
    let identity = state.identity.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/v1/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/v1/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/v1/stats/me", get(handlers::get_my_stats))
        .route("/v1/stats/xp", post(handlers::post_xp))
        .route("/v1/leaderboard", get(handlers::get_leaderboard))
        .route("/v1/overdue/mine", get(handlers::get_my_overdue))
        .route("/v1/overdue/check", post(handlers::post_overdue_check))
        .route("/v1/reminders/check", post(handlers::post_reminders_check))
        .route_layer(axum_middleware::from_fn_with_state(
            identity,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves the gateway until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), TaskQuestError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TaskQuestError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| TaskQuestError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
