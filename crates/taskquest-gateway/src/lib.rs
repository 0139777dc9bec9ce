// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for TaskQuest.
//!
//! An axum server exposing the task, stats, leaderboard, and scan endpoints.
//! All `/v1` routes require `Authorization: Bearer <token>`; `/health` is
//! public.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthUser;
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
