// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use taskquest_config::model::GamificationConfig;
use taskquest_core::SystemClock;
use taskquest_gamification::GamificationEngine;
use taskquest_gateway::{GatewayState, HealthState, build_router};
use taskquest_scheduler::{OverdueScanner, ReminderScanner};
use taskquest_service::TaskService;
use taskquest_test_utils::{MockMailer, TestStore};

struct Api {
    store: TestStore,
    mailer: MockMailer,
    router: Router,
    token: String,
}

async fn api() -> Api {
    let store = TestStore::new().await.unwrap();
    let mailer = MockMailer::new();
    let clock = Arc::new(SystemClock);
    let engine = Arc::new(GamificationEngine::new(
        store.storage.clone(),
        clock.clone(),
        &GamificationConfig::default(),
    ));
    let reminders = Arc::new(ReminderScanner::new(
        store.storage.clone(),
        store.storage.clone(),
        Arc::new(mailer.clone()),
        clock.clone(),
    ));
    let overdue = Arc::new(OverdueScanner::new(
        store.storage.clone(),
        store.storage.clone(),
        Arc::new(mailer.clone()),
        clock.clone(),
    ));
    let tasks = Arc::new(TaskService::new(
        store.storage.clone(),
        engine.clone(),
        reminders.clone(),
        clock,
    ));
    let router = build_router(GatewayState {
        tasks,
        engine,
        reminders,
        overdue,
        identity: store.storage.clone(),
        health: HealthState::default(),
    });
    let (_, token) = store.add_user("Ada", "ada@example.com").await.unwrap();
    Api {
        store,
        mailer,
        router,
        token,
    }
}

impl Api {
    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call_as(&self.token, method, uri, body).await
    }

    async fn call_as(
        &self,
        token: &str,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"));
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn health_is_public() {
    let api = api().await;
    let response = api
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn v1_requires_a_known_token() {
    let api = api().await;
    let (status, body) = api.call_as("not-a-token", "GET", "/v1/tasks", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let response = api
        .router
        .clone()
        .oneshot(Request::get("/v1/tasks").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_list_get_delete() {
    let api = api().await;
    let (status, created) = api
        .call("POST", "/v1/tasks", Some(json!({"title": "  Write report ", "priority": "high"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Write report");
    assert_eq!(created["xp_value"], 30);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, page) = api.call("GET", "/v1/tasks?sort_by=title:asc&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["pages"], 1);
    assert_eq!(page["data"][0]["id"], id.as_str());

    let (status, _) = api.call("GET", &format!("/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = api.call("DELETE", &format!("/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = api.call("GET", &format!("/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn validation_errors_are_400() {
    let api = api().await;
    let (status, body) = api.call("POST", "/v1/tasks", Some(json!({"title": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));

    let (status, _) = api
        .call("POST", "/v1/tasks", Some(json!({"title": "x", "colour": "red"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.call("GET", "/v1/tasks?sort_by=colour", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.call("POST", "/v1/stats/xp", Some(json!({"amount": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_users_tasks_are_not_found() {
    let api = api().await;
    let (_, created) = api.call("POST", "/v1/tasks", Some(json!({"title": "mine"}))).await;
    let id = created["id"].as_str().unwrap();

    let (_, bob_token) = api.store.add_user("Bob", "bob@example.com").await.unwrap();
    let (status, _) = api
        .call_as(&bob_token, "GET", &format!("/v1/tasks/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = api
        .call_as(&bob_token, "DELETE", &format!("/v1/tasks/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn completing_a_task_awards_xp_once() {
    let api = api().await;
    let (status, _) = api.call("GET", "/v1/stats/me", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, created) = api.call("POST", "/v1/tasks", Some(json!({"title": "ship it"}))).await;
    let uri = format!("/v1/tasks/{}", created["id"].as_str().unwrap());

    let (status, outcome) = api.call("PUT", &uri, Some(json!({"status": "completed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["task"]["xp_awarded"], true);
    assert_eq!(outcome["award"]["xp"], 20);
    assert_eq!(outcome["user_stats"]["xp"], 20);

    api.call("PUT", &uri, Some(json!({"status": "pending"}))).await;
    let (_, again) = api.call("PUT", &uri, Some(json!({"status": "completed"}))).await;
    assert_eq!(again["award"], Value::Null);

    let (status, stats) = api.call("GET", "/v1/stats/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["xp"], 20);
    assert_eq!(stats["streak"], 1);
}

#[tokio::test]
async fn manual_xp_and_leaderboard() {
    let api = api().await;
    let (status, award) = api.call("POST", "/v1/stats/xp", Some(json!({"amount": 400}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(award["xp"], 400);
    assert_eq!(award["level"], 2);
    assert_eq!(award["leveled_up"], true);

    let (status, board) = api.call("GET", "/v1/leaderboard?limit=1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board.as_array().unwrap().len(), 1);
    assert_eq!(board[0]["name"], "Ada");
}

#[tokio::test]
async fn overdue_listing_and_manual_scan() {
    let api = api().await;
    let due = (Utc::now() - Duration::days(1)).to_rfc3339();
    api.call("POST", "/v1/tasks", Some(json!({"title": "late", "due_date": due})))
        .await;

    let (status, mine) = api.call("GET", "/v1/overdue/mine", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, report) = api.call("POST", "/v1/overdue/check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({"sent": 1, "failed": 0}));
    assert_eq!(api.mailer.sent_count().await, 1);

    let (_, report) = api.call("POST", "/v1/overdue/check", None).await;
    assert_eq!(report, json!({"sent": 0, "failed": 0}));
}

#[tokio::test]
async fn past_reminder_is_sent_on_create() {
    let api = api().await;
    let at = (Utc::now() - Duration::minutes(5)).to_rfc3339();
    let (status, created) = api
        .call(
            "POST",
            "/v1/tasks",
            Some(json!({"title": "call mum", "reminder": {"enabled": true, "datetime": at}})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["reminder"]["sent"], true);
    assert_eq!(api.mailer.sent_count().await, 1);

    let (status, report) = api.call("POST", "/v1/reminders/check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({"sent": 0, "failed": 0, "skipped": 0}));
}
