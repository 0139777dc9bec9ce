// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete TaskQuest pipeline.
//!
//! Each test wires a temp SQLite database, a mock mailer, and a fixed clock
//! through the task service, the gamification engine, the scanners, and
//! the HTTP router. Tests are independent and order-insensitive.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use taskquest_config::model::GamificationConfig;
use taskquest_core::FixedClock;
use taskquest_gamification::GamificationEngine;
use taskquest_gateway::{GatewayState, HealthState, build_router};
use taskquest_scheduler::{Cadence, OverdueScanner, ReminderScanner, Scheduler};
use taskquest_service::TaskService;
use taskquest_test_utils::{MockMailer, SentMail, TestStore};

struct Pipeline {
    store: TestStore,
    mailer: MockMailer,
    clock: Arc<FixedClock>,
    reminders: Arc<ReminderScanner>,
    overdue: Arc<OverdueScanner>,
    router: Router,
    user_id: String,
    token: String,
}

fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, n, 10, 0, 0).unwrap()
}

async fn pipeline() -> Pipeline {
    let store = TestStore::new().await.unwrap();
    let mailer = MockMailer::new();
    let clock = Arc::new(FixedClock::new(day(1)));
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
        clock.clone(),
    ));
    let router = build_router(GatewayState {
        tasks,
        engine,
        reminders: reminders.clone(),
        overdue: overdue.clone(),
        identity: store.storage.clone(),
        health: HealthState::default(),
    });
    let (user, token) = store.add_user("Ada", "ada@example.com").await.unwrap();
    Pipeline {
        store,
        mailer,
        clock,
        reminders,
        overdue,
        router,
        user_id: user.id,
        token,
    }
}

impl Pipeline {
    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", self.token));
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

    async fn create(&self, body: Value) -> String {
        let (status, task) = self.call("POST", "/v1/tasks", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{task}");
        task["id"].as_str().unwrap().to_string()
    }

    async fn set_status(&self, id: &str, status: &str) -> Value {
        let (code, outcome) = self
            .call("PUT", &format!("/v1/tasks/{id}"), Some(json!({"status": status})))
            .await;
        assert_eq!(code, StatusCode::OK, "{outcome}");
        outcome
    }

    async fn stats(&self) -> Value {
        let (status, stats) = self.call("GET", "/v1/stats/me", None).await;
        assert_eq!(status, StatusCode::OK);
        stats
    }

    fn scheduler(&self, every: StdDuration) -> Scheduler {
        Scheduler::new(
            self.reminders.clone(),
            self.overdue.clone(),
            self.clock.clone(),
            Cadence::Every(every),
            Cadence::Every(every),
        )
    }
}

async fn wait_for_mail(mailer: &MockMailer, count: usize) {
    tokio::time::timeout(StdDuration::from_secs(5), async {
        while mailer.sent_count().await < count {
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
    })
    .await
    .expect("scheduler did not send in time");
}

// ---- Gamification ----

#[tokio::test]
async fn completion_awards_xp_exactly_once() {
    let p = pipeline().await;
    let id = p.create(json!({"title": "Water plants"})).await;

    let first = p.set_status(&id, "completed").await;
    assert_eq!(first["task"]["xp_awarded"], true);
    assert_eq!(first["award"]["xp"], 20);
    assert_eq!(first["award"]["level"], 0);
    assert_eq!(first["award"]["streak_updated"], true);

    let reopened = p.set_status(&id, "todo").await;
    assert_eq!(reopened["task"]["completed_at"], Value::Null);
    assert_eq!(reopened["task"]["xp_awarded"], true);

    let second = p.set_status(&id, "completed").await;
    assert_eq!(second["award"], Value::Null);

    let stats = p.stats().await;
    assert_eq!(stats["xp"], 20);
    assert_eq!(stats["level"], 0);
    assert_eq!(stats["streak"], 1);
}

#[tokio::test]
async fn streak_follows_calendar_days() {
    let p = pipeline().await;
    let a = p.create(json!({"title": "a"})).await;
    let b = p.create(json!({"title": "b"})).await;
    let c = p.create(json!({"title": "c"})).await;
    let d = p.create(json!({"title": "d"})).await;

    assert_eq!(p.set_status(&a, "completed").await["award"]["current_streak"], 1);
    let same_day = p.set_status(&b, "completed").await;
    assert_eq!(same_day["award"]["current_streak"], 1);
    assert_eq!(same_day["award"]["streak_updated"], false);

    p.clock.set(day(2));
    assert_eq!(p.set_status(&c, "completed").await["award"]["current_streak"], 2);

    p.clock.set(day(5));
    assert_eq!(p.set_status(&d, "completed").await["award"]["current_streak"], 1);
}

#[tokio::test]
async fn uncompleting_never_takes_progress_back() {
    let p = pipeline().await;
    let (_, award) = p
        .call("POST", "/v1/stats/xp", Some(json!({"amount": 380})))
        .await;
    assert_eq!(award["level"], 1);

    let id = p.create(json!({"title": "boss fight", "priority": "high"})).await;
    let done = p.set_status(&id, "completed").await;
    assert_eq!(done["award"]["xp"], 410);
    assert_eq!(done["award"]["leveled_up"], true);
    assert_eq!(done["award"]["new_level"], 2);

    let before = p.stats().await;
    p.set_status(&id, "in-progress").await;
    p.call("DELETE", &format!("/v1/tasks/{id}"), None).await;
    let after = p.stats().await;
    assert_eq!(before["xp"], after["xp"]);
    assert_eq!(before["streak"], after["streak"]);
    assert_eq!(after["level"], 2);
}

// ---- Scheduled notifications ----

#[tokio::test]
async fn scheduler_sends_one_overdue_digest_per_user() {
    let p = pipeline().await;
    let first = p
        .store
        .task_due(&p.user_id, "late 1", day(1) - Duration::days(1))
        .await
        .unwrap();
    let second = p
        .store
        .task_due(&p.user_id, "late 2", day(1) - Duration::hours(1))
        .await
        .unwrap();

    let handle = p
        .scheduler(StdDuration::from_millis(20))
        .start(CancellationToken::new());
    wait_for_mail(&p.mailer, 1).await;
    // Let a few more ticks pass; nothing else may be sent.
    tokio::time::sleep(StdDuration::from_millis(100)).await;
    handle.stop().await;

    let sent = p.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        SentMail::OverdueDigest { to, task_ids } => {
            assert_eq!(to, "ada@example.com");
            assert_eq!(task_ids.len(), 2);
        }
        other => panic!("unexpected mail {other:?}"),
    }
    assert!(p.store.reload(&first.id).await.unwrap().overdue_notification_sent);
    assert!(p.store.reload(&second.id).await.unwrap().overdue_notification_sent);
}

#[tokio::test]
async fn scheduler_sends_due_reminder_once() {
    let p = pipeline().await;
    let task = p
        .store
        .task_with_reminder(&p.user_id, "stretch", day(1) - Duration::minutes(1))
        .await
        .unwrap();
    let future = p
        .store
        .task_with_reminder(&p.user_id, "later", day(1) + Duration::hours(1))
        .await
        .unwrap();

    let handle = p
        .scheduler(StdDuration::from_millis(20))
        .start(CancellationToken::new());
    wait_for_mail(&p.mailer, 1).await;
    tokio::time::sleep(StdDuration::from_millis(100)).await;
    handle.stop().await;

    assert_eq!(p.mailer.reminded_task_ids().await, vec![task.id.clone()]);
    assert!(p.store.reload(&task.id).await.unwrap().reminder.sent);
    assert!(!p.store.reload(&future.id).await.unwrap().reminder.sent);
}

#[tokio::test]
async fn failed_reminder_is_retried_on_a_later_scan() {
    let p = pipeline().await;
    let task = p
        .store
        .task_with_reminder(&p.user_id, "pay rent", day(1) - Duration::minutes(5))
        .await
        .unwrap();
    p.mailer.fail_all(true).await;

    let (_, report) = p.call("POST", "/v1/reminders/check", None).await;
    assert_eq!(report, json!({"sent": 0, "failed": 1, "skipped": 0}));
    assert!(!p.store.reload(&task.id).await.unwrap().reminder.sent);

    p.mailer.fail_all(false).await;
    let (_, report) = p.call("POST", "/v1/reminders/check", None).await;
    assert_eq!(report, json!({"sent": 1, "failed": 0, "skipped": 0}));
    let (_, report) = p.call("POST", "/v1/reminders/check", None).await;
    assert_eq!(report["sent"], 0);
}

#[tokio::test]
async fn reminder_set_through_api_fires_when_its_time_comes() {
    let p = pipeline().await;
    let at = (day(1) + Duration::minutes(30)).to_rfc3339();
    let id = p
        .create(json!({"title": "stand-up", "reminder": {"enabled": true, "datetime": at}}))
        .await;
    assert_eq!(p.mailer.sent_count().await, 0);

    p.clock.advance(Duration::minutes(31));
    let (_, report) = p.call("POST", "/v1/reminders/check", None).await;
    assert_eq!(report["sent"], 1);
    assert_eq!(p.mailer.reminded_task_ids().await, vec![id.clone()]);

    // Moving the reminder to a later time arms it again.
    let later = (day(1) + Duration::hours(2)).to_rfc3339();
    p.call(
        "PUT",
        &format!("/v1/tasks/{id}"),
        Some(json!({"reminder": {"enabled": true, "datetime": later}})),
    )
    .await;
    p.clock.advance(Duration::hours(2));
    let (_, report) = p.call("POST", "/v1/reminders/check", None).await;
    assert_eq!(report["sent"], 1);
    assert_eq!(p.mailer.sent_count().await, 2);
}

#[tokio::test]
async fn completed_task_is_never_overdue() {
    let p = pipeline().await;
    let due = (day(1) + Duration::hours(1)).to_rfc3339();
    let id = p.create(json!({"title": "tax return", "due_date": due})).await;
    p.set_status(&id, "completed").await;

    p.clock.advance(Duration::days(1));
    let (_, mine) = p.call("GET", "/v1/overdue/mine", None).await;
    assert_eq!(mine, json!([]));
    let (_, report) = p.call("POST", "/v1/overdue/check", None).await;
    assert_eq!(report, json!({"sent": 0, "failed": 0}));
}
