// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taskquest doctor` command implementation.
//!
//! Runs diagnostic checks against the configured database, mail transport,
//! and scan schedule.

use std::time::{Duration, Instant};

use chrono::Utc;
use taskquest_config::model::TaskQuestConfig;
use taskquest_core::{Adapter, HealthStatus, TaskQuestError};
use taskquest_scheduler::Cadence;

use crate::app::App;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `taskquest doctor` command.
pub async fn run_doctor(config: &TaskQuestConfig) -> Result<(), TaskQuestError> {
    let mut results = Vec::new();
    results.push(check_schedule(config));

    match App::open(config).await {
        Ok(app) => {
            results.push(check_adapter("Database", app.storage.as_ref()).await);
            results.push(check_adapter("Mail", app.mailer.as_ref()).await);
            app.close().await?;
        }
        Err(e) => {
            results.push(CheckResult::new(
                "Startup",
                CheckStatus::Fail,
                e.to_string(),
                Instant::now(),
            ));
        }
    }

    println!();
    println!("  taskquest doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!(
            "    {tag} {:<20} {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
    }

    println!();
    match issues {
        0 => println!("  All checks passed."),
        1 => println!("  1 issue found."),
        n => println!("  {n} issues found."),
    }
    println!();

    Ok(())
}

/// Reports the next run of each scan, or a failure if a cadence is invalid.
fn check_schedule(config: &TaskQuestConfig) -> CheckResult {
    let start = Instant::now();
    let scheduler = &config.scheduler;
    if !scheduler.enabled {
        return CheckResult::new("Scheduler", CheckStatus::Warn, "disabled", start);
    }
    let cron = match Cadence::cron(&scheduler.overdue_cron) {
        Ok(cadence) => cadence,
        Err(e) => return CheckResult::new("Scheduler", CheckStatus::Fail, e.to_string(), start),
    };
    match cron.delay_from(Utc::now()) {
        Some(delay) => CheckResult::new(
            "Scheduler",
            CheckStatus::Pass,
            format!(
                "reminders every {}s, next overdue scan in {}m",
                scheduler.reminder_interval_secs,
                delay.as_secs() / 60
            ),
            start,
        ),
        None => CheckResult::new(
            "Scheduler",
            CheckStatus::Warn,
            format!("overdue cron `{cron}` never fires"),
            start,
        ),
    }
}

async fn check_adapter<A: Adapter + ?Sized>(name: &str, adapter: &A) -> CheckResult {
    let start = Instant::now();
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new(name, CheckStatus::Pass, format!("{} ok", adapter.name()), start)
        }
        Ok(HealthStatus::Degraded(reason)) => CheckResult::new(name, CheckStatus::Warn, reason, start),
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new(name, CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    }
}
