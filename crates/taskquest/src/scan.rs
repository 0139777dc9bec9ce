// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taskquest scan` command implementation.
//!
//! Runs one reminder or overdue scan immediately and prints its report as
//! JSON, for cron-driven deployments that do not keep `serve` running.

use taskquest_core::TaskQuestError;
use taskquest_scheduler::ScanOutcome;

use crate::app::App;

/// Which scan to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScanKind {
    Reminders,
    Overdue,
}

pub async fn run_scan(app: &App, kind: ScanKind) -> Result<serde_json::Value, TaskQuestError> {
    let report = match kind {
        ScanKind::Reminders => match app.reminders.scan().await? {
            ScanOutcome::Completed(report) => serde_json::to_value(report),
            ScanOutcome::Skipped => return Err(TaskQuestError::ScanInProgress { scan: "reminder" }),
        },
        ScanKind::Overdue => match app.overdue.scan().await? {
            ScanOutcome::Completed(report) => serde_json::to_value(report),
            ScanOutcome::Skipped => return Err(TaskQuestError::ScanInProgress { scan: "overdue" }),
        },
    };
    report.map_err(|e| TaskQuestError::Internal(format!("failed to encode scan report: {e}")))
}
