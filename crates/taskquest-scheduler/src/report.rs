// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskquest_core::types::Delivery;

/// Result of asking a scanner to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome<R> {
    Completed(R),
    /// Another run of the same scan was still in progress.
    Skipped,
}

impl<R> ScanOutcome<R> {
    pub fn completed(self) -> Option<R> {
        match self {
            ScanOutcome::Completed(report) => Some(report),
            ScanOutcome::Skipped => None,
        }
    }
}

/// Per-task counts from one reminder scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderScanReport {
    pub sent: u32,
    pub failed: u32,
    /// Tasks whose owner could not be resolved.
    pub skipped: u32,
}

/// Per-user counts from one overdue scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverdueScanReport {
    pub sent: u32,
    pub failed: u32,
}

/// What `schedule_reminder` did with a task's reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheduled {
    /// The reminder time had already passed; it was sent now.
    SentImmediately(Delivery),
    /// The periodic reminder scan will send it at `at`.
    Pending { at: DateTime<Utc> },
    /// Disabled, without a time, already sent, or the task is completed.
    Inactive,
}
