// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduled notifications for TaskQuest.
//!
//! [`ReminderScanner`] sends each due task reminder once; [`OverdueScanner`]
//! sends one digest per user for newly overdue tasks. Both can be run on
//! demand or by the [`Scheduler`], and each skips a run while a previous
//! one is still in flight.

pub mod cadence;
pub mod error;
pub mod guard;
pub mod overdue;
pub mod reminder;
pub mod report;
pub mod runner;

pub use cadence::Cadence;
pub use error::SchedulingError;
pub use overdue::OverdueScanner;
pub use reminder::ReminderScanner;
pub use report::{OverdueScanReport, ReminderScanReport, ScanOutcome, Scheduled};
pub use runner::{Scheduler, SchedulerHandle};
