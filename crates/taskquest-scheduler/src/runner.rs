// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background loops driving the reminder and overdue scans.
//!
//! Each scan gets one task that sleeps until its next cadence instant, runs
//! the scan to completion, and repeats. Cancelling the token stops further
//! ticks; a scan already running is allowed to finish.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use taskquest_config::model::SchedulerConfig;
use taskquest_core::Clock;

use crate::cadence::Cadence;
use crate::error::SchedulingError;
use crate::overdue::OverdueScanner;
use crate::reminder::ReminderScanner;
use crate::report::ScanOutcome;

pub struct Scheduler {
    reminders: Arc<ReminderScanner>,
    overdue: Arc<OverdueScanner>,
    clock: Arc<dyn Clock>,
    reminder_cadence: Cadence,
    overdue_cadence: Cadence,
}

/// Running scheduler. Dropping it does not stop the loops; call [`stop`](Self::stop).
pub struct SchedulerHandle {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(
        reminders: Arc<ReminderScanner>,
        overdue: Arc<OverdueScanner>,
        clock: Arc<dyn Clock>,
        reminder_cadence: Cadence,
        overdue_cadence: Cadence,
    ) -> Self {
        Self {
            reminders,
            overdue,
            clock,
            reminder_cadence,
            overdue_cadence,
        }
    }

    /// Build with the cadences from `[scheduler]`.
    pub fn from_config(
        config: &SchedulerConfig,
        reminders: Arc<ReminderScanner>,
        overdue: Arc<OverdueScanner>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SchedulingError> {
        Ok(Self::new(
            reminders,
            overdue,
            clock,
            Cadence::every_secs(config.reminder_interval_secs)?,
            Cadence::cron(&config.overdue_cron)?,
        ))
    }

    /// Spawn both scan loops. `cancel` is typically the process shutdown token.
    pub fn start(self, cancel: CancellationToken) -> SchedulerHandle {
        info!(
            reminders = %self.reminder_cadence,
            overdue = %self.overdue_cadence,
            "scheduler started"
        );

        let reminders = self.reminders;
        let reminder_loop = spawn_loop(
            "reminder",
            self.reminder_cadence,
            self.clock.clone(),
            cancel.clone(),
            move || {
                let reminders = reminders.clone();
                async move {
                    match reminders.scan().await {
                        Ok(ScanOutcome::Completed(_)) => {}
                        Ok(ScanOutcome::Skipped) => debug!("reminder tick skipped"),
                        Err(e) => warn!(error = %e, "reminder scan failed (non-fatal)"),
                    }
                }
            },
        );

        let overdue = self.overdue;
        let overdue_loop = spawn_loop(
            "overdue",
            self.overdue_cadence,
            self.clock,
            cancel.clone(),
            move || {
                let overdue = overdue.clone();
                async move {
                    match overdue.scan().await {
                        Ok(ScanOutcome::Completed(_)) => {}
                        Ok(ScanOutcome::Skipped) => debug!("overdue tick skipped"),
                        Err(e) => warn!(error = %e, "overdue scan failed (non-fatal)"),
                    }
                }
            },
        );

        SchedulerHandle {
            cancel,
            tasks: vec![reminder_loop, overdue_loop],
        }
    }
}

fn spawn_loop<F, Fut>(
    name: &'static str,
    cadence: Cadence,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    mut run: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let Some(delay) = cadence.delay_from(clock.now()) else {
                error!(scan = name, %cadence, "schedule has no next occurrence, loop stopping");
                break;
            };
            tokio::select! {
                _ = tokio::time::sleep(delay) => run().await,
                _ = cancel.cancelled() => {
                    info!(scan = name, "scan loop shutting down");
                    break;
                }
            }
        }
    })
}

impl SchedulerHandle {
    /// Stop scheduling ticks and wait for both loops to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "scan loop ended abnormally");
            }
        }
        info!("scheduler stopped");
    }
}
