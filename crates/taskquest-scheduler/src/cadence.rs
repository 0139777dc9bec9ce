// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! When a scan loop fires next.

use std::time::Duration;

use chrono::{DateTime, Utc};
use croner::Cron;

use crate::error::SchedulingError;

#[derive(Debug, Clone)]
pub enum Cadence {
    /// Fixed delay between the end of one run and the start of the next.
    Every(Duration),
    /// Wall-clock schedule, evaluated in UTC.
    Cron { expr: String, schedule: Box<Cron> },
}

impl Cadence {
    pub fn every_secs(secs: u64) -> Result<Self, SchedulingError> {
        if secs == 0 {
            return Err(SchedulingError::InvalidCadence(
                "interval must be at least one second".into(),
            ));
        }
        Ok(Cadence::Every(Duration::from_secs(secs)))
    }

    pub fn cron(expr: &str) -> Result<Self, SchedulingError> {
        let cron: Cron = expr
            .parse()
            .map_err(|e| SchedulingError::InvalidCadence(format!("`{expr}`: {e}")))?;
        Ok(Cadence::Cron {
            expr: expr.to_string(),
            schedule: Box::new(cron),
        })
    }

    /// How long to wait from `now` until the next run, or `None` if the
    /// schedule has no further occurrence.
    pub fn delay_from(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Cadence::Every(every) => Some(*every),
            Cadence::Cron { schedule, .. } => {
                let next = schedule.find_next_occurrence(&now, false).ok()?;
                (next - now).to_std().ok()
            }
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cadence::Every(every) => write!(f, "every {}s", every.as_secs()),
            Cadence::Cron { expr, .. } => write!(f, "cron `{expr}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn interval_is_constant() {
        let cadence = Cadence::every_secs(60).unwrap();
        assert_eq!(cadence.delay_from(Utc::now()), Some(Duration::from_secs(60)));
        assert!(Cadence::every_secs(0).is_err());
    }

    #[test]
    fn daily_cron_waits_until_nine_utc() {
        let cadence = Cadence::cron("0 9 * * *").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(cadence.delay_from(now), Some(Duration::from_secs(30 * 60)));

        let after = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(
            cadence.delay_from(after),
            Some(Duration::from_secs(24 * 3600))
        );
    }

    #[test]
    fn bad_cron_is_rejected() {
        assert!(matches!(
            Cadence::cron("not a cron"),
            Err(SchedulingError::InvalidCadence(_))
        ));
    }
}
