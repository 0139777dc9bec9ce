// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily completion streaks.

use chrono::NaiveDate;
use taskquest_core::UserStats;

/// Record a completion on `today`. Returns whether the streak changed.
///
/// | days since last completion | effect              |
/// |----------------------------|---------------------|
/// | 0                          | unchanged           |
/// | 1                          | streak + 1          |
/// | more than 1                | reset to 1          |
/// | none, or negative          | start at 1          |
///
/// `last_completed` moves to `today` whenever the streak changes.
pub fn update_streak(stats: &mut UserStats, today: NaiveDate) -> bool {
    let diff = stats
        .last_completed
        .map(|last| today.signed_duration_since(last).num_days());

    match diff {
        Some(0) => return false,
        Some(1) => stats.streak = stats.streak.saturating_add(1),
        _ => stats.streak = 1,
    }
    stats.last_completed = Some(today);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(n)
    }

    #[test]
    fn first_completion_starts_streak() {
        let mut stats = UserStats::new("u");
        assert!(update_streak(&mut stats, day(0)));
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.last_completed, Some(day(0)));
    }

    #[test]
    fn same_day_is_unchanged() {
        let mut stats = UserStats::new("u");
        update_streak(&mut stats, day(0));
        assert!(!update_streak(&mut stats, day(0)));
        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn consecutive_days_extend() {
        let mut stats = UserStats::new("u");
        update_streak(&mut stats, day(0));
        assert!(update_streak(&mut stats, day(1)));
        assert_eq!(stats.streak, 2);
    }

    #[test]
    fn gap_resets_to_one() {
        let mut stats = UserStats::new("u");
        update_streak(&mut stats, day(0));
        update_streak(&mut stats, day(1));
        assert!(update_streak(&mut stats, day(4)));
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.last_completed, Some(day(4)));
    }

    #[test]
    fn clock_going_backwards_resets() {
        let mut stats = UserStats::new("u");
        update_streak(&mut stats, day(5));
        update_streak(&mut stats, day(6));
        assert!(update_streak(&mut stats, day(2)));
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.last_completed, Some(day(2)));
    }

    proptest! {
        /// Completing every day for `n` days gives a streak of `n`, however
        /// many completions land on each day.
        #[test]
        fn daily_completions_count_days(n in 1i64..60, per_day in 1usize..4) {
            let mut stats = UserStats::new("u");
            for d in 0..n {
                for _ in 0..per_day {
                    update_streak(&mut stats, day(d));
                }
            }
            prop_assert_eq!(i64::from(stats.streak), n);
        }

        #[test]
        fn streak_is_never_zero_after_update(offsets in proptest::collection::vec(-5i64..10, 1..20)) {
            let mut stats = UserStats::new("u");
            for o in offsets {
                update_streak(&mut stats, day(o));
                prop_assert!(stats.streak >= 1);
            }
        }
    }
}
