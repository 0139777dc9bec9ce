// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gamification for TaskQuest: XP, levels, and daily streaks.
//!
//! [`GamificationEngine`] is the only writer of user stats. It is invoked
//! once per task transition into `completed` and for manual XP grants.

pub mod engine;
pub mod level;
pub mod streak;

pub use engine::{GamificationEngine, MAX_LEADERBOARD};
pub use level::{level_for_xp, xp_for_level};
pub use streak::update_streak;
