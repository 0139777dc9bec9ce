// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! XP award engine.
//!
//! Every stats mutation for a user runs under that user's async mutex, and
//! the final write is a single store transaction. Together these make the
//! read-modify-write of a stats record atomic with respect to other awards
//! for the same user, while different users proceed in parallel. A user's
//! mutex is dropped from the map once no caller holds or awaits it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use taskquest_config::model::GamificationConfig;
use taskquest_core::{
    AwardOutcome, Clock, LeaderboardEntry, StatsStore, Task, TaskQuestError, UserStats,
};

use crate::level::level_for_xp;
use crate::streak::update_streak;

/// Largest leaderboard a caller can request.
pub const MAX_LEADERBOARD: u32 = 100;

/// One user's held stats lock.
struct UserGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    user_id: &'a str,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        // Release first so the map holds the last reference when idle.
        drop(self.guard.take());
        self.locks
            .remove_if(self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Applies XP, level, and streak changes to user stats.
pub struct GamificationEngine {
    store: Arc<dyn StatsStore>,
    clock: Arc<dyn Clock>,
    default_xp: u32,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl GamificationEngine {
    pub fn new(
        store: Arc<dyn StatsStore>,
        clock: Arc<dyn Clock>,
        config: &GamificationConfig,
    ) -> Self {
        Self {
            store,
            clock,
            default_xp: config.default_xp,
            locks: DashMap::new(),
        }
    }

    async fn lock_user<'a>(&'a self, user_id: &'a str) -> UserGuard<'a> {
        let lock = self
            .locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        UserGuard {
            locks: &self.locks,
            user_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// XP granted for completing `task`.
    pub fn xp_for(&self, task: &Task) -> u32 {
        if task.xp_value == 0 {
            self.default_xp
        } else {
            task.xp_value
        }
    }

    /// Award XP for a task that just transitioned into `completed`.
    ///
    /// Returns `Ok(None)` when the task has already been awarded, whether
    /// that was visible on `task` or happened concurrently before commit.
    /// A store failure fails the whole award; nothing is partially applied.
    pub async fn award_completion(
        &self,
        task: &Task,
    ) -> Result<Option<AwardOutcome>, TaskQuestError> {
        if task.xp_awarded {
            debug!(task_id = %task.id, "xp already awarded, skipping");
            return Ok(None);
        }

        let _guard = self.lock_user(&task.user_id).await;

        let mut stats = self.store.get_or_create_stats(&task.user_id).await?;
        let outcome = self.apply(&mut stats, u64::from(self.xp_for(task)));

        if !self.store.commit_award(&stats, &task.id).await? {
            debug!(task_id = %task.id, "xp awarded concurrently, discarding");
            return Ok(None);
        }

        info!(
            user_id = %task.user_id,
            task_id = %task.id,
            xp = outcome.xp,
            level = outcome.level,
            leveled_up = outcome.leveled_up,
            streak = outcome.current_streak,
            "xp awarded"
        );
        Ok(Some(outcome))
    }

    /// Grant XP outside any task. `amount` must be positive.
    pub async fn add_xp(&self, user_id: &str, amount: i64) -> Result<AwardOutcome, TaskQuestError> {
        let amount = u64::try_from(amount)
            .ok()
            .filter(|a| *a > 0)
            .ok_or_else(|| {
                TaskQuestError::Validation(format!("xp amount must be positive, got {amount}"))
            })?;

        let _guard = self.lock_user(user_id).await;

        let mut stats = self.store.get_or_create_stats(user_id).await?;
        let outcome = self.apply(&mut stats, amount);
        self.store.save_stats(&stats).await?;

        info!(user_id, amount, xp = outcome.xp, level = outcome.level, "manual xp granted");
        Ok(outcome)
    }

    /// Current stats, if the user has any.
    pub async fn stats(&self, user_id: &str) -> Result<Option<UserStats>, TaskQuestError> {
        self.store.get_stats(user_id).await
    }

    /// Top users by level, then XP. `limit` is clamped to `1..=MAX_LEADERBOARD`.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, TaskQuestError> {
        self.store
            .leaderboard(limit.clamp(1, MAX_LEADERBOARD))
            .await
    }

    fn apply(&self, stats: &mut UserStats, amount: u64) -> AwardOutcome {
        let previous_level = stats.level;
        stats.xp = stats.xp.saturating_add(amount);
        let new_level = level_for_xp(stats.xp);
        stats.level = new_level;
        let streak_updated = update_streak(stats, self.clock.today());

        AwardOutcome {
            xp: stats.xp,
            level: new_level,
            leveled_up: new_level > previous_level,
            new_level,
            current_streak: stats.streak,
            streak_updated,
        }
    }
}
