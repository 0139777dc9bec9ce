// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User stats persistence and the leaderboard.

use std::collections::BTreeSet;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use taskquest_core::types::{Achievement, LeaderboardEntry, UserStats};
use taskquest_core::TaskQuestError;

use crate::codec::{get_json, get_opt_date, ts};
use crate::database::{Database, map_tr_err};

fn stats_from_row(row: &Row<'_>) -> rusqlite::Result<UserStats> {
    let achievements: BTreeSet<Achievement> = get_json(row, 5)?;
    Ok(UserStats {
        user_id: row.get(0)?,
        xp: row.get(1)?,
        level: row.get(2)?,
        streak: row.get(3)?,
        last_completed: get_opt_date(row, 4)?,
        achievements,
    })
}

fn select_stats(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<UserStats>> {
    conn.query_row(
        "SELECT user_id, xp, level, streak, last_completed, achievements
         FROM user_stats WHERE user_id = ?1",
        params![user_id],
        stats_from_row,
    )
    .optional()
}

fn upsert_stats(conn: &Connection, stats: &UserStats) -> rusqlite::Result<()> {
    let now = ts(Utc::now());
    let achievements =
        serde_json::to_string(&stats.achievements).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "INSERT INTO user_stats
            (user_id, xp, level, streak, last_completed, achievements, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
         ON CONFLICT(user_id) DO UPDATE SET
            xp = excluded.xp, level = excluded.level, streak = excluded.streak,
            last_completed = excluded.last_completed, achievements = excluded.achievements,
            updated_at = excluded.updated_at",
        params![
            stats.user_id,
            stats.xp,
            stats.level,
            stats.streak,
            stats.last_completed.map(|d| d.format("%Y-%m-%d").to_string()),
            achievements,
            now,
        ],
    )?;
    Ok(())
}

/// Load the user's stats, inserting a zeroed record first if there is none.
pub async fn get_or_create_stats(db: &Database, user_id: &str) -> Result<UserStats, TaskQuestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let now = ts(Utc::now());
            tx.execute(
                "INSERT OR IGNORE INTO user_stats (user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?2)",
                params![user_id, now],
            )?;
            let stats = select_stats(&tx, &user_id)?
                .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            tx.commit()?;
            Ok(stats)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_stats(db: &Database, user_id: &str) -> Result<Option<UserStats>, TaskQuestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| select_stats(conn, &user_id))
        .await
        .map_err(map_tr_err)
}

/// Persist `stats` and flip the task's `xp_awarded` flag in one transaction.
///
/// The flag update is conditional on the flag still being clear; if another
/// writer got there first nothing is written and `false` is returned.
pub async fn commit_award(
    db: &Database,
    stats: &UserStats,
    task_id: &str,
) -> Result<bool, TaskQuestError> {
    let stats = stats.clone();
    let task_id = task_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let flipped = tx.execute(
                "UPDATE tasks SET xp_awarded = 1, updated_at = ?2
                 WHERE id = ?1 AND xp_awarded = 0",
                params![task_id, ts(Utc::now())],
            )?;
            if flipped == 0 {
                // Dropping the transaction rolls it back.
                return Ok(false);
            }
            upsert_stats(&tx, &stats)?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn save_stats(db: &Database, stats: &UserStats) -> Result<(), TaskQuestError> {
    let stats = stats.clone();
    db.connection()
        .call(move |conn| upsert_stats(conn, &stats))
        .await
        .map_err(map_tr_err)
}

/// Top `limit` users by level, then XP.
pub async fn leaderboard(db: &Database, limit: u32) -> Result<Vec<LeaderboardEntry>, TaskQuestError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT s.user_id, COALESCE(u.name, ''), s.xp, s.level, s.streak
                 FROM user_stats s LEFT JOIN users u ON u.id = s.user_id
                 ORDER BY s.level DESC, s.xp DESC, s.user_id ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(LeaderboardEntry {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    xp: row.get(2)?,
                    level: row.get(3)?,
                    streak: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
