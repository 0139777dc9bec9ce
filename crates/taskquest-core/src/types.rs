// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by every TaskQuest crate.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::TaskQuestError;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Lifecycle state of a task.
///
/// `pending` is accepted on input as a synonym of `todo` and never stored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "pending")]
    #[strum(to_string = "todo", serialize = "pending")]
    Todo,
    InProgress,
    Completed,
}

/// Task priority. Drives the XP value assigned at creation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// XP granted for completing a task of this priority.
    pub fn xp_value(self) -> u32 {
        match self {
            Priority::Low => 10,
            Priority::Medium => 20,
            Priority::High => 30,
        }
    }
}

/// Self-assessed difficulty. Informational only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Badges stored on a stats record. Nothing in TaskQuest grants them yet.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Achievement {
    #[serde(rename = "first_task")]
    #[strum(serialize = "first_task")]
    FirstTask,
    #[serde(rename = "streak_3")]
    #[strum(serialize = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    #[strum(serialize = "streak_7")]
    Streak7,
    #[serde(rename = "streak_30")]
    #[strum(serialize = "streak_30")]
    Streak30,
    #[serde(rename = "level_5")]
    #[strum(serialize = "level_5")]
    Level5,
    #[serde(rename = "level_10")]
    #[strum(serialize = "level_10")]
    Level10,
    #[serde(rename = "all_tasks_completed")]
    #[strum(serialize = "all_tasks_completed")]
    AllTasksCompleted,
}

/// One-shot reminder attached to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub enabled: bool,
    pub datetime: Option<DateTime<Utc>>,
    /// Set once the reminder has been delivered; cleared only by cancel or re-enable.
    pub sent: bool,
}

impl Reminder {
    /// Whether this reminder should fire at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && !self.sent && self.datetime.is_some_and(|at| at <= now)
    }
}

/// A user's task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Frozen at creation; priority changes do not recompute it.
    pub xp_value: u32,
    pub due_date: Option<DateTime<Utc>>,
    pub xp_awarded: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub reminder: Reminder,
    pub overdue_notification_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Past its due date and not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Gamification record, one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    pub last_completed: Option<NaiveDate>,
    pub achievements: BTreeSet<Achievement>,
}

impl UserStats {
    /// A fresh record with no XP and no streak.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            xp: 0,
            level: 0,
            streak: 0,
            last_completed: None,
            achievements: BTreeSet::new(),
        }
    }
}

/// Result of a successful XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardOutcome {
    pub xp: u64,
    pub level: u32,
    pub leveled_up: bool,
    pub new_level: u32,
    pub current_streak: u32,
    pub streak_updated: bool,
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub name: String,
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
}

/// Receipt from a mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
}

/// Reminder settings supplied on create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderInput {
    pub enabled: bool,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Overrides the priority-derived value.
    #[serde(default)]
    pub xp_value: Option<u32>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminder: Option<ReminderInput>,
}

/// Partial update of a task. Absent fields are left unchanged; `null` clears
/// the nullable ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub reminder: Option<ReminderInput>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Columns a task listing may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Priority,
    Title,
    Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Parsed `field:order` sort expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl FromStr for SortSpec {
    type Err = TaskQuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = match s.split_once(':') {
            Some((field, order)) => (field, Some(order)),
            None => (s, None),
        };
        let field = SortField::from_str(field.trim())
            .map_err(|_| TaskQuestError::Validation(format!("cannot sort by `{field}`")))?;
        let order = match order {
            Some(order) => SortOrder::from_str(&order.trim().to_ascii_lowercase()).map_err(
                |_| TaskQuestError::Validation(format!("sort order must be asc or desc, got `{order}`")),
            )?,
            None => SortOrder::default(),
        };
        Ok(Self { field, order })
    }
}

/// Maximum page size for any listing.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Sort and pagination for a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    pub sort: SortSpec,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            sort: SortSpec::default(),
            page: 1,
            limit: 10,
        }
    }
}

impl TaskQuery {
    /// Builds a query, clamping page to at least 1 and limit into `1..=100`.
    pub fn new(sort: SortSpec, page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            sort,
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, query: &TaskQuery) -> Self {
        Self {
            count: data.len(),
            total,
            page: query.page,
            pages: total.div_ceil(u64::from(query.limit)),
            data,
        }
    }
}
