// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for TaskQuest.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level TaskQuest configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskQuestConfig {
    /// HTTP server and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// XP award settings.
    #[serde(default)]
    pub gamification: GamificationConfig,

    /// Reminder and overdue scan cadence.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Instance name, shown in logs.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Address to bind the HTTP listener to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            log_level: default_log_level(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_server_name() -> String {
    "taskquest".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("taskquest").join("taskquest.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("taskquest.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// XP award configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GamificationConfig {
    /// XP granted for a completion whose task carries no XP value.
    #[serde(default = "default_xp")]
    pub default_xp: u32,
}

impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            default_xp: default_xp(),
        }
    }
}

fn default_xp() -> u32 {
    10
}

/// Notification scan configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Run the periodic scans inside `taskquest serve`.
    #[serde(default = "default_scheduler_enabled")]
    pub enabled: bool,

    /// Seconds between reminder scans.
    #[serde(default = "default_reminder_interval_secs")]
    pub reminder_interval_secs: u64,

    /// Cron expression (UTC) for the overdue scan.
    #[serde(default = "default_overdue_cron")]
    pub overdue_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_scheduler_enabled(),
            reminder_interval_secs: default_reminder_interval_secs(),
            overdue_cron: default_overdue_cron(),
        }
    }
}

fn default_scheduler_enabled() -> bool {
    true
}

fn default_reminder_interval_secs() -> u64 {
    60
}

fn default_overdue_cron() -> String {
    "0 9 * * *".to_string()
}

/// Outbound mail configuration.
///
/// Without `smtp_host` messages are logged instead of sent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// Sender address, optionally with a display name (`TaskQuest <noreply@example.com>`).
    #[serde(default = "default_from_address")]
    pub from_address: String,

    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Base URL used for links inside messages.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_from_address() -> String {
    "TaskQuest <noreply@taskquest.local>".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}
