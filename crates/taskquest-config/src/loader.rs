// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./taskquest.toml` > `~/.config/taskquest/taskquest.toml`
//! > `/etc/taskquest/taskquest.toml`, with environment variable overrides via
//! the `TASKQUEST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TaskQuestConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/taskquest/taskquest.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "taskquest.toml";

/// Sections addressable from environment variables.
const ENV_SECTIONS: &[&str] = &["server", "storage", "gamification", "scheduler", "mail"];

/// User config file under the XDG config dir, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("taskquest").join("taskquest.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/taskquest/taskquest.toml` (system-wide)
/// 3. `~/.config/taskquest/taskquest.toml` (user XDG config)
/// 4. `./taskquest.toml` (local directory)
/// 5. `TASKQUEST_*` environment variables
pub fn load_config() -> Result<TaskQuestConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TaskQuestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskQuestConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TaskQuestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskQuestConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TaskQuestConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys that contain
/// underscores survive: `TASKQUEST_SCHEDULER_OVERDUE_CRON` must become
/// `scheduler.overdue_cron`, not `scheduler.overdue.cron`.
fn env_provider() -> Env {
    Env::prefixed("TASKQUEST_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(
            map_env_key("scheduler_overdue_cron"),
            "scheduler.overdue_cron"
        );
        assert_eq!(map_env_key("mail_smtp_host"), "mail.smtp_host");
        assert_eq!(
            map_env_key("gamification_default_xp"),
            "gamification.default_xp"
        );
    }

    #[test]
    fn unknown_env_section_is_left_alone() {
        assert_eq!(map_env_key("serverless"), "serverless");
        assert_eq!(map_env_key("other_key"), "other_key");
    }
}
