// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid IP addresses, non-empty paths, and parseable cron expressions.

use crate::diagnostic::ConfigError;
use crate::model::TaskQuestConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TaskQuestConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        fail("server.bind_address must not be empty".to_string());
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.bind_address `{addr}` is not a valid IP address or hostname"
            ));
        }
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        fail(format!(
            "server.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.server.log_level
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.gamification.default_xp == 0 {
        fail("gamification.default_xp must be greater than 0".to_string());
    }

    if config.scheduler.reminder_interval_secs == 0 {
        fail("scheduler.reminder_interval_secs must be at least 1".to_string());
    }

    if let Err(e) = config.scheduler.overdue_cron.parse::<croner::Cron>() {
        fail(format!(
            "scheduler.overdue_cron `{}` is not a valid cron expression: {e}",
            config.scheduler.overdue_cron
        ));
    }

    if !config.mail.from_address.contains('@') {
        fail(format!(
            "mail.from_address `{}` is not an email address",
            config.mail.from_address
        ));
    }

    if let Some(host) = &config.mail.smtp_host {
        if host.trim().is_empty() {
            fail("mail.smtp_host must not be empty when set".to_string());
        }
    }

    if config.mail.smtp_username.is_some() != config.mail.smtp_password.is_some() {
        fail("mail.smtp_username and mail.smtp_password must be set together".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
