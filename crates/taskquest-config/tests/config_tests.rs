// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the TaskQuest configuration system.

use figment::Jail;
use taskquest_config::diagnostic::{ConfigError, suggest_key};
use taskquest_config::model::TaskQuestConfig;
use taskquest_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[server]
name = "tq-test"
log_level = "debug"
bind_address = "0.0.0.0"
port = 8080

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[gamification]
default_xp = 15

[scheduler]
enabled = false
reminder_interval_secs = 30
overdue_cron = "*/5 * * * *"

[mail]
from_address = "bot@example.com"
smtp_host = "smtp.example.com"
smtp_port = 2525
smtp_username = "bot"
smtp_password = "hunter2"
frontend_url = "https://tasks.example.com"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.name, "tq-test");
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gamification.default_xp, 15);
    assert!(!config.scheduler.enabled);
    assert_eq!(config.scheduler.reminder_interval_secs, 30);
    assert_eq!(config.scheduler.overdue_cron, "*/5 * * * *");
    assert_eq!(config.mail.smtp_host.as_deref(), Some("smtp.example.com"));
    assert_eq!(config.mail.smtp_port, 2525);
    assert_eq!(config.mail.frontend_url, "https://tasks.example.com");
}

/// Sections left out of the file fall back to compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should load");
    let defaults = TaskQuestConfig::default();
    assert_eq!(config.server.port, defaults.server.port);
    assert_eq!(config.gamification.default_xp, 10);
    assert_eq!(config.scheduler.reminder_interval_secs, 60);
    assert_eq!(config.scheduler.overdue_cron, "0 9 * * *");
    assert!(config.mail.smtp_host.is_none());
}

/// Unknown top-level sections are rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown section should fail");
    assert!(errors.iter().any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "telegram")));
}

/// Unknown key in [scheduler] carries a suggestion, the valid keys, and a span.
#[test]
fn unknown_key_in_scheduler_suggests_correction() {
    let toml = r#"
[scheduler]
overdue_crn = "0 9 * * *"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, span, .. } if {
            key == "overdue_crn"
                && suggestion.as_deref() == Some("overdue_cron")
                && valid_keys.contains("reminder_interval_secs")
                && span.is_some()
        })
    });
    assert!(found, "expected UnknownKey for overdue_crn, got: {errors:?}");
}

#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["default_xp"];
    assert!(suggest_key("zzzzzz", valid_keys).is_none());
}

/// A string where a number is expected is reported as an invalid type.
#[test]
fn invalid_type_is_reported_with_key_path() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "server.port")),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after successful extraction and collects everything.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[gamification]
default_xp = 0

[scheduler]
reminder_interval_secs = 0
overdue_cron = "not a cron"
"#;

    let errors = load_and_validate_str(toml).expect_err("invalid values should fail");
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert_eq!(errors.len(), 3, "got: {messages:?}");
    assert!(messages.iter().any(|m| m.contains("default_xp")));
    assert!(messages.iter().any(|m| m.contains("reminder_interval_secs")));
    assert!(messages.iter().any(|m| m.contains("overdue_cron")));
}

/// ConfigError implements miette::Diagnostic with code and help.
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "smtp_hots".to_string(),
        suggestion: Some("smtp_host".to_string()),
        valid_keys: "from_address, smtp_host, smtp_port".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().expect("should have help text").to_string();
    assert!(
        help.contains("did you mean `smtp_host`"),
        "help should contain suggestion, got: {help}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::GraphicalReportHandler;

    let errors = load_and_validate_str("[mail]\nsmtp_hots = \"x\"\n").expect_err("should fail");
    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &errors[0])
        .expect("should render without error");
    assert!(buf.contains("smtp_hots"), "rendered report should mention the key");
}

/// An explicit file path is loaded and validated.
#[test]
fn load_and_validate_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskquest.toml");
    std::fs::write(&path, "[server]\nport = 9999\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config should validate");
    assert_eq!(config.server.port, 9999);
}

/// `TASKQUEST_*` variables override file values, including keys with underscores.
#[test]
fn env_vars_override_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file("taskquest.toml", "[server]\nport = 4000\n")?;
        jail.set_env("TASKQUEST_SERVER_PORT", "5000");
        jail.set_env("TASKQUEST_SCHEDULER_OVERDUE_CRON", "30 8 * * *");
        jail.set_env("TASKQUEST_MAIL_SMTP_HOST", "smtp.env.example");

        let config = taskquest_config::load_config()?;
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.scheduler.overdue_cron, "30 8 * * *");
        assert_eq!(config.mail.smtp_host.as_deref(), Some("smtp.env.example"));
        Ok(())
    });
}

/// The local file is picked up from the working directory.
#[test]
fn local_file_is_loaded() {
    Jail::expect_with(|jail| {
        jail.create_file("taskquest.toml", "[gamification]\ndefault_xp = 25\n")?;
        let config = taskquest_config::load_config()?;
        assert_eq!(config.gamification.default_xp, 25);
        Ok(())
    });
}
