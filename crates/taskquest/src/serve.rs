// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taskquest serve` command implementation.
//!
//! Opens storage and the mail transport, starts the notification scheduler
//! (unless disabled), and serves the HTTP gateway until SIGINT or SIGTERM.

use taskquest_config::model::TaskQuestConfig;
use taskquest_core::{Adapter, HealthStatus, TaskQuestError};
use taskquest_gateway::ServerConfig;
use taskquest_scheduler::Scheduler;
use tracing::{error, info, warn};

use crate::app::App;
use crate::shutdown;

/// Runs the `taskquest serve` command.
pub async fn run_serve(config: TaskQuestConfig) -> Result<(), TaskQuestError> {
    init_tracing(&config.server.log_level);

    info!(name = %config.server.name, "starting taskquest serve");

    let app = App::open(&config).await.inspect_err(|e| {
        error!(error = %e, "failed to initialize");
    })?;
    info!(path = %config.storage.database_path, "storage initialized");

    match app.mailer.health_check().await {
        Ok(HealthStatus::Healthy) => info!(mailer = app.mailer.name(), "mailer ready"),
        Ok(status) => warn!(mailer = app.mailer.name(), ?status, "mailer degraded"),
        Err(e) => warn!(mailer = app.mailer.name(), error = %e, "mailer health check failed"),
    }

    let cancel = shutdown::install_signal_handler();

    let scheduler = if config.scheduler.enabled {
        let scheduler = Scheduler::from_config(
            &config.scheduler,
            app.reminders.clone(),
            app.overdue.clone(),
            app.clock.clone(),
        )?;
        Some(scheduler.start(cancel.child_token()))
    } else {
        info!("scheduler disabled, scans run only on request");
        None
    };

    let server_config = ServerConfig {
        host: config.server.bind_address.clone(),
        port: config.server.port,
    };
    let served =
        taskquest_gateway::start_server(&server_config, app.gateway_state(), cancel.clone()).await;
    // A bind failure returns before any signal; stop the rest too.
    cancel.cancel();

    if let Some(handle) = scheduler {
        handle.stop().await;
    }

    if let Err(e) = app.close().await {
        warn!(error = %e, "storage close failed");
    }
    info!("taskquest stopped");
    served
}

/// Initializes the tracing subscriber with an env filter.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to
/// TaskQuest crates and `warn` to everything else. Logs go to stderr so
/// command output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taskquest={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}
