// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TaskQuest - a gamified task manager.
//!
//! This is the binary entry point: the HTTP server plus the admin commands
//! that manage users and run scans by hand.

mod app;
mod doctor;
mod scan;
mod serve;
mod shutdown;
mod user;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taskquest_config::model::TaskQuestConfig;
use taskquest_core::TaskQuestError;

use crate::app::App;
use crate::scan::ScanKind;

/// TaskQuest - a gamified task manager.
#[derive(Parser, Debug)]
#[command(name = "taskquest", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API and the notification scheduler.
    Serve,
    /// Manage users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Run one notification scan now and print its report.
    Scan {
        #[arg(value_enum)]
        kind: ScanKind,
    },
    /// Manage TaskQuest configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Check the database, mail transport, and scan schedule.
    Doctor,
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Create a user and print their API token.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate the configuration and print a summary.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => taskquest_config::load_and_validate_path(path),
        None => taskquest_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            taskquest_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: TaskQuestConfig) -> Result<(), TaskQuestError> {
    match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::User {
            action: UserCommands::Add { name, email },
        } => {
            serve::init_tracing("warn");
            let app = App::open(&config).await?;
            let result = user::run_user_add(&app, &name, &email).await;
            app.close().await?;
            result
        }
        Commands::Scan { kind } => {
            serve::init_tracing(&config.server.log_level);
            let app = App::open(&config).await?;
            let result = scan::run_scan(&app, kind).await;
            app.close().await?;
            println!("{}", result?);
            Ok(())
        }
        Commands::Config {
            action: ConfigCommands::Check,
        } => {
            print_config_summary(&config);
            Ok(())
        }
        Commands::Doctor => {
            serve::init_tracing("warn");
            doctor::run_doctor(&config).await
        }
    }
}

fn print_config_summary(config: &TaskQuestConfig) {
    println!("configuration ok");
    println!(
        "  server:       {} on {}:{} (log level {})",
        config.server.name, config.server.bind_address, config.server.port, config.server.log_level
    );
    println!("  database:     {}", config.storage.database_path);
    println!("  default xp:   {}", config.gamification.default_xp);
    if config.scheduler.enabled {
        println!(
            "  scheduler:    reminders every {}s, overdue at `{}`",
            config.scheduler.reminder_interval_secs, config.scheduler.overdue_cron
        );
    } else {
        println!("  scheduler:    disabled");
    }
    match &config.mail.smtp_host {
        Some(host) => println!("  mail:         smtp {host}:{}", config.mail.smtp_port),
        None => println!("  mail:         log only"),
    }
}
