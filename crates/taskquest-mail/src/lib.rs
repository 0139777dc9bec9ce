// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail delivery for TaskQuest notifications.
//!
//! Two [`Mailer`] implementations are provided: [`SmtpMailer`] sends through
//! an SMTP relay with STARTTLS, and [`LogMailer`] only logs what it would
//! have sent. [`build_mailer`] picks one from `[mail]` configuration.

pub mod log_mailer;
pub mod render;
pub mod smtp;

use std::sync::Arc;

use taskquest_config::model::MailConfig;
use taskquest_core::{Mailer, TaskQuestError};

pub use log_mailer::LogMailer;
pub use render::RenderedMail;
pub use smtp::SmtpMailer;

/// SMTP when `smtp_host` is configured, log-only otherwise.
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, TaskQuestError> {
    match config.smtp_host.as_deref() {
        Some(host) => {
            tracing::info!(host, port = config.smtp_port, "using SMTP mailer");
            Ok(Arc::new(SmtpMailer::new(config)?))
        }
        None => {
            tracing::info!("no smtp_host configured, notifications will only be logged");
            Ok(Arc::new(LogMailer::new(config)))
        }
    }
}
