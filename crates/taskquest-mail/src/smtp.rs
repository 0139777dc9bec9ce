// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP mail transport.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::Address;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

use taskquest_config::model::MailConfig;
use taskquest_core::types::{Delivery, HealthStatus, Task, User};
use taskquest_core::{Adapter, Mailer, TaskQuestError};

use crate::render::{self, RenderedMail};

/// Sends notifications through an SMTP relay using STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    frontend_url: String,
}

impl SmtpMailer {
    /// Build the transport from `[mail]` configuration. Requires `smtp_host`.
    pub fn new(config: &MailConfig) -> Result<Self, TaskQuestError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| TaskQuestError::Config("mail.smtp_host is not set".into()))?;
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            TaskQuestError::Config(format!(
                "invalid mail.from_address '{}': {e}",
                config.from_address
            ))
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| TaskQuestError::Config(format!("SMTP transport error: {e}")))?
            .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            frontend_url: config.frontend_url.clone(),
        })
    }

    async fn deliver(&self, to: &User, mail: RenderedMail) -> Result<Delivery, TaskQuestError> {
        let address: Address = to.email.parse().map_err(|e| TaskQuestError::Delivery {
            message: format!("invalid recipient address '{}': {e}", to.email),
            source: None,
        })?;
        let to_mailbox = Mailbox::new(Some(to.name.clone()), address);

        let message_id = format!("<{}@taskquest>", uuid::Uuid::new_v4());
        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(mail.subject)
            .message_id(Some(message_id.clone()))
            .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
            .map_err(|e| TaskQuestError::Delivery {
                message: format!("failed to build message: {e}"),
                source: Some(Box::new(e)),
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| TaskQuestError::Delivery {
                message: format!("SMTP send to {} failed", to.email),
                source: Some(Box::new(e)),
            })?;

        debug!(to = %to.email, message_id, "mail accepted by relay");
        Ok(Delivery { id: message_id })
    }
}

#[async_trait]
impl Adapter for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskQuestError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Unhealthy("SMTP relay refused NOOP".into())),
            Err(e) => {
                warn!(error = %e, "SMTP health check failed");
                Ok(HealthStatus::Unhealthy(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_reminder(&self, to: &User, task: &Task) -> Result<Delivery, TaskQuestError> {
        self.deliver(to, render::reminder(to, task, &self.frontend_url))
            .await
    }

    async fn send_overdue_digest(
        &self,
        to: &User,
        tasks: &[Task],
    ) -> Result<Delivery, TaskQuestError> {
        self.deliver(to, render::overdue_digest(to, tasks, &self.frontend_url))
            .await
    }
}
