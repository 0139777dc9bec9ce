// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound mail trait used by the notification scans.

use async_trait::async_trait;

use crate::error::TaskQuestError;
use crate::traits::adapter::Adapter;
use crate::types::{Delivery, Task, User};

/// Sends reminder and overdue notifications.
///
/// An `Ok` return means the transport accepted the message; callers only set
/// their once-only flags after that.
#[async_trait]
pub trait Mailer: Adapter {
    async fn send_reminder(&self, to: &User, task: &Task) -> Result<Delivery, TaskQuestError>;

    /// One digest listing every overdue task of a single user.
    async fn send_overdue_digest(
        &self,
        to: &User,
        tasks: &[Task],
    ) -> Result<Delivery, TaskQuestError>;
}
