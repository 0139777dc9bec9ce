// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity resolution for API callers.

use async_trait::async_trait;

use crate::error::TaskQuestError;
use crate::types::User;

/// Resolves a bearer token to the user it was issued to.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Returns `None` when the token is unknown.
    async fn authenticate(&self, token: &str) -> Result<Option<User>, TaskQuestError>;
}
