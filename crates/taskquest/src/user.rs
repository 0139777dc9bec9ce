// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taskquest user add` command implementation.

use taskquest_core::types::User;
use taskquest_core::{TaskQuestError, UserStore};
use taskquest_storage::{generate_token, hash_token};

use crate::app::App;

/// Registers a user and returns it with its raw API token.
///
/// Only the token's hash is stored; the raw token cannot be recovered later.
pub async fn add_user(app: &App, name: &str, email: &str) -> Result<(User, String), TaskQuestError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TaskQuestError::Validation("name is required".into()));
    }
    let email = email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(TaskQuestError::Validation(format!(
            "`{email}` is not a valid email address"
        )));
    }

    let token = generate_token();
    let user = app.storage.create_user(name, email, &hash_token(&token)).await?;
    tracing::info!(user_id = %user.id, "user created");
    Ok((user, token))
}

pub async fn run_user_add(app: &App, name: &str, email: &str) -> Result<(), TaskQuestError> {
    let (user, token) = add_user(app, name, email).await?;
    println!("created user {} <{}>", user.name, user.email);
    println!("  id:    {}", user.id);
    println!("  token: {token}");
    println!();
    println!("  The token is shown once. Send it as `Authorization: Bearer <token>`.");
    Ok(())
}
