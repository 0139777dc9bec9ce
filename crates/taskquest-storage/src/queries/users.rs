// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User records and API token lookup.

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};
use sha2::{Digest, Sha256};
use taskquest_core::types::User;
use taskquest_core::TaskQuestError;

use crate::codec::{get_ts, ts};
use crate::database::{Database, map_tr_err};

/// Hex SHA-256 of an API token. Only this form is ever stored.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// A fresh random API token (256 bits, hex encoded).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: get_ts(row, 3)?,
    })
}

/// Insert a user. Fails with a validation error if the email is taken.
pub async fn create_user(
    db: &Database,
    name: &str,
    email: &str,
    token_hash: &str,
) -> Result<User, TaskQuestError> {
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email: email.trim().to_lowercase(),
        created_at: Utc::now(),
    };
    let token_hash = token_hash.to_string();
    let to_insert = user.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "INSERT OR IGNORE INTO users (id, name, email, token_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    to_insert.id,
                    to_insert.name,
                    to_insert.email,
                    token_hash,
                    ts(to_insert.created_at),
                ],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)?;

    if !inserted {
        return Err(TaskQuestError::Validation(format!(
            "a user with email `{}` already exists",
            user.email
        )));
    }
    Ok(user)
}

pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, TaskQuestError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find_user_by_token_hash(
    db: &Database,
    token_hash: &str,
) -> Result<Option<User>, TaskQuestError> {
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, email, created_at FROM users WHERE token_hash = ?1",
                params![token_hash],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
