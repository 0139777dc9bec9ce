// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication middleware.
//!
//! The token from `Authorization: Bearer <token>` is resolved through the
//! configured [`IdentityProvider`]. On success the user is attached to the
//! request as an [`AuthUser`] extension; otherwise the request is rejected
//! with 401 before reaching a handler.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use taskquest_core::types::User;
use taskquest_core::{IdentityProvider, TaskQuestError};

use crate::error::ApiError;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(identity): State<Arc<dyn IdentityProvider>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&request).map(str::to_owned) else {
        return Err(TaskQuestError::Unauthorized.into());
    };
    let Some(user) = identity.authenticate(&token).await? else {
        tracing::debug!("unknown bearer token");
        return Err(TaskQuestError::Unauthorized.into());
    };
    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn extracts_bearer_token() {
        let request = Request::builder()
            .header("authorization", "Bearer abc123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        let basic = Request::builder()
            .header("authorization", "Basic abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&basic), None);

        let blank = Request::builder()
            .header("authorization", "Bearer   ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&blank), None);

        let missing = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&missing), None);
    }
}
