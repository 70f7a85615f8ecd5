//! Session lookup and logout endpoints for bearer auth.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

use super::extract_bearer_token;
use super::types::SessionResponse;
use crate::auth::AuthEngine;

/// Resolve the bearer token into the current account.
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, engine: Extension<Arc<AuthEngine>>) -> impl IntoResponse {
    // A missing token is "no session", not an error; auth state must not leak.
    let Some(token) = extract_bearer_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match engine.current_session(&token) {
        Ok(Some((record, account))) => (
            StatusCode::OK,
            Json(SessionResponse {
                user_id: record.account_id.to_string(),
                email: account.email,
                name: account.name,
            }),
        )
            .into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("failed to lookup session: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Destroy every session of the calling account.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Sessions cleared")
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, engine: Extension<Arc<AuthEngine>>) -> impl IntoResponse {
    // Always answer 204, token or not; logout is idempotent.
    if let Some(token) = extract_bearer_token(&headers) {
        match engine.current_session(&token) {
            Ok(Some((record, _))) => {
                if let Err(err) = engine.logout(record.account_id) {
                    error!("failed to destroy sessions: {err}");
                }
            }
            Ok(None) => {}
            Err(err) => error!("failed to lookup session for logout: {err}"),
        }
    }
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::veriface::test_support::test_engine;

    #[tokio::test]
    async fn session_without_token_is_no_content() {
        let response = session(HeaderMap::new(), Extension(test_engine()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn session_with_bogus_token_is_no_content() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Bearer bogus"),
        );
        let response = session(headers, Extension(test_engine()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn logout_without_token_is_no_content() {
        let response = logout(HeaderMap::new(), Extension(test_engine()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
