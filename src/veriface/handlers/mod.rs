pub mod health;
pub use self::health::health;

pub mod signup;
pub use self::signup::signup;

pub mod verification;
pub use self::verification::{resend_otp, verify_otp};

pub mod login;
pub use self::login::{login, login_password};

pub mod session;
pub use self::session::{logout, session};

pub mod validate_face;
pub use self::validate_face::validate_face;

pub mod types;

// common functions for the handlers
use axum::{
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use std::net::SocketAddr;
use tracing::error;

use crate::auth::AuthError;
use types::ErrorResponse;

/// Render a domain error as its HTTP status plus `{"error": ...}` body.
/// Internal failures are logged here; everything else is caller-recoverable.
pub(crate) fn error_response(err: &AuthError) -> Response {
    if let AuthError::Internal(inner) = err {
        error!("internal error: {inner:?}");
    }
    (
        err.status(),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Extract a client IP for rate limiting: proxy headers first, then the
/// socket peer address for direct connections.
pub(crate) fn extract_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// Extract the bearer session token, if present.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, StatusCode};

    #[test]
    fn extract_client_ip_prefers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        let peer = "203.0.113.9:51515".parse().ok();
        assert_eq!(
            extract_client_ip(&headers, peer),
            Some("1.2.3.4".to_string())
        );
    }

    #[test]
    fn extract_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(
            extract_client_ip(&headers, None),
            Some("9.9.9.9".to_string())
        );
    }

    #[test]
    fn extract_client_ip_falls_back_to_peer_address() {
        // Direct connections have no proxy headers; the socket address keys
        // the rate limit instead of a shared bucket.
        let headers = HeaderMap::new();
        let peer = "203.0.113.9:51515".parse().ok();
        assert_eq!(
            extract_client_ip(&headers, peer),
            Some("203.0.113.9".to_string())
        );
    }

    #[test]
    fn extract_client_ip_none_when_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers, None), None);
    }

    #[test]
    fn extract_bearer_token_handles_casing_and_whitespace() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123 "));
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
        assert_eq!(extract_bearer_token(&headers), Some("xyz".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn error_response_carries_status_and_body() {
        let response = error_response(&AuthError::UnknownAccount);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
