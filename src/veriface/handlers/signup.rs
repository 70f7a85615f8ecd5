//! Signup endpoint: rate limit, validation, face enrollment, OTP email.

use axum::{
    extract::{ConnectInfo, Extension},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;

use super::types::{ErrorResponse, SignupRequest, SignupResponse};
use super::{error_response, extract_client_ip};
use crate::auth::{orchestrator, AuthEngine};

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Signup accepted, verification code emailed", body = SignupResponse),
        (status = 400, description = "Invalid input, unusable face, or email taken", body = ErrorResponse),
        (status = 429, description = "Too many signup attempts from this address", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response()
        }
    };

    let client_ip = extract_client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let request = orchestrator::SignupRequest {
        name: request.name,
        email: request.email,
        password: request.password,
        face_image: request.face_image,
    };

    match engine.signup(request, client_ip.as_deref()).await {
        Ok(ack) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                message: "Signup successful. Please check your email for the verification code."
                    .to_string(),
                user_id: ack.account_id.to_string(),
                email: ack.email,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthConfig, DevFaceEncoder, LogEmailSender, SlidingWindowLimiter};
    use crate::veriface::test_support::test_engine;
    use axum::http::HeaderMap;
    use secrecy::SecretString;
    use std::time::Duration;

    #[tokio::test]
    async fn signup_missing_payload_is_bad_request() {
        let response = signup(HeaderMap::new(), None, Extension(test_engine()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    fn peer(addr: &str) -> Option<ConnectInfo<SocketAddr>> {
        Some(ConnectInfo(addr.parse().expect("socket address")))
    }

    fn payload(email: &str, image: &str) -> Option<Json<SignupRequest>> {
        Some(Json(SignupRequest {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: SecretString::from("secret123"),
            face_image: image.to_string(),
        }))
    }

    #[tokio::test]
    async fn direct_clients_are_throttled_per_peer_address() {
        // Without proxy headers the socket address keys the limiter, so one
        // client hitting the cap must not throttle everyone else.
        let engine = Arc::new(crate::auth::AuthEngine::new(
            AuthConfig::new(),
            Arc::new(DevFaceEncoder),
            Arc::new(SlidingWindowLimiter::new(1, Duration::from_secs(900))),
            Arc::new(LogEmailSender),
        ));

        let first = signup(
            HeaderMap::new(),
            peer("198.51.100.1:40000"),
            Extension(engine.clone()),
            payload("alice@example.com", "Zm9v"),
        )
        .await
        .into_response();
        assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);

        // Same client again, new source port: same address, over cap.
        let second = signup(
            HeaderMap::new(),
            peer("198.51.100.1:40001"),
            Extension(engine.clone()),
            payload("bob@example.com", "YmFy"),
        )
        .await
        .into_response();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        let third = signup(
            HeaderMap::new(),
            peer("198.51.100.2:40000"),
            Extension(engine),
            payload("carol@example.com", "YmF6"),
        )
        .await
        .into_response();
        assert_ne!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
