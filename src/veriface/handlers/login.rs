//! Face and password login endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use super::error_response;
use super::types::{ErrorResponse, FaceLoginRequest, LoginResponse, PasswordLoginRequest};
use crate::auth::{orchestrator::LoginSuccess, AuthEngine};

fn login_response(success: LoginSuccess) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token: success.session_token,
            user: success.account.into(),
        }),
    )
        .into_response()
}

/// Login by matching a live face image against the enrolled embedding.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = FaceLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Account not verified or unusable image", body = ErrorResponse),
        (status = 401, description = "Face did not match", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<FaceLoginRequest>>,
) -> impl IntoResponse {
    let request: FaceLoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response()
        }
    };

    match engine.login_with_face(&request.email, &request.face_image) {
        Ok(success) => login_response(success),
        Err(err) => error_response(&err),
    }
}

/// Backup login method using email and password.
#[utoipa::path(
    post,
    path = "/v1/auth/login-password",
    request_body = PasswordLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Account not verified", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_password(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<PasswordLoginRequest>>,
) -> impl IntoResponse {
    let request: PasswordLoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response()
        }
    };

    match engine.login_with_password(&request.email, &request.password) {
        Ok(success) => login_response(success),
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::veriface::test_support::test_engine;
    use secrecy::SecretString;

    #[tokio::test]
    async fn login_missing_payload_is_bad_request() {
        let response = login(Extension(test_engine()), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn face_login_unknown_account_is_not_found() {
        let response = login(
            Extension(test_engine()),
            Some(Json(FaceLoginRequest {
                email: "nobody@example.com".to_string(),
                face_image: "Zm9v".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn password_login_unknown_account_is_unauthorized() {
        // Same status and body as a wrong password; no existence leak.
        let response = login_password(
            Extension(test_engine()),
            Some(Json(PasswordLoginRequest {
                email: "nobody@example.com".to_string(),
                password: SecretString::from("whatever123"),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
