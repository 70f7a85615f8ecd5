//! OTP verification and resend endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use super::error_response;
use super::types::{
    ErrorResponse, MessageResponse, ResendOtpRequest, VerifyOtpRequest, VerifyOtpResponse,
};
use crate::auth::AuthEngine;

/// Verify the emailed code and activate the pending account.
#[utoipa::path(
    post,
    path = "/v1/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Account activated", body = VerifyOtpResponse),
        (status = 400, description = "Invalid, expired, or consumed code", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn verify_otp(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> impl IntoResponse {
    let request: VerifyOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response()
        }
    };

    match engine.verify_otp(&request.email, request.otp.trim()) {
        Ok(account) => (
            StatusCode::OK,
            Json(VerifyOtpResponse {
                message: "Account verified successfully. You can now login.".to_string(),
                user: account.into(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// Re-issue the verification code for a pending account.
#[utoipa::path(
    post,
    path = "/v1/auth/resend-otp",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "Verification code resent", body = MessageResponse),
        (status = 400, description = "Account already verified", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse),
        (status = 429, description = "Resend requested too soon", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn resend_otp(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<ResendOtpRequest>>,
) -> impl IntoResponse {
    let request: ResendOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response()
        }
    };

    match engine.resend_otp(&request.email) {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Verification code sent".to_string(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}
