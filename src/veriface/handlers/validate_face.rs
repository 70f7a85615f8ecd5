//! Pre-signup face check endpoint.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use super::types::{ValidateFaceRequest, ValidateFaceResponse};
use crate::auth::{AuthEngine, AuthError};

/// Check that an image holds exactly one detectable face before signup.
#[utoipa::path(
    post,
    path = "/v1/auth/validate-face",
    request_body = ValidateFaceRequest,
    responses(
        (status = 200, description = "Validation verdict", body = ValidateFaceResponse)
    ),
    tag = "auth"
)]
pub async fn validate_face(
    engine: Extension<Arc<AuthEngine>>,
    payload: Option<Json<ValidateFaceRequest>>,
) -> impl IntoResponse {
    let request: ValidateFaceRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response()
        }
    };

    // A failed check is a 200 with valid=false so the UI can prompt a retake.
    let (valid, message) = match engine.validate_face(&request.face_image) {
        Ok(()) => (true, "Face detected successfully".to_string()),
        Err(AuthError::Internal(err)) => {
            tracing::error!("face validation failed: {err:?}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(err) => (false, err.to_string()),
    };

    (StatusCode::OK, Json(ValidateFaceResponse { valid, message })).into_response()
}
