//! Error taxonomy for the authentication flows.
//!
//! Every variant is recoverable at the request boundary and maps to a
//! distinct HTTP status; only `Internal` marks a failure of the process
//! itself (storage or hashing unavailability).

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Too many signup attempts. Please try again later.")]
    RateLimited,

    #[error("No face detected in image")]
    NoFaceDetected,

    #[error("Multiple faces detected in image")]
    MultipleFacesDetected,

    #[error("This face is already registered to another account")]
    FaceAlreadyRegistered,

    #[error("Email already registered")]
    EmailTaken,

    #[error("User not found")]
    UnknownAccount,

    #[error("Account not verified. Please check your email.")]
    AccountNotActive,

    #[error("Account already verified")]
    AlreadyActive,

    #[error("Face did not match. Please try again.")]
    FaceMismatch,

    /// Covers both "unknown email" and "wrong password" on the password
    /// fallback so the response does not reveal whether the account exists.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No active verification code. Please request a new one.")]
    NoActiveChallenge,

    #[error("Verification code has expired")]
    OtpExpired,

    #[error("Invalid verification code")]
    OtpMismatch,

    #[error("Verification code already used")]
    OtpAlreadyConsumed,

    #[error("Please wait before requesting a new code")]
    ResendTooSoon,

    #[error("Account already has an enrolled face")]
    DuplicateEnrollment,

    #[error("No enrolled face for account")]
    NotEnrolled,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// HTTP status for the request boundary.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::NoFaceDetected
            | Self::MultipleFacesDetected
            | Self::FaceAlreadyRegistered
            | Self::EmailTaken
            | Self::AccountNotActive
            | Self::AlreadyActive
            | Self::NoActiveChallenge
            | Self::OtpExpired
            | Self::OtpMismatch
            | Self::OtpAlreadyConsumed => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ResendTooSoon => StatusCode::TOO_MANY_REQUESTS,
            Self::UnknownAccount | Self::NotEnrolled => StatusCode::NOT_FOUND,
            Self::FaceMismatch | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::DuplicateEnrollment => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_flow_contracts() {
        assert_eq!(AuthError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AuthError::UnknownAccount.status(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::FaceMismatch.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::OtpExpired.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_credentials_message_is_opaque() {
        // Unknown email and wrong password must render identically.
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
    }
}
