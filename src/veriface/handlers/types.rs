//! Request/response types for the auth endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Account, AccountStatus};

#[derive(ToSchema, Deserialize, Debug)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub password: SecretString,
    /// Base64 (optionally `data:` URL) encoded face image.
    pub face_image: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: String,
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct FaceLoginRequest {
    pub email: String,
    pub face_image: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct PasswordLoginRequest {
    pub email: String,
    #[schema(value_type = String)]
    pub password: SecretString,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ValidateFaceRequest {
    pub face_image: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ValidateFaceResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: AccountStatus,
    pub created_at_unix: i64,
    pub last_login_at_unix: Option<i64>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name,
            email: account.email,
            status: account.status,
            created_at_unix: account.created_at_unix,
            last_login_at_unix: account.last_login_at_unix,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpResponse {
    pub message: String,
    pub user: AccountResponse,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    /// Opaque bearer token for subsequent `session`/`logout` calls.
    pub token: String,
    pub user: AccountResponse,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn signup_request_deserializes_with_secret_password() -> Result<()> {
        let request: SignupRequest = serde_json::from_value(serde_json::json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "secret123",
            "face_image": "data:image/jpeg;base64,Zm9v"
        }))?;
        assert_eq!(request.email, "alice@example.com");
        // Debug output must not contain the raw password.
        assert!(!format!("{request:?}").contains("secret123"));
        Ok(())
    }

    #[test]
    fn account_response_from_account() {
        let account = Account::new(
            "Bob".to_string(),
            "bob@example.com".to_string(),
            "hash".to_string(),
        );
        let response = AccountResponse::from(account.clone());
        assert_eq!(response.id, account.id.to_string());
        assert_eq!(response.status, AccountStatus::Pending);
        assert!(response.last_login_at_unix.is_none());
    }

    #[test]
    fn error_response_round_trips() -> Result<()> {
        let value = serde_json::to_value(ErrorResponse {
            error: "User not found".to_string(),
        })?;
        assert_eq!(value["error"], "User not found");
        Ok(())
    }
}
