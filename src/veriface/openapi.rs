//! Generated `OpenAPI` document for the auth endpoints.

use utoipa::OpenApi;

use super::handlers;
use super::handlers::types::{
    AccountResponse, ErrorResponse, FaceLoginRequest, LoginResponse, MessageResponse,
    PasswordLoginRequest, ResendOtpRequest, SessionResponse, SignupRequest, SignupResponse,
    ValidateFaceRequest, ValidateFaceResponse, VerifyOtpRequest, VerifyOtpResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::signup::signup,
        handlers::verification::verify_otp,
        handlers::verification::resend_otp,
        handlers::login::login,
        handlers::login::login_password,
        handlers::session::session,
        handlers::session::logout,
        handlers::validate_face::validate_face,
    ),
    components(schemas(
        AccountResponse,
        ErrorResponse,
        FaceLoginRequest,
        LoginResponse,
        MessageResponse,
        PasswordLoginRequest,
        ResendOtpRequest,
        SessionResponse,
        SignupRequest,
        SignupResponse,
        ValidateFaceRequest,
        ValidateFaceResponse,
        VerifyOtpRequest,
        VerifyOtpResponse,
    )),
    tags(
        (name = "auth", description = "Signup, email verification, and login"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
