use crate::auth::{AuthConfig, AuthEngine, DevFaceEncoder, LogEmailSender, SlidingWindowLimiter};
use crate::cli::actions::Action;
use crate::veriface;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            face_threshold,
            otp_ttl_seconds,
            otp_resend_cooldown_seconds,
            signup_rate_cap,
            signup_rate_window_seconds,
            session_ttl_seconds,
        } => {
            let config = AuthConfig::new()
                .with_face_match_threshold(face_threshold)
                .with_otp_ttl_seconds(otp_ttl_seconds)
                .with_otp_resend_cooldown_seconds(otp_resend_cooldown_seconds)
                .with_signup_rate_cap(signup_rate_cap)
                .with_signup_rate_window_seconds(signup_rate_window_seconds)
                .with_session_ttl_seconds(session_ttl_seconds);

            let limiter = SlidingWindowLimiter::new(
                config.signup_rate_cap(),
                Duration::from_secs(signup_rate_window_seconds),
            );

            let engine = Arc::new(AuthEngine::new(
                config,
                Arc::new(DevFaceEncoder),
                Arc::new(limiter),
                Arc::new(LogEmailSender),
            ));

            veriface::new(port, engine).await?;
        }
    }

    Ok(())
}
