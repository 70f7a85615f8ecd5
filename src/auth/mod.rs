//! Authentication core: the orchestration engine and its parts.
//!
//! The engine in [`orchestrator`] sequences signup, OTP verification, face
//! login, password login, and logout over the leaf components in this module.
//! Everything here is transport-agnostic; the HTTP surface lives in
//! `crate::veriface`.

pub mod account;
pub mod email;
pub mod embedding;
pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod otp;
pub mod password;
pub mod rate_limit;
pub mod session;
pub mod similarity;
pub mod state;

pub use account::{Account, AccountStatus, AccountStore};
pub use email::{EmailMessage, EmailSender, LogEmailSender};
pub use embedding::{DevFaceEncoder, Embedding, EmbeddingStore, Enrollment, FaceEncoder, FaceScan};
pub use error::AuthError;
pub use notify::{Notification, NotificationDispatcher, NotificationKind};
pub use orchestrator::AuthEngine;
pub use otp::OtpManager;
pub use rate_limit::{NoopLimiter, SignupRateLimiter, SlidingWindowLimiter};
pub use session::{SessionRecord, SessionStore};
pub use state::AuthConfig;

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, used for persisted timestamps.
pub(crate) fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_unix_is_positive() {
        assert!(now_unix() > 0);
    }
}
