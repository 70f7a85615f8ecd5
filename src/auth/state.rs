//! Engine configuration: read-only after process start.

use std::time::Duration;

const DEFAULT_FACE_MATCH_THRESHOLD: f32 = 0.6;
const DEFAULT_OTP_TTL_SECONDS: u64 = 10 * 60;
const DEFAULT_OTP_RESEND_COOLDOWN_SECONDS: u64 = 60;
const DEFAULT_SIGNUP_RATE_CAP: usize = 5;
const DEFAULT_SIGNUP_RATE_WINDOW_SECONDS: u64 = 15 * 60;
const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;

/// Tunables for the authentication engine.
///
/// The face match threshold is shared by the login check and the enrollment
/// uniqueness check on purpose; it is a single configuration surface.
#[derive(Clone, Copy, Debug)]
pub struct AuthConfig {
    face_match_threshold: f32,
    otp_ttl: Duration,
    otp_resend_cooldown: Duration,
    signup_rate_cap: usize,
    signup_rate_window: Duration,
    session_ttl: Duration,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            face_match_threshold: DEFAULT_FACE_MATCH_THRESHOLD,
            otp_ttl: Duration::from_secs(DEFAULT_OTP_TTL_SECONDS),
            otp_resend_cooldown: Duration::from_secs(DEFAULT_OTP_RESEND_COOLDOWN_SECONDS),
            signup_rate_cap: DEFAULT_SIGNUP_RATE_CAP,
            signup_rate_window: Duration::from_secs(DEFAULT_SIGNUP_RATE_WINDOW_SECONDS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS),
        }
    }

    #[must_use]
    pub fn with_face_match_threshold(mut self, threshold: f32) -> Self {
        self.face_match_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_otp_ttl_seconds(mut self, seconds: u64) -> Self {
        self.otp_ttl = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_otp_resend_cooldown_seconds(mut self, seconds: u64) -> Self {
        self.otp_resend_cooldown = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_signup_rate_cap(mut self, cap: usize) -> Self {
        self.signup_rate_cap = cap;
        self
    }

    #[must_use]
    pub fn with_signup_rate_window_seconds(mut self, seconds: u64) -> Self {
        self.signup_rate_window = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn face_match_threshold(&self) -> f32 {
        self.face_match_threshold
    }

    #[must_use]
    pub fn otp_ttl(&self) -> Duration {
        self.otp_ttl
    }

    #[must_use]
    pub fn otp_resend_cooldown(&self) -> Duration {
        self.otp_resend_cooldown
    }

    #[must_use]
    pub fn signup_rate_cap(&self) -> usize {
        self.signup_rate_cap
    }

    #[must_use]
    pub fn signup_rate_window(&self) -> Duration {
        self.signup_rate_window
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
