pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        face_threshold: f32,
        otp_ttl_seconds: u64,
        otp_resend_cooldown_seconds: u64,
        signup_rate_cap: usize,
        signup_rate_window_seconds: u64,
        session_ttl_seconds: u64,
    },
}
