use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        face_threshold: matches
            .get_one::<f32>("face-threshold")
            .copied()
            .unwrap_or(0.6),
        otp_ttl_seconds: matches.get_one::<u64>("otp-ttl").copied().unwrap_or(600),
        otp_resend_cooldown_seconds: matches
            .get_one::<u64>("otp-resend-cooldown")
            .copied()
            .unwrap_or(60),
        signup_rate_cap: matches
            .get_one::<usize>("signup-rate-cap")
            .copied()
            .unwrap_or(5),
        signup_rate_window_seconds: matches
            .get_one::<u64>("signup-rate-window")
            .copied()
            .unwrap_or(900),
        session_ttl_seconds: matches
            .get_one::<u64>("session-ttl")
            .copied()
            .unwrap_or(43200),
    })
}
