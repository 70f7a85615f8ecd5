//! # Veriface (Face Authentication Service)
//!
//! `veriface` authenticates users by comparing a live face embedding against a
//! previously enrolled one, backed by an email OTP activation flow, a password
//! fallback, IP-based signup throttling, and real-time notification of login
//! events.
//!
//! ## Accounts
//!
//! Accounts are created `Pending` at signup and become `Active` only through a
//! successful OTP verification. Emails are normalized to lowercase and unique;
//! a signup against an existing *pending* email replaces the stale pending
//! account and issues a fresh code.
//!
//! ## Face matching
//!
//! The embedding model is an external collaborator behind the
//! [`auth::FaceEncoder`] trait; the core only consumes a fixed-length vector
//! and a face count. Cosine distance against a single configurable threshold
//! decides both login matches and the one-face-per-account uniqueness check.
//!
//! ## Non-leak contract
//!
//! Password login returns the same `InvalidCredentials` error for an unknown
//! email and for a wrong password, and performs a dummy hash verification in
//! the unknown case so response timing does not distinguish the two.

pub mod auth;
pub mod cli;
pub mod veriface;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
