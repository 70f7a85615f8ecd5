//! One-time code issuing, verification, expiry, and resend.
//!
//! Challenge lifecycle per account: `Issued -> {Verified | Expired |
//! Superseded-by-resend}`. Only the SHA-256 digest of a code is kept; the
//! plaintext is handed back once for out-of-band delivery and never stored.
//! All operations for one account serialize on the manager's lock, so a
//! verify racing a resend always sees a consistent challenge.

use anyhow::Context;
use rand::{rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::error::AuthError;

pub const OTP_CODE_LEN: usize = 6;

struct Challenge {
    code_hash: [u8; 32],
    issued_at: Instant,
    expires_at: Instant,
    consumed: bool,
}

pub struct OtpManager {
    ttl: Duration,
    resend_cooldown: Duration,
    challenges: Mutex<HashMap<Uuid, Challenge>>,
}

impl OtpManager {
    #[must_use]
    pub fn new(ttl: Duration, resend_cooldown: Duration) -> Self {
        Self {
            ttl,
            resend_cooldown,
            challenges: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a fresh 6-digit code, superseding any prior challenge for the
    /// account. Returns the plaintext for email delivery only.
    pub fn issue(&self, account_id: Uuid) -> Result<String, AuthError> {
        let code = generate_code();
        let now = Instant::now();
        let mut challenges = self.lock()?;
        // Expired challenges for other accounts are dead weight; drop them
        // while the lock is held.
        challenges.retain(|_, challenge| now <= challenge.expires_at);
        challenges.insert(
            account_id,
            Challenge {
                code_hash: hash_code(&code),
                issued_at: now,
                expires_at: now + self.ttl,
                consumed: false,
            },
        );
        Ok(code)
    }

    /// Verify a submitted code. Succeeds exactly once per challenge.
    pub fn verify(&self, account_id: Uuid, submitted: &str) -> Result<(), AuthError> {
        let mut challenges = self.lock()?;
        let (consumed, expires_at, code_hash) = {
            let challenge = challenges
                .get(&account_id)
                .ok_or(AuthError::NoActiveChallenge)?;
            (challenge.consumed, challenge.expires_at, challenge.code_hash)
        };

        if consumed {
            return Err(AuthError::OtpAlreadyConsumed);
        }
        if Instant::now() > expires_at {
            challenges.remove(&account_id);
            return Err(AuthError::OtpExpired);
        }

        // Compare digests in constant time; the submitted code is attacker
        // controlled.
        let submitted_hash = hash_code(submitted.trim());
        if !bool::from(submitted_hash.ct_eq(&code_hash)) {
            return Err(AuthError::OtpMismatch);
        }

        if let Some(challenge) = challenges.get_mut(&account_id) {
            challenge.consumed = true;
        }
        Ok(())
    }

    /// Re-issue a code after the cooldown has elapsed since the active
    /// challenge was issued. Behaves like `issue` on success.
    pub fn resend(&self, account_id: Uuid) -> Result<String, AuthError> {
        {
            let challenges = self.lock()?;
            if let Some(challenge) = challenges.get(&account_id) {
                let active = !challenge.consumed && Instant::now() <= challenge.expires_at;
                if active && challenge.issued_at.elapsed() < self.resend_cooldown {
                    return Err(AuthError::ResendTooSoon);
                }
            }
        }
        self.issue(account_id)
    }

    /// Drop any challenge for the account; used by the pending-signup
    /// recovery path.
    pub fn clear(&self, account_id: Uuid) -> Result<(), AuthError> {
        self.lock()?.remove(&account_id);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Challenge>>, AuthError> {
        self.challenges
            .lock()
            .map_err(|_| anyhow::anyhow!("otp challenge lock poisoned"))
            .context("otp manager unavailable")
            .map_err(AuthError::Internal)
    }
}

fn generate_code() -> String {
    let value = OsRng.gen_range(0..1_000_000u32);
    format!("{value:0width$}", width = OTP_CODE_LEN)
}

fn hash_code(code: &str) -> [u8; 32] {
    Sha256::digest(code.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> OtpManager {
        OtpManager::new(Duration::from_secs(600), Duration::from_secs(60))
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..32 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn verify_succeeds_exactly_once() {
        let manager = manager();
        let account = Uuid::new_v4();
        let code = manager.issue(account).expect("issue");

        manager.verify(account, &code).expect("first verify");
        let err = manager.verify(account, &code).unwrap_err();
        assert!(matches!(err, AuthError::OtpAlreadyConsumed));
    }

    #[test]
    fn verify_without_challenge_fails() {
        let manager = manager();
        let err = manager.verify(Uuid::new_v4(), "123456").unwrap_err();
        assert!(matches!(err, AuthError::NoActiveChallenge));
    }

    #[test]
    fn wrong_code_is_a_mismatch_and_stays_retryable() {
        let manager = manager();
        let account = Uuid::new_v4();
        let code = manager.issue(account).expect("issue");

        // Three wrong attempts, then the correct code within the TTL.
        for wrong in ["000000", "999999", "123123"] {
            if wrong == code {
                continue;
            }
            let err = manager.verify(account, wrong).unwrap_err();
            assert!(matches!(err, AuthError::OtpMismatch));
        }
        manager.verify(account, &code).expect("correct code verifies");
    }

    #[test]
    fn expired_challenge_rejects_correct_code() {
        let manager = OtpManager::new(Duration::ZERO, Duration::ZERO);
        let account = Uuid::new_v4();
        let code = manager.issue(account).expect("issue");
        std::thread::sleep(Duration::from_millis(5));

        let err = manager.verify(account, &code).unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[test]
    fn expired_challenge_is_dropped_on_verify() {
        let manager = OtpManager::new(Duration::ZERO, Duration::ZERO);
        let account = Uuid::new_v4();
        let code = manager.issue(account).expect("issue");
        std::thread::sleep(Duration::from_millis(5));

        let err = manager.verify(account, &code).unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
        // The dead challenge is gone, not reported as expired forever.
        let err = manager.verify(account, &code).unwrap_err();
        assert!(matches!(err, AuthError::NoActiveChallenge));
    }

    #[test]
    fn issue_sweeps_expired_challenges() {
        let manager = OtpManager::new(Duration::ZERO, Duration::ZERO);
        let stale = Uuid::new_v4();
        manager.issue(stale).expect("issue");
        std::thread::sleep(Duration::from_millis(5));

        let fresh = Uuid::new_v4();
        manager.issue(fresh).expect("issue");

        let challenges = manager.challenges.lock().expect("lock");
        assert!(!challenges.contains_key(&stale));
        assert_eq!(challenges.len(), 1);
    }

    #[test]
    fn resend_before_cooldown_is_rejected() {
        let manager = manager();
        let account = Uuid::new_v4();
        manager.issue(account).expect("issue");

        let err = manager.resend(account).unwrap_err();
        assert!(matches!(err, AuthError::ResendTooSoon));
    }

    #[test]
    fn resend_supersedes_previous_challenge() {
        let manager = OtpManager::new(Duration::from_secs(600), Duration::ZERO);
        let account = Uuid::new_v4();
        let old_code = manager.issue(account).expect("issue");
        let new_code = manager.resend(account).expect("resend");

        if old_code != new_code {
            let err = manager.verify(account, &old_code).unwrap_err();
            assert!(matches!(err, AuthError::OtpMismatch));
        }
        manager.verify(account, &new_code).expect("new code verifies");
    }

    #[test]
    fn resend_allowed_once_prior_challenge_expired() {
        // Cooldown only guards an *active* challenge.
        let manager = OtpManager::new(Duration::ZERO, Duration::from_secs(600));
        let account = Uuid::new_v4();
        manager.issue(account).expect("issue");
        std::thread::sleep(Duration::from_millis(5));

        manager.resend(account).expect("resend after expiry");
    }

    #[test]
    fn clear_removes_challenge() {
        let manager = manager();
        let account = Uuid::new_v4();
        let code = manager.issue(account).expect("issue");
        manager.clear(account).expect("clear");

        let err = manager.verify(account, &code).unwrap_err();
        assert!(matches!(err, AuthError::NoActiveChallenge));
    }
}
