//! Signup throttling per source IP over a sliding window.
//!
//! Only signup is gated; login and OTP verification are left to outer
//! infrastructure. A rejected attempt still counts, so retrying cannot be
//! used to slip under the cap.

use anyhow::Context;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::error::AuthError;

/// Gate consulted by the signup flow before any other work.
pub trait SignupRateLimiter: Send + Sync {
    /// Record the attempt and decide whether it may proceed.
    fn allow(&self, source_ip: &str) -> Result<(), AuthError>;
}

/// Limiter that always allows; used in tests and single-user setups.
#[derive(Clone, Debug, Default)]
pub struct NoopLimiter;

impl SignupRateLimiter for NoopLimiter {
    fn allow(&self, _source_ip: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Per-IP sliding-window limiter: at most `cap` attempts within `window`.
pub struct SlidingWindowLimiter {
    cap: usize,
    window: Duration,
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    #[must_use]
    pub fn new(cap: usize, window: Duration) -> Self {
        Self {
            cap,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }
}

impl SignupRateLimiter for SlidingWindowLimiter {
    fn allow(&self, source_ip: &str) -> Result<(), AuthError> {
        let now = Instant::now();
        let mut attempts = self
            .attempts
            .lock()
            .map_err(|_| anyhow::anyhow!("rate limiter lock poisoned"))
            .context("rate limiter unavailable")
            .map_err(AuthError::Internal)?;

        // The key space is caller controlled; drop addresses whose newest
        // attempt fell out of the window so the map stays bounded.
        attempts.retain(|_, record| {
            record
                .last()
                .is_some_and(|last| now.duration_since(*last) < self.window)
        });

        // The whole read-evict-increment-compare sequence runs under one
        // lock, so concurrent requests from the same IP cannot undercount.
        let record = attempts.entry(source_ip.to_string()).or_default();
        record.retain(|attempt| now.duration_since(*attempt) < self.window);
        record.push(now);

        if record.len() > self.cap {
            return Err(AuthError::RateLimited);
        }
        Ok(())
    }
}
