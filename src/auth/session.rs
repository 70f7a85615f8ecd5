//! Opaque session tokens backed by hashed in-memory records.
//!
//! The raw token is only returned to the transport layer (cookie or bearer
//! header); the store keeps a SHA-256 digest, so raw values are never
//! compared or persisted.

use anyhow::Context;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use super::error::AuthError;
use super::now_unix;

#[derive(Clone, Copy, Debug)]
pub struct SessionRecord {
    pub account_id: Uuid,
    pub issued_at_unix: i64,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<[u8; 32], SessionRecord>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session and return the raw token for the transport layer.
    pub fn create(&self, account_id: Uuid) -> Result<String, AuthError> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("failed to generate session token")
            .map_err(AuthError::Internal)?;
        let token = Base64UrlUnpadded::encode_string(&bytes);

        let now = now_unix();
        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let mut sessions = self.lock()?;
        // Expired records otherwise linger until their exact token is looked
        // up again; sweep them while the lock is held.
        sessions.retain(|_, record| now - record.issued_at_unix <= ttl_secs);
        sessions.insert(
            hash_token(&token),
            SessionRecord {
                account_id,
                issued_at_unix: now,
            },
        );
        Ok(token)
    }

    /// Resolve a raw token into a live session, if any. Expired records are
    /// dropped on lookup.
    pub fn lookup(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
        let hash = hash_token(token);
        let mut sessions = self.lock()?;
        let Some(record) = sessions.get(&hash).copied() else {
            return Ok(None);
        };

        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        if now_unix() - record.issued_at_unix > ttl_secs {
            sessions.remove(&hash);
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Destroy every session for an account (logout).
    pub fn destroy_for_account(&self, account_id: Uuid) -> Result<(), AuthError> {
        self.lock()?
            .retain(|_, record| record.account_id != account_id);
        Ok(())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<[u8; 32], SessionRecord>>, AuthError> {
        self.sessions
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))
            .context("session store unavailable")
            .map_err(AuthError::Internal)
    }
}

fn hash_token(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}
