//! Accounts and the in-memory account store.
//!
//! Emails are normalized to lowercase and unique across accounts. Status
//! moves `Pending -> Active` only through OTP verification; the core never
//! deletes an account except when a stale pending one is replaced on
//! re-signup.

use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::AuthError;
use super::now_unix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
}

#[derive(Clone, Debug)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Normalized (trimmed, lowercased) email.
    pub email: String,
    pub password_hash: String,
    pub status: AccountStatus,
    pub created_at_unix: i64,
    pub last_login_at_unix: Option<i64>,
}

impl Account {
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            status: AccountStatus::Pending,
            created_at_unix: now_unix(),
            last_login_at_unix: None,
        }
    }
}

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, Account>,
    by_email: HashMap<String, Uuid>,
}

/// In-memory account store with an email index.
#[derive(Default)]
pub struct AccountStore {
    inner: Mutex<Inner>,
}

impl AccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: Account) -> Result<(), AuthError> {
        let mut inner = self.lock()?;
        if inner.by_email.contains_key(&account.email) {
            return Err(AuthError::EmailTaken);
        }
        inner.by_email.insert(account.email.clone(), account.id);
        inner.by_id.insert(account.id, account);
        Ok(())
    }

    pub fn get(&self, account_id: Uuid) -> Result<Option<Account>, AuthError> {
        Ok(self.lock()?.by_id.get(&account_id).cloned())
    }

    pub fn find_by_email(&self, email_normalized: &str) -> Result<Option<Account>, AuthError> {
        let inner = self.lock()?;
        Ok(inner
            .by_email
            .get(email_normalized)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    /// Apply a mutation to an account and return the updated copy.
    pub fn update<F>(&self, account_id: Uuid, apply: F) -> Result<Account, AuthError>
    where
        F: FnOnce(&mut Account),
    {
        let mut inner = self.lock()?;
        let account = inner
            .by_id
            .get_mut(&account_id)
            .ok_or(AuthError::UnknownAccount)?;
        apply(account);
        Ok(account.clone())
    }

    /// Remove an account; only the pending-signup recovery path uses this.
    pub fn remove(&self, account_id: Uuid) -> Result<(), AuthError> {
        let mut inner = self.lock()?;
        if let Some(account) = inner.by_id.remove(&account_id) {
            inner.by_email.remove(&account.email);
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, AuthError> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("account store lock poisoned"))
            .context("account store unavailable")
            .map_err(AuthError::Internal)
    }
}
