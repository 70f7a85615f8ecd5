//! The authentication orchestration engine.
//!
//! Sequences signup, OTP verification, face login, password login, and
//! logout over the leaf components, enforcing the state machine and the
//! one-face-per-account invariant. Email delivery and notification fan-out
//! are fire-and-forget side effects; their failure never rolls back a
//! committed transition.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::account::{normalize_email, valid_email, Account, AccountStatus, AccountStore};
use super::email::{login_notice_email, otp_email, send_detached, EmailSender};
use super::embedding::{EmbeddingStore, FaceEncoder, FaceScan};
use super::error::AuthError;
use super::notify::{Notification, NotificationDispatcher, NotificationKind};
use super::otp::OtpManager;
use super::password::{dummy_hash, hash_password, verify_password, MIN_PASSWORD_LENGTH};
use super::rate_limit::SignupRateLimiter;
use super::session::{SessionRecord, SessionStore};
use super::similarity::{cosine_distance, is_match};
use super::state::AuthConfig;
use super::now_unix;

#[derive(Debug)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub face_image: String,
}

#[derive(Clone, Debug)]
pub struct SignupAck {
    pub account_id: Uuid,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct LoginSuccess {
    pub account: Account,
    pub session_token: String,
}

pub struct AuthEngine {
    config: AuthConfig,
    encoder: Arc<dyn FaceEncoder>,
    limiter: Arc<dyn SignupRateLimiter>,
    email: Arc<dyn EmailSender>,
    accounts: AccountStore,
    embeddings: EmbeddingStore,
    otp: OtpManager,
    sessions: SessionStore,
    dispatcher: NotificationDispatcher,
    /// Advisory lock making the face-uniqueness check and the
    /// account/embedding insert atomic with respect to concurrent signups.
    signup_lock: Mutex<()>,
}

impl AuthEngine {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        encoder: Arc<dyn FaceEncoder>,
        limiter: Arc<dyn SignupRateLimiter>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            encoder,
            limiter,
            email,
            accounts: AccountStore::new(),
            embeddings: EmbeddingStore::new(),
            otp: OtpManager::new(config.otp_ttl(), config.otp_resend_cooldown()),
            sessions: SessionStore::new(config.session_ttl()),
            dispatcher: NotificationDispatcher::new(),
            signup_lock: Mutex::new(()),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a realtime notification channel for an account.
    pub fn subscribe(&self, account_id: Uuid) -> (Uuid, UnboundedReceiver<Notification>) {
        self.dispatcher.subscribe(account_id)
    }

    pub fn unsubscribe(&self, account_id: Uuid, channel_id: Uuid) {
        self.dispatcher.unsubscribe(account_id, channel_id);
    }

    /// Signup with email, password, and a face image.
    ///
    /// Ordering: rate limit, input validation, email uniqueness, face
    /// detection, face uniqueness, then account + enrollment + OTP issue.
    /// A signup against an existing *pending* email is a recovery path: the
    /// stale account is replaced and a fresh code issued.
    pub async fn signup(
        &self,
        request: SignupRequest,
        client_ip: Option<&str>,
    ) -> Result<SignupAck, AuthError> {
        self.limiter.allow(client_ip.unwrap_or("unknown"))?;

        let name = request.name.trim().to_string();
        if name.len() < 2 {
            return Err(AuthError::Validation(
                "Name must be at least 2 characters".to_string(),
            ));
        }
        let email = normalize_email(&request.email);
        if !valid_email(&email) {
            return Err(AuthError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        if request.password.expose_secret().len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        // Fast fail before running face detection.
        if let Some(existing) = self.accounts.find_by_email(&email)? {
            if existing.status == AccountStatus::Active {
                return Err(AuthError::EmailTaken);
            }
        }

        let scan = self.encoder.detect_and_embed(&request.face_image)?;
        require_single_face(&scan)?;

        // Hash outside the signup lock; scrypt is deliberately slow.
        let password_hash = hash_password(request.password.expose_secret())?;

        let account_id = {
            let _guard = self.signup_lock.lock().await;

            // Re-check the email under the lock; a pending account is
            // replaced, an active one wins.
            if let Some(existing) = self.accounts.find_by_email(&email)? {
                if existing.status == AccountStatus::Active {
                    return Err(AuthError::EmailTaken);
                }
                debug!(%email, "replacing stale pending account on re-signup");
                self.otp.clear(existing.id)?;
                self.embeddings.remove(existing.id)?;
                self.accounts.remove(existing.id)?;
            }

            if let Some((_, distance)) = self.embeddings.nearest_neighbor(&scan.embedding, None)? {
                if is_match(distance, self.config.face_match_threshold()) {
                    return Err(AuthError::FaceAlreadyRegistered);
                }
            }

            let account = Account::new(name.clone(), email.clone(), password_hash);
            let account_id = account.id;
            self.accounts.insert(account)?;
            self.embeddings.enroll(account_id, scan.embedding.clone())?;
            account_id
        };

        let code = self.otp.issue(account_id)?;
        let ttl_minutes = self.config.otp_ttl().as_secs() / 60;
        send_detached(
            self.email.clone(),
            otp_email(&email, &name, &code, ttl_minutes),
        );

        info!(%email, "signup accepted, verification code issued");
        Ok(SignupAck { account_id, email })
    }

    /// Verify the emailed code and activate the account.
    pub fn verify_otp(&self, email: &str, code: &str) -> Result<Account, AuthError> {
        let email = normalize_email(email);
        let account = self
            .accounts
            .find_by_email(&email)?
            .ok_or(AuthError::UnknownAccount)?;
        if account.status == AccountStatus::Active {
            return Err(AuthError::AlreadyActive);
        }

        self.otp.verify(account.id, code)?;
        let account = self
            .accounts
            .update(account.id, |acct| acct.status = AccountStatus::Active)?;

        info!(%email, "account verified");
        Ok(account)
    }

    /// Re-issue the verification code for a pending account.
    pub fn resend_otp(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        let account = self
            .accounts
            .find_by_email(&email)?
            .ok_or(AuthError::UnknownAccount)?;
        if account.status == AccountStatus::Active {
            return Err(AuthError::AlreadyActive);
        }

        let code = self.otp.resend(account.id)?;
        let ttl_minutes = self.config.otp_ttl().as_secs() / 60;
        send_detached(
            self.email.clone(),
            otp_email(&email, &account.name, &code, ttl_minutes),
        );
        Ok(())
    }

    /// Login by matching a live face image against the enrolled embedding.
    pub fn login_with_face(&self, email: &str, face_image: &str) -> Result<LoginSuccess, AuthError> {
        let email = normalize_email(email);
        let account = self
            .accounts
            .find_by_email(&email)?
            .ok_or(AuthError::UnknownAccount)?;
        if account.status != AccountStatus::Active {
            return Err(AuthError::AccountNotActive);
        }

        let scan = self.encoder.detect_and_embed(face_image)?;
        require_single_face(&scan)?;

        let enrolled = self.embeddings.fetch(account.id)?;
        let distance = cosine_distance(&scan.embedding, &enrolled.vector);
        if !is_match(distance, self.config.face_match_threshold()) {
            info!(%email, distance, "face login rejected");
            return Err(AuthError::FaceMismatch);
        }

        self.finish_login(account)
    }

    /// Fallback login with email and password.
    ///
    /// Unknown email and wrong password are indistinguishable: both return
    /// `InvalidCredentials`, and the unknown case still runs one hash
    /// verification to equalize timing.
    pub fn login_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginSuccess, AuthError> {
        let email = normalize_email(email);
        let Some(account) = self.accounts.find_by_email(&email)? else {
            let _ = verify_password(dummy_hash(), password.expose_secret());
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&account.password_hash, password.expose_secret()) {
            return Err(AuthError::InvalidCredentials);
        }
        if account.status != AccountStatus::Active {
            return Err(AuthError::AccountNotActive);
        }

        self.finish_login(account)
    }

    /// Destroy every session for the account. Emits no notification.
    pub fn logout(&self, account_id: Uuid) -> Result<(), AuthError> {
        self.sessions.destroy_for_account(account_id)?;
        info!(%account_id, "logged out");
        Ok(())
    }

    /// Resolve a session token into its record and account.
    pub fn current_session(
        &self,
        token: &str,
    ) -> Result<Option<(SessionRecord, Account)>, AuthError> {
        let Some(record) = self.sessions.lookup(token)? else {
            return Ok(None);
        };
        Ok(self
            .accounts
            .get(record.account_id)?
            .map(|account| (record, account)))
    }

    /// Pre-signup probe: does the image contain exactly one usable face?
    pub fn validate_face(&self, face_image: &str) -> Result<(), AuthError> {
        let scan = self.encoder.detect_and_embed(face_image)?;
        require_single_face(&scan)
    }

    fn finish_login(&self, account: Account) -> Result<LoginSuccess, AuthError> {
        let account = self
            .accounts
            .update(account.id, |acct| acct.last_login_at_unix = Some(now_unix()))?;
        let session_token = self.sessions.create(account.id)?;

        self.dispatcher.notify(
            account.id,
            &Notification::new(
                NotificationKind::Success,
                format!("Welcome back, {}! You have successfully logged in.", account.name),
            ),
        );
        send_detached(
            self.email.clone(),
            login_notice_email(&account.email, &account.name),
        );

        info!(email = %account.email, "login successful");
        Ok(LoginSuccess {
            account,
            session_token,
        })
    }
}

fn require_single_face(scan: &FaceScan) -> Result<(), AuthError> {
    match scan.face_count {
        0 => Err(AuthError::NoFaceDetected),
        1 => Ok(()),
        _ => Err(AuthError::MultipleFacesDetected),
    }
}
