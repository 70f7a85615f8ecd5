//! Outbound email abstraction and message templates.
//!
//! Actual SMTP transport is an external collaborator behind [`EmailSender`].
//! The orchestrator spawns deliveries fire-and-forget: a failed send is
//! logged and never rolls back or fails the flow that triggered it. The
//! default sender for local dev logs the payload instead of sending.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub body: String,
}

/// Email delivery abstraction.
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error; callers treat errors as
    /// log-only.
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug, Default)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            body = %message.body,
            "email send stub"
        );
        Ok(())
    }
}

/// Verification email carrying the one-time code.
#[must_use]
pub fn otp_email(to_email: &str, name: &str, code: &str, ttl_minutes: u64) -> EmailMessage {
    EmailMessage {
        to_email: to_email.to_string(),
        subject: "Verify your Veriface account".to_string(),
        body: format!(
            "Hello {name},\n\n\
             Your verification code is: {code}\n\n\
             The code expires in {ttl_minutes} minutes. If you did not sign up, \
             you can ignore this email.\n"
        ),
    }
}

/// Notice sent after every successful login.
#[must_use]
pub fn login_notice_email(to_email: &str, name: &str) -> EmailMessage {
    EmailMessage {
        to_email: to_email.to_string(),
        subject: "New login to your Veriface account".to_string(),
        body: format!(
            "Hello {name},\n\n\
             Your account was just used to log in. If this was not you, \
             reset your password immediately.\n"
        ),
    }
}

/// Deliver a message on a background task; the outcome is logged, never
/// surfaced to the triggering flow.
pub fn send_detached(sender: Arc<dyn EmailSender>, message: EmailMessage) {
    tokio::spawn(async move {
        if let Err(err) = sender.send(&message) {
            error!(to_email = %message.to_email, "failed to send email: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_email_contains_code_and_expiry() {
        let message = otp_email("alice@example.com", "Alice", "123456", 10);
        assert_eq!(message.to_email, "alice@example.com");
        assert!(message.body.contains("123456"));
        assert!(message.body.contains("10 minutes"));
    }

    #[test]
    fn login_notice_addresses_the_user() {
        let message = login_notice_email("bob@example.com", "Bob");
        assert!(message.body.contains("Bob"));
        assert!(message.subject.contains("login"));
    }

    #[test]
    fn log_sender_accepts_messages() {
        let sender = LogEmailSender;
        sender
            .send(&otp_email("x@example.com", "X", "000000", 10))
            .expect("log sender never fails");
    }
}
