//! Best-effort fan-out of typed events to per-account subscriber channels.
//!
//! The realtime transport (websocket handshake, rooms) lives outside the
//! core; subscribers hand over an unbounded channel sender and receive
//! [`Notification`]s on it. A dead channel is logged and pruned, never
//! retried, and never blocks or fails the caller.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use super::now_unix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp_unix: i64,
}

impl Notification {
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp_unix: now_unix(),
        }
    }
}

struct Subscriber {
    id: Uuid,
    tx: UnboundedSender<Notification>,
}

/// Registry of live notification channels, multiple per account
/// (multi-device).
#[derive(Default)]
pub struct NotificationDispatcher {
    channels: Mutex<HashMap<Uuid, Vec<Subscriber>>>,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delivery channel for an account. Returns the channel id
    /// (for `unsubscribe`) and the receiving end.
    pub fn subscribe(&self, account_id: Uuid) -> (Uuid, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel_id = Uuid::new_v4();
        if let Ok(mut channels) = self.channels.lock() {
            channels
                .entry(account_id)
                .or_default()
                .push(Subscriber { id: channel_id, tx });
        }
        (channel_id, rx)
    }

    pub fn unsubscribe(&self, account_id: Uuid, channel_id: Uuid) {
        if let Ok(mut channels) = self.channels.lock() {
            if let Some(subscribers) = channels.get_mut(&account_id) {
                subscribers.retain(|subscriber| subscriber.id != channel_id);
                if subscribers.is_empty() {
                    channels.remove(&account_id);
                }
            }
        }
    }

    /// Deliver an event to every live channel of the account. Failed sends
    /// are logged and the channel dropped.
    pub fn notify(&self, account_id: Uuid, notification: &Notification) {
        let Ok(mut channels) = self.channels.lock() else {
            warn!(%account_id, "notification registry lock poisoned, dropping event");
            return;
        };
        let Some(subscribers) = channels.get_mut(&account_id) else {
            return;
        };
        subscribers.retain(|subscriber| {
            let delivered = subscriber.tx.send(notification.clone()).is_ok();
            if !delivered {
                warn!(
                    %account_id,
                    channel_id = %subscriber.id,
                    "notification channel closed, pruning"
                );
            }
            delivered
        });
        if subscribers.is_empty() {
            channels.remove(&account_id);
        }
    }
}
