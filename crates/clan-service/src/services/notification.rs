//! Notification delivery
//!
//! Commands collect notifications while holding the guild lock and relay them
//! after it is released. Delivery failures are logged and dropped.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use clan_core::traits::{Notifier, RepoResult};
use clan_core::{DomainError, Notification};

/// Writes every notification to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn deliver(&self, notification: &Notification) -> RepoResult<()> {
        info!(
            guild_id = %notification.guild_id,
            recipients = notification.recipients.len(),
            kind = ?notification.kind,
            "Notification"
        );
        Ok(())
    }
}

/// Forwards notifications to a channel an embedding chat bot drains
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn deliver(&self, notification: &Notification) -> RepoResult<()> {
        self.sender
            .send(notification.clone())
            .map_err(|_| DomainError::DeliveryError("notification receiver dropped".to_string()))
    }
}

/// Deliver in order, logging failures
pub async fn relay(notifier: &dyn Notifier, notifications: Vec<Notification>) {
    for notification in &notifications {
        if let Err(e) = notifier.deliver(notification).await {
            warn!(guild_id = %notification.guild_id, error = %e, "Failed to deliver notification");
        }
    }
}
