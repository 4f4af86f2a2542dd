//! Outbound notification port

use async_trait::async_trait;

use crate::events::Notification;

use super::repositories::RepoResult;

/// Delivers notifications to the chat group
///
/// Called after the guild lock is released.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> RepoResult<()>;
}
