/*
Notification Ports

Output port for delivering a text message to a single chat. Delivery is
fire-and-forget from the application's point of view: adapters return an error
only when the request could not be handed to the transport at all, and callers
log it without retrying.
*/

use crate::core::platform::container::subscription::ChatId;
use async_trait::async_trait;

/// Result type for notification port operations
pub type NotificationPortResult<T> = Result<T, NotificationPortError>;

/// Errors that can occur in notification port operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationPortError {
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

#[async_trait]
pub trait ChatNotificationPort: Send + Sync {
    /// Name of the transport, used in log lines
    fn channel(&self) -> &'static str;

    /// Send `text` to one chat
    async fn send_message(&self, chat_id: ChatId, text: &str) -> NotificationPortResult<()>;
}
