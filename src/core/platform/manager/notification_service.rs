/*
Notification Service

Sends appointment messages to chats. `notify` targets a single chat,
`notify_all` fans a message out to every chat subscribed to a provider.

Delivery is best effort: failures are logged per recipient, never retried and
never aggregated into a result. A subscriber lookup failure degrades to
"nobody to notify".
*/

use crate::application::ports::output::notification_port::ChatNotificationPort;
use crate::application::storage::appointment_store::SubscriberStorePort;
use crate::core::platform::container::appointment::ProviderId;
use crate::core::platform::container::subscription::ChatId;
use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    port: Arc<dyn ChatNotificationPort>,
    subscribers: Arc<dyn SubscriberStorePort>,
}

impl NotificationService {
    pub fn new(port: Arc<dyn ChatNotificationPort>, subscribers: Arc<dyn SubscriberStorePort>) -> Self {
        Self { port, subscribers }
    }

    pub async fn notify(&self, chat_id: ChatId, message: &str) {
        match self.port.send_message(chat_id, message).await {
            Ok(()) => debug!("Message handed to {} for chat {}", self.port.channel(), chat_id),
            Err(e) => warn!("Failed to notify chat {} via {}: {}", chat_id, self.port.channel(), e),
        }
    }

    /// Current subscribers of `provider_id`; empty when the lookup fails.
    pub async fn subscribers_of(&self, provider_id: &ProviderId) -> Vec<ChatId> {
        match self.subscribers.get_subscribers(provider_id).await {
            Ok(chat_ids) => chat_ids,
            Err(e) => {
                warn!("Could not load subscribers for {}, nobody will be notified: {}", provider_id, e);
                Vec::new()
            }
        }
    }

    /// Returns the number of sends dispatched, not the number delivered.
    pub async fn notify_all(&self, provider_id: &ProviderId, message: &str) -> usize {
        let chat_ids = self.subscribers_of(provider_id).await;
        join_all(chat_ids.iter().map(|chat_id| self.notify(*chat_id, message))).await;
        chat_ids.len()
    }
}
