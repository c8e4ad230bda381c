/*
Subscription Container Module

A subscription links a chat to a provider. Its existence is the only thing
that authorizes a chat to receive notifications for that provider.
*/

use super::appointment::ProviderId;
use serde::{Deserialize, Serialize};

/// Telegram chat identifier.
pub type ChatId = i64;

/// One row of `notifications_registered`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub chat_id: ChatId,
    pub provider_id: ProviderId,
}

impl SubscriptionRecord {
    pub fn new(chat_id: ChatId, provider_id: ProviderId) -> Self {
        Self { chat_id, provider_id }
    }
}
