/*
Appointment Storage Ports

The application layer talks to persistence through two narrow ports: one for
the last-notified date per provider and one for the chats subscribed to a
provider. Adapters report failures honestly through `RepositoryError`; the
orchestrator decides how to degrade.
*/
use crate::core::platform::container::appointment::ProviderId;
use crate::core::platform::container::subscription::ChatId;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),
    #[error("Query execution error: {0}")]
    QueryError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Migration error: {0}")]
    MigrationError(String),
}

#[async_trait]
pub trait AppointmentStorePort: Send + Sync {
    /// Date of the last notification sent for this provider, if any
    async fn get_last_notified_date(&self, provider_id: &ProviderId) -> Result<Option<NaiveDate>, RepositoryError>;

    /// Insert or overwrite the last-notified date
    async fn set_last_notified_date(&self, provider_id: &ProviderId, date: NaiveDate) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait SubscriberStorePort: Send + Sync {
    /// Chats subscribed to this provider
    async fn get_subscribers(&self, provider_id: &ProviderId) -> Result<Vec<ChatId>, RepositoryError>;
}
