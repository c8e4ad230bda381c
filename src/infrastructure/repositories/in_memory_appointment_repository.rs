/*
In-Memory Appointment Repository

Implements both store ports over process memory. Nothing survives a restart,
which makes it suitable for tests and throwaway runs only.
*/

use crate::application::storage::appointment_store::{
    AppointmentStorePort, RepositoryError, SubscriberStorePort,
};
use crate::core::platform::container::appointment::ProviderId;
use crate::core::platform::container::subscription::{ChatId, SubscriptionRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    dates: RwLock<HashMap<ProviderId, NaiveDate>>,
    subscriptions: RwLock<BTreeSet<(ProviderId, ChatId)>>,
    writes: AtomicUsize,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscribers(self, provider_id: &ProviderId, chat_ids: &[ChatId]) -> Self {
        if let Ok(mut subscriptions) = self.subscriptions.write() {
            for chat_id in chat_ids {
                subscriptions.insert((provider_id.clone(), *chat_id));
            }
        }
        self
    }

    /// Seed a stored date without counting it as a write
    pub fn with_last_notified_date(self, provider_id: &ProviderId, date: NaiveDate) -> Self {
        if let Ok(mut dates) = self.dates.write() {
            dates.insert(provider_id.clone(), date);
        }
        self
    }

    pub fn add_subscription(&self, subscription: &SubscriptionRecord) -> Result<(), RepositoryError> {
        let mut subscriptions = self.subscriptions.write().map_err(|_| {
            RepositoryError::ConnectionError("Subscription storage unavailable".to_string())
        })?;
        subscriptions.insert((subscription.provider_id.clone(), subscription.chat_id));
        Ok(())
    }

    pub fn remove_subscription(&self, subscription: &SubscriptionRecord) -> Result<bool, RepositoryError> {
        let mut subscriptions = self.subscriptions.write().map_err(|_| {
            RepositoryError::ConnectionError("Subscription storage unavailable".to_string())
        })?;
        Ok(subscriptions.remove(&(subscription.provider_id.clone(), subscription.chat_id)))
    }

    /// Number of successful `set_last_notified_date` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppointmentStorePort for InMemoryAppointmentRepository {
    async fn get_last_notified_date(&self, provider_id: &ProviderId) -> Result<Option<NaiveDate>, RepositoryError> {
        let dates = self.dates.read().map_err(|_| {
            RepositoryError::ConnectionError("Date storage unavailable".to_string())
        })?;
        Ok(dates.get(provider_id).copied())
    }

    async fn set_last_notified_date(&self, provider_id: &ProviderId, date: NaiveDate) -> Result<(), RepositoryError> {
        let mut dates = self.dates.write().map_err(|_| {
            RepositoryError::ConnectionError("Date storage unavailable".to_string())
        })?;
        dates.insert(provider_id.clone(), date);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SubscriberStorePort for InMemoryAppointmentRepository {
    async fn get_subscribers(&self, provider_id: &ProviderId) -> Result<Vec<ChatId>, RepositoryError> {
        let subscriptions = self.subscriptions.read().map_err(|_| {
            RepositoryError::ConnectionError("Subscription storage unavailable".to_string())
        })?;
        Ok(subscriptions
            .iter()
            .filter(|(id, _)| id == provider_id)
            .map(|(_, chat_id)| *chat_id)
            .collect())
    }
}
