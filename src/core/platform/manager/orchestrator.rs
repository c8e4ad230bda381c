/*
Orchestrator

Runs one check for a provider: fetch the published appointment date and the
last notified date concurrently, compare them, filter by the qualifying window,
fan out a notification and persist the new date.

Only a fetch failure raises. Store reads degrade to "nothing known", a failed
store write is logged and the invocation still completes; the next check will
then notify the same date again.

There is no lock around read-compare-notify-write, so two overlapping checks of
the same provider can both notify.
*/

use crate::application::ports::input::appointment_date_port::AppointmentDatePort;
use crate::application::storage::appointment_store::AppointmentStorePort;
use crate::core::platform::container::appointment::{AppointmentRecord, ProviderId, QualifyingWindow};
use crate::core::platform::container::notification::AppointmentNotification;
use crate::core::platform::manager::notification_service::NotificationService;
use crate::error::CheckError;
use chrono::{Local, NaiveDate, Utc};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// What a completed check did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The page has no published appointment
    NoAppointment,
    /// The published date was already notified
    Unchanged { date: NaiveDate },
    /// New date, but too far away (or in the past); nothing stored
    OutsideWindow { date: NaiveDate },
    Notified { date: NaiveDate, recipients: usize },
}

pub struct AppointmentOrchestrator {
    dates: Arc<dyn AppointmentDatePort>,
    store: Arc<dyn AppointmentStorePort>,
    notifier: NotificationService,
    booking_url: Url,
    window_days: u32,
}

impl AppointmentOrchestrator {
    pub fn new(
        dates: Arc<dyn AppointmentDatePort>,
        store: Arc<dyn AppointmentStorePort>,
        notifier: NotificationService,
        booking_url: Url,
        window_days: u32,
    ) -> Self {
        Self { dates, store, notifier, booking_url, window_days }
    }

    pub async fn check_and_notify(&self, provider_id: &ProviderId) -> Result<CheckOutcome, CheckError> {
        self.check_and_notify_on(provider_id, Local::now().date_naive()).await
    }

    pub async fn check_and_notify_on(
        &self,
        provider_id: &ProviderId,
        today: NaiveDate,
    ) -> Result<CheckOutcome, CheckError> {
        let (fetched, stored) = tokio::join!(
            self.dates.fetch_next_date(provider_id),
            self.last_notified_date(provider_id),
        );

        let fetched = match fetched {
            Ok(date) => date,
            Err(e) => {
                error!("Could not determine next appointment for {}: {}", provider_id, e);
                return Err(e.into());
            }
        };

        let Some(published) = fetched else {
            info!("No appointment published for {}", provider_id);
            return Ok(CheckOutcome::NoAppointment);
        };

        let record = AppointmentRecord::new(provider_id.clone(), stored);
        let Some(date) = record.changed_date(Some(published)) else {
            info!("Appointment for {} unchanged ({})", provider_id, published);
            return Ok(CheckOutcome::Unchanged { date: published });
        };

        let window = QualifyingWindow::starting(today, self.window_days);
        if !window.contains(date) {
            info!(
                "New appointment for {} on {} is outside {}..={}",
                provider_id, date, window.start, window.end
            );
            return Ok(CheckOutcome::OutsideWindow { date });
        }

        let notification = AppointmentNotification::new(provider_id.clone(), date, &self.booking_url, Utc::now());
        let recipients = self.notifier.notify_all(provider_id, &notification.text()).await;
        info!("Notified {} subscriber(s) of {} about {}", recipients, provider_id, date);

        match self.store.set_last_notified_date(provider_id, date).await {
            Ok(()) => info!("Stored {} as last notified date for {}", date, provider_id),
            Err(e) => error!("Failed to store last notified date for {}: {}", provider_id, e),
        }

        Ok(CheckOutcome::Notified { date, recipients })
    }

    async fn last_notified_date(&self, provider_id: &ProviderId) -> Option<NaiveDate> {
        match self.store.get_last_notified_date(provider_id).await {
            Ok(date) => date,
            Err(e) => {
                warn!("Could not read last notified date for {}, assuming none: {}", provider_id, e);
                None
            }
        }
    }
}
