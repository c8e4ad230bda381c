/*
Appointment Container Module

A provider is identified on the scheduling site by an opaque `ItemKeyIndex`
value. For every provider we remember the appointment date we last notified
subscribers about; that date is the only de-duplication key the system has.

The qualifying window decides whether a freshly detected date is close enough
to be worth a notification.
*/

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default width of the qualifying window, in days after today.
pub const DEFAULT_WINDOW_DAYS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentError {
    #[error("Provider identifier must not be empty")]
    EmptyProviderId,
}

/// Opaque provider key, used as the join key across both stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(value: impl Into<String>) -> Result<Self, AppointmentError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppointmentError::EmptyProviderId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProviderId {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProviderId {
    type Error = AppointmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.0
    }
}

/// One row of `notification_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub provider_id: ProviderId,
    pub last_notified_date: Option<NaiveDate>,
}

impl AppointmentRecord {
    pub fn new(provider_id: ProviderId, last_notified_date: Option<NaiveDate>) -> Self {
        Self { provider_id, last_notified_date }
    }

    /// Returns the fetched date when it differs from the one already notified.
    pub fn changed_date(&self, fetched: Option<NaiveDate>) -> Option<NaiveDate> {
        match (fetched, self.last_notified_date) {
            (Some(new), Some(old)) if new == old => None,
            (Some(new), _) => Some(new),
            (None, _) => None,
        }
    }
}

/// Inclusive `[start, end]` range of dates that trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifyingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QualifyingWindow {
    pub fn starting(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
