/*
Notification Container Module

The message fanned out to subscribers when a qualifying appointment date is
detected. Every message carries a deep link back to the provider's booking
page; the link includes the issue time so two messages for the same date are
never byte-identical.
*/

use super::appointment::ProviderId;
use chrono::{DateTime, NaiveDate, Utc};
use url::Url;

/// Display format used for dates in outgoing messages.
pub const MESSAGE_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentNotification {
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub link: Url,
}

impl AppointmentNotification {
    pub fn new(
        provider_id: ProviderId,
        date: NaiveDate,
        booking_url: &Url,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let link = booking_link(booking_url, &provider_id, issued_at);
        Self { provider_id, date, link }
    }

    pub fn text(&self) -> String {
        format!(
            "A new appointment is available on {}.\nBook it here: {}",
            self.date.format(MESSAGE_DATE_FORMAT),
            self.link
        )
    }
}

/// `<booking_url>?ItemKeyIndex=<id>&t=<unix millis>`
pub fn booking_link(booking_url: &Url, provider_id: &ProviderId, issued_at: DateTime<Utc>) -> Url {
    let mut link = booking_url.clone();
    link.query_pairs_mut()
        .append_pair("ItemKeyIndex", provider_id.as_str())
        .append_pair("t", &issued_at.timestamp_millis().to_string());
    link
}
