/*
Appointment Date Port

Input port for whatever source publishes the next available appointment of a
provider. `Ok(None)` means the source answered and nothing is published;
an `Err` means the answer is unknown.
*/

use crate::core::platform::container::appointment::ProviderId;
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait AppointmentDatePort: Send + Sync {
    async fn fetch_next_date(&self, provider_id: &ProviderId) -> Result<Option<NaiveDate>, FetchError>;
}
