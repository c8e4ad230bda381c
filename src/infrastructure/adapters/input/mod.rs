pub mod embedded_state;
pub mod http_appointment_fetcher;

pub use http_appointment_fetcher::{HttpAppointmentFetcher, RetryPolicy};
