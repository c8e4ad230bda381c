use thiserror::Error;
use actix_web::{HttpResponse, ResponseError};
use crate::core::platform::container::appointment::AppointmentError;

/// Failures while pulling the appointment date out of a provider page.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Embedded state marker not found")]
    MissingState,

    #[error("Malformed embedded state: {0}")]
    MalformedState(#[from] serde_json::Error),

    #[error("Unparsable appointment date: {0}")]
    UnparsableDate(String),

    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Gave up after {attempts} attempts: {last}")]
    AttemptsExhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

/// Raised by a check invocation. Anything else is logged and swallowed.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid provider: {0}")]
    InvalidProvider(#[from] AppointmentError),
}

impl ResponseError for CheckError {
    fn error_response(&self) -> HttpResponse {
        match *self {
            CheckError::Fetch(ref e) => {
                HttpResponse::BadGateway().body(format!("Fetch error: {}", e))
            }
            CheckError::InvalidProvider(ref e) => {
                HttpResponse::BadRequest().body(format!("Invalid provider: {}", e))
            }
        }
    }
}
