pub mod cli;
pub mod core;
pub mod application;
pub mod infrastructure;
pub mod config;
pub mod error;
pub mod setup;

pub use config::*;
pub use error::{CheckError, ExtractError, FetchError};
