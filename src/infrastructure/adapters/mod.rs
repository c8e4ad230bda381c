pub mod input;
pub mod notifications;
