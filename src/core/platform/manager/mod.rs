pub mod notification_service;
pub mod orchestrator;
pub mod scheduler;
