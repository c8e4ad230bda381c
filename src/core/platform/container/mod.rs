pub mod appointment;
pub mod notification;
pub mod subscription;
