pub mod notification_port;
