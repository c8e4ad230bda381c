pub mod telegram_notification_adapter;

// Re-export main adapters for convenience
pub use telegram_notification_adapter::TelegramNotificationAdapter;
