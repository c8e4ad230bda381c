/*
Telegram Notification Adapter

Delivers chat messages through the Bot API `sendMessage` method. The response
is not inspected for success: a message is considered handed off once the
request reaches the API.
*/

use crate::application::ports::output::notification_port::{
    ChatNotificationPort, NotificationPortError, NotificationPortResult,
};
use crate::config::application_settings::TelegramConfig;
use crate::core::platform::container::subscription::ChatId;
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: ChatId,
    text: &'a str,
}

/// Holds the bot token inside `send_message_url`, so it has no `Debug` impl.
pub struct TelegramNotificationAdapter {
    client: reqwest::Client,
    send_message_url: Url,
}

impl TelegramNotificationAdapter {
    pub fn new(config: &TelegramConfig) -> NotificationPortResult<Self> {
        if config.bot_token.trim().is_empty() {
            return Err(NotificationPortError::ConfigurationError(
                "telegram.bot_token is not set".to_string(),
            ));
        }

        let endpoint = format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            config.bot_token.trim()
        );
        let send_message_url = Url::parse(&endpoint).map_err(|e| {
            NotificationPortError::ConfigurationError(format!("Invalid telegram.api_url: {}", e))
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            send_message_url,
        })
    }
}

#[async_trait]
impl ChatNotificationPort for TelegramNotificationAdapter {
    fn channel(&self) -> &'static str {
        "telegram"
    }

    async fn send_message(&self, chat_id: ChatId, text: &str) -> NotificationPortResult<()> {
        let response = self
            .client
            .post(self.send_message_url.clone())
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(|e| NotificationPortError::DeliveryFailed(e.without_url().to_string()))?;

        debug!("sendMessage to chat {} answered {}", chat_id, response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config_for(server: &Server) -> TelegramConfig {
        TelegramConfig {
            api_url: server.url(),
            bot_token: "123:abc".to_string(),
        }
    }

    #[test]
    fn test_missing_token_is_a_configuration_error() {
        let config = TelegramConfig {
            api_url: "https://api.telegram.org".to_string(),
            bot_token: "  ".to_string(),
        };
        assert!(matches!(
            TelegramNotificationAdapter::new(&config),
            Err(NotificationPortError::ConfigurationError(_))
        ));
    }

    #[tokio::test]
    async fn test_send_message_posts_chat_id_and_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"chat_id": 42, "text": "hello"})))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .expect(1)
            .create_async()
            .await;

        let adapter = TelegramNotificationAdapter::new(&config_for(&server)).unwrap();
        adapter.send_message(42, "hello").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_response_is_not_inspected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(403)
            .with_body(r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#)
            .create_async()
            .await;

        let adapter = TelegramNotificationAdapter::new(&config_for(&server)).unwrap();
        assert!(adapter.send_message(7, "hi").await.is_ok());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_api_is_a_delivery_failure() {
        let config = TelegramConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            bot_token: "123:abc".to_string(),
        };
        let adapter = TelegramNotificationAdapter::new(&config).unwrap();
        let result = adapter.send_message(7, "hi").await;

        match result {
            Err(NotificationPortError::DeliveryFailed(message)) => assert!(!message.contains("123:abc")),
            other => panic!("Expected delivery failure, got {:?}", other),
        }
    }
}
