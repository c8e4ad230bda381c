use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File, Environment};
use crate::core::platform::container::appointment::{ProviderId, DEFAULT_WINDOW_DAYS};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
}

// Keeps the bot token out of logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Provider search page; `ItemKeyIndex=<id>` is appended
    pub search_url: String,
    /// Page linked from notification messages
    pub booking_url: String,
    pub user_agent: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotificationConfig {
    pub window_days: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    // An empty list does not survive the defaults layer, so it must be optional here.
    #[serde(default)]
    pub provider_ids: Vec<ProviderId>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telegram: TelegramConfig,
    pub scraper: ScraperConfig,
    pub notification: NotificationConfig,
    pub scheduler: SchedulerConfig,
}

impl Settings {
    /// Load from `config.toml` (or `config_name`), then `config.<APP_ENV>`,
    /// then `APP_*` environment variables, on top of the defaults.
    pub fn new(config_name: &str) -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&Settings::default())?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name(config_name).required(false));

        if let Ok(env) = std::env::var("APP_ENV") {
            builder = builder.add_source(File::with_name(&format!("{}.{}", config_name, env)).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scheduler.provider_ids")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite:slotwatch.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            telegram: TelegramConfig {
                api_url: "https://api.telegram.org".to_string(),
                bot_token: String::new(),
            },
            scraper: ScraperConfig {
                search_url: "https://scheduling.example.com/search".to_string(),
                booking_url: "https://scheduling.example.com/search".to_string(),
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
                max_attempts: 3,
                retry_delay_ms: 1000,
                request_timeout_secs: 30,
            },
            notification: NotificationConfig {
                window_days: DEFAULT_WINDOW_DAYS,
            },
            scheduler: SchedulerConfig {
                enabled: false,
                interval_secs: 300,
                provider_ids: Vec::new(),
            },
        }
    }
}
