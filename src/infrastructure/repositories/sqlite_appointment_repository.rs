/*
SQLite Appointment Repository Adapter

Concrete implementation of the appointment and subscriber store ports on top of
an sqlx SQLite pool. Owns the two tables:

- notification_date(item_key_index TEXT PRIMARY KEY, last_notification_date DATE)
- notifications_registered(chat_id INTEGER, item_key_index TEXT, PRIMARY KEY(chat_id, item_key_index))
*/

use crate::application::storage::appointment_store::{
    AppointmentStorePort, RepositoryError, SubscriberStorePort,
};
use crate::config::application_settings::DatabaseConfig;
use crate::core::platform::container::appointment::{AppointmentRecord, ProviderId};
use crate::core::platform::container::subscription::{ChatId, SubscriptionRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};

#[derive(Debug, Clone)]
pub struct SqliteAppointmentRepository {
    pool: SqlitePool,
}

impl SqliteAppointmentRepository {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect(&config.url)
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        let repository = Self { pool };
        repository.migrate().await?;

        Ok(repository)
    }

    /// Single-connection in-memory database; every pooled connection to
    /// `sqlite::memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        let repository = Self { pool };
        repository.migrate().await?;

        Ok(repository)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notification_date (
                item_key_index TEXT PRIMARY KEY NOT NULL,
                last_notification_date DATE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::MigrationError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notifications_registered (
                chat_id INTEGER NOT NULL,
                item_key_index TEXT NOT NULL,
                PRIMARY KEY (chat_id, item_key_index)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::MigrationError(e.to_string()))?;

        Ok(())
    }

    pub async fn get_record(&self, provider_id: &ProviderId) -> Result<Option<AppointmentRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT item_key_index, last_notification_date FROM notification_date WHERE item_key_index = ?",
        )
        .bind(provider_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryError(e.to_string()))?;

        match row {
            Some(row) => {
                let key: String = row.try_get("item_key_index")
                    .map_err(|e| RepositoryError::QueryError(e.to_string()))?;
                let provider_id = ProviderId::new(key)
                    .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
                let date: Option<NaiveDate> = row.try_get("last_notification_date")
                    .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
                Ok(Some(AppointmentRecord::new(provider_id, date)))
            }
            None => Ok(None),
        }
    }

    pub async fn add_subscription(&self, subscription: &SubscriptionRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT OR IGNORE INTO notifications_registered (chat_id, item_key_index) VALUES (?, ?)",
        )
        .bind(subscription.chat_id)
        .bind(subscription.provider_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryError(e.to_string()))?;

        Ok(())
    }

    /// Returns whether a subscription was actually removed
    pub async fn remove_subscription(&self, subscription: &SubscriptionRecord) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM notifications_registered WHERE chat_id = ? AND item_key_index = ?",
        )
        .bind(subscription.chat_id)
        .bind(subscription.provider_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AppointmentStorePort for SqliteAppointmentRepository {
    async fn get_last_notified_date(&self, provider_id: &ProviderId) -> Result<Option<NaiveDate>, RepositoryError> {
        Ok(self
            .get_record(provider_id)
            .await?
            .and_then(|record| record.last_notified_date))
    }

    async fn set_last_notified_date(&self, provider_id: &ProviderId, date: NaiveDate) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO notification_date (item_key_index, last_notification_date)
            VALUES (?, ?)
            ON CONFLICT(item_key_index) DO UPDATE SET last_notification_date = excluded.last_notification_date
            "#,
        )
        .bind(provider_id.as_str())
        .bind(date)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SubscriberStorePort for SqliteAppointmentRepository {
    async fn get_subscribers(&self, provider_id: &ProviderId) -> Result<Vec<ChatId>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT chat_id FROM notifications_registered WHERE item_key_index = ? ORDER BY chat_id",
        )
        .bind(provider_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryError(e.to_string()))?;

        rows.iter()
            .map(|row| row.try_get::<i64, _>("chat_id")
                .map_err(|e| RepositoryError::SerializationError(e.to_string())))
            .collect()
    }
}
