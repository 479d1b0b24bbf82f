//! SQLite calendar webhook store

use std::sync::Arc;

use application::{error::ApplicationError, ports::CalendarWebhookStorePort};
use async_trait::async_trait;
use domain::CalendarWebhook;
use rusqlite::{OptionalExtension, params};
use tokio::task;
use tracing::{debug, instrument};

use super::{
    connection::ConnectionPool,
    error::{map_document_error, map_pool_error, map_sqlite_error},
};

/// SQLite-based calendar webhook store keyed by calendar id
#[derive(Debug, Clone)]
pub struct SqliteCalendarWebhookStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteCalendarWebhookStore {
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarWebhookStorePort for SqliteCalendarWebhookStore {
    #[instrument(skip(self))]
    async fn get(&self, calendar_id: &str) -> Result<Option<CalendarWebhook>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let calendar_id = calendar_id.to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            let document: Option<String> = conn
                .query_row(
                    "SELECT document FROM calendar_webhooks WHERE calendar_id = ?1",
                    [&calendar_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sqlite_error)?;

            debug!(found = document.is_some(), "Retrieved calendar webhook");
            document
                .as_deref()
                .map(serde_json::from_str::<CalendarWebhook>)
                .transpose()
                .map_err(map_document_error)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, webhook), fields(calendar_id = %webhook.calendar_id))]
    async fn put(&self, webhook: &CalendarWebhook) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let calendar_id = webhook.calendar_id.clone();
        let document = serde_json::to_string(webhook).map_err(map_document_error)?;

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            conn.execute(
                "INSERT INTO calendar_webhooks (calendar_id, document) VALUES (?1, ?2)
                 ON CONFLICT(calendar_id) DO UPDATE SET document = excluded.document",
                params![calendar_id, document],
            )
            .map_err(map_sqlite_error)?;

            debug!("Stored calendar webhook");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
