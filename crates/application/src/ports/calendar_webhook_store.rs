//! Calendar webhook store port

use async_trait::async_trait;
use domain::CalendarWebhook;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisting calendar webhook records keyed by calendar id
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarWebhookStorePort: Send + Sync {
    async fn get(&self, calendar_id: &str) -> Result<Option<CalendarWebhook>, ApplicationError>;

    async fn put(&self, webhook: &CalendarWebhook) -> Result<(), ApplicationError>;
}
