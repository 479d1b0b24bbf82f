//! Calendar service
//!
//! Opens push-notification channels for calendars and keeps one webhook
//! record per calendar.

use std::{fmt, sync::Arc};

use domain::{CalendarWebhook, WebhookId};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    ports::{CalendarWatchPort, CalendarWebhookStorePort, WatchChannelRequest},
};

/// Where calendar notifications are delivered
#[derive(Clone, Default)]
pub struct CalendarWebhookSettings {
    /// Public callback URL
    pub address: Option<String>,
    /// Shared token echoed back in every notification
    pub token: Option<String>,
}

impl fmt::Debug for CalendarWebhookSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarWebhookSettings")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Calendar service for webhook channel management
pub struct CalendarService {
    watch_port: Arc<dyn CalendarWatchPort>,
    store: Arc<dyn CalendarWebhookStorePort>,
    settings: CalendarWebhookSettings,
}

impl fmt::Debug for CalendarService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CalendarService {
    /// Create a new calendar service
    pub fn new(
        watch_port: Arc<dyn CalendarWatchPort>,
        store: Arc<dyn CalendarWebhookStorePort>,
        settings: CalendarWebhookSettings,
    ) -> Self {
        Self {
            watch_port,
            store,
            settings,
        }
    }

    /// Open a new channel for `calendar_id` and persist it
    #[instrument(skip(self))]
    pub async fn subscribe_channel(
        &self,
        calendar_id: &str,
    ) -> Result<CalendarWebhook, ApplicationError> {
        let address = self.settings.address.as_deref().ok_or_else(|| {
            ApplicationError::Configuration("calendar webhook address is not set".into())
        })?;
        let token = self.settings.token.as_deref().ok_or_else(|| {
            ApplicationError::Configuration("calendar webhook token is not set".into())
        })?;

        let webhook_id = WebhookId::new();
        let request = WatchChannelRequest::web_hook(webhook_id.to_string(), token, address);
        let response = self.watch_port.watch(calendar_id, &request).await?;

        info!(calendar_id, webhook_id = %webhook_id, "Calendar channel opened");
        self.set_webhook_calendar(webhook_id, calendar_id, response)
            .await
    }

    /// Merge a channel response into the calendar's webhook record
    ///
    /// The first registration time is preserved across renewals.
    #[instrument(skip(self, response))]
    pub async fn set_webhook_calendar(
        &self,
        webhook_id: WebhookId,
        calendar_id: &str,
        response: Map<String, Value>,
    ) -> Result<CalendarWebhook, ApplicationError> {
        let mut webhook = self
            .store
            .get(calendar_id)
            .await?
            .unwrap_or_else(|| CalendarWebhook::new(calendar_id, webhook_id));

        webhook.record_channel(webhook_id, response)?;
        self.store.put(&webhook).await?;
        Ok(webhook)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::ports::{MockCalendarWatchPort, MockCalendarWebhookStorePort};

    fn settings() -> CalendarWebhookSettings {
        CalendarWebhookSettings {
            address: Some("https://hooks.test/calendar".into()),
            token: Some("secret-token".into()),
        }
    }

    fn channel_response() -> Map<String, Value> {
        match json!({
            "kind": "api#channel",
            "resourceId": "res-1",
            "expiration": "1700000000000"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn subscribe_opens_channel_and_stores_record() {
        let mut watch = MockCalendarWatchPort::new();
        watch
            .expect_watch()
            .withf(|calendar_id, request| {
                calendar_id == "primary"
                    && request.kind == "web_hook"
                    && request.token == "secret-token"
                    && request.address == "https://hooks.test/calendar"
            })
            .returning(|_, _| Ok(channel_response()));
        let mut store = MockCalendarWebhookStorePort::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_put()
            .withf(|webhook| webhook.calendar_id == "primary")
            .times(1)
            .returning(|_| Ok(()));

        let service = CalendarService::new(Arc::new(watch), Arc::new(store), settings());
        let webhook = service.subscribe_channel("primary").await.unwrap();

        assert_eq!(webhook.calendar_id, "primary");
        assert_eq!(webhook.expiration, Some(1_700_000_000_000));
        assert_eq!(webhook.channel["_resourceId"], "res-1");
    }

    #[tokio::test]
    async fn renewal_keeps_created_timestamp() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut existing = CalendarWebhook::new("primary", WebhookId::new());
        existing.created = created;

        let mut store = MockCalendarWebhookStorePort::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        store.expect_put().returning(|_| Ok(()));

        let service = CalendarService::new(
            Arc::new(MockCalendarWatchPort::new()),
            Arc::new(store),
            settings(),
        );
        let new_id = WebhookId::new();
        let webhook = service
            .set_webhook_calendar(new_id, "primary", channel_response())
            .await
            .unwrap();

        assert_eq!(webhook.created, created);
        assert_eq!(webhook.webhook_id, new_id);
    }

    #[tokio::test]
    async fn missing_address_is_a_configuration_error() {
        let mut watch = MockCalendarWatchPort::new();
        watch.expect_watch().never();

        let service = CalendarService::new(
            Arc::new(watch),
            Arc::new(MockCalendarWebhookStorePort::new()),
            CalendarWebhookSettings {
                address: None,
                token: Some("t".into()),
            },
        );

        let err = service.subscribe_channel("primary").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn settings_debug_redacts_token() {
        let debug = format!("{:?}", settings());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret-token"));
    }
}
