//! Calendar webhook entity - one push-notification channel per calendar

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{errors::DomainError, value_objects::WebhookId};

const EXPIRATION_KEY: &str = "_expiration";

/// The registered push channel for a calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarWebhook {
    pub calendar_id: String,
    pub webhook_id: WebhookId,
    /// When a channel was first registered for this calendar
    pub created: DateTime<Utc>,
    /// Channel response fields, each key prefixed with `_`
    #[serde(default)]
    pub channel: Map<String, Value>,
    /// Channel expiry in epoch milliseconds
    #[serde(default)]
    pub expiration: Option<i64>,
}

impl CalendarWebhook {
    /// Create a record for a calendar that has no channel yet
    #[must_use]
    pub fn new(calendar_id: impl Into<String>, webhook_id: WebhookId) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            webhook_id,
            created: Utc::now(),
            channel: Map::new(),
            expiration: None,
        }
    }

    /// Record a fresh channel response, keeping the original `created` time
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] when the expiration is not an
    /// integer or a string holding one.
    pub fn record_channel(
        &mut self,
        webhook_id: WebhookId,
        response: Map<String, Value>,
    ) -> Result<(), DomainError> {
        self.webhook_id = webhook_id;
        for (key, value) in response {
            self.channel.insert(format!("_{key}"), value);
        }

        self.expiration = match self.channel.get(EXPIRATION_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => Some(coerce_epoch_millis(value)?),
        };
        if let Some(expiration) = self.expiration {
            self.channel
                .insert(EXPIRATION_KEY.to_string(), Value::from(expiration));
        }

        Ok(())
    }
}

fn coerce_epoch_millis(value: &Value) -> Result<i64, DomainError> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| DomainError::ValidationError(format!("invalid channel expiration: {value}")))
}
