//! Google Calendar watch adapter - Implements CalendarWatchPort over the Calendar v3 REST API

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{CalendarWatchPort, WatchChannelRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Connection settings for the Calendar API
#[derive(Clone)]
pub struct GoogleCalendarConfig {
    /// API root, e.g. `https://www.googleapis.com/calendar/v3`
    pub base_url: String,
    /// OAuth access token for the calendar owner
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GoogleCalendarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Opens `events.watch` channels on Google Calendar
pub struct GoogleCalendarWatchAdapter {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl std::fmt::Debug for GoogleCalendarWatchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarWatchAdapter")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GoogleCalendarWatchAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
    pub fn new(config: &GoogleCalendarConfig) -> Result<Self, ApplicationError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ApplicationError::Configuration(format!(
                "invalid calendar base url {}: {e}",
                config.base_url
            ))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    /// `{base}/calendars/{calendar_id}/events/watch` with the id percent-encoded
    fn watch_url(&self, calendar_id: &str) -> Result<Url, ApplicationError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApplicationError::Configuration("calendar base url cannot have a path".into())
            })?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events", "watch"]);
        Ok(url)
    }
}

#[async_trait]
impl CalendarWatchPort for GoogleCalendarWatchAdapter {
    #[instrument(skip(self, request), fields(channel_id = %request.id))]
    async fn watch(
        &self,
        calendar_id: &str,
        request: &WatchChannelRequest,
    ) -> Result<Map<String, Value>, ApplicationError> {
        let access_token = self.access_token.as_deref().ok_or_else(|| {
            ApplicationError::Configuration("calendar access token is not set".into())
        })?;
        let url = self.watch_url(calendar_id)?;
        debug!(url = %url, "Opening calendar watch channel");

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApplicationError::Timeout(e.to_string())
                } else {
                    ApplicationError::ExternalService(e.to_string())
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ApplicationError::NotAuthorized(format!(
                    "calendar API rejected credentials ({status})"
                )));
            },
            StatusCode::NOT_FOUND => {
                return Err(ApplicationError::NotFound(format!("calendar {calendar_id}")));
            },
            StatusCode::TOO_MANY_REQUESTS => return Err(ApplicationError::RateLimited),
            _ => {},
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApplicationError::ExternalService(format!(
                "calendar watch failed with HTTP {status}: {body}"
            )));
        }

        response
            .json::<Map<String, Value>>()
            .await
            .map_err(|e| ApplicationError::Internal(format!("invalid channel response: {e}")))
    }
}
