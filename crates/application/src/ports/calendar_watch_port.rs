//! Calendar push-notification port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApplicationError;

/// Body of a channel watch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchChannelRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub token: String,
    pub address: String,
}

impl WatchChannelRequest {
    /// Build a `web_hook` channel request
    #[must_use]
    pub fn web_hook(
        id: impl Into<String>,
        token: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: "web_hook".to_string(),
            token: token.into(),
            address: address.into(),
        }
    }
}

/// Port for opening calendar event watch channels
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarWatchPort: Send + Sync {
    /// Open a channel and return the provider's raw channel response
    async fn watch(
        &self,
        calendar_id: &str,
        request: &WatchChannelRequest,
    ) -> Result<Map<String, Value>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_hook_request_serializes_type_field() {
        let request = WatchChannelRequest::web_hook("abc", "secret", "https://hook.test/cb");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "web_hook");
        assert_eq!(json["id"], "abc");
        assert_eq!(json["token"], "secret");
        assert_eq!(json["address"], "https://hook.test/cb");
    }
}
