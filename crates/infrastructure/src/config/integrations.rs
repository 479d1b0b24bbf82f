//! External integration configurations: Affinity, Harmonic, Google Calendar.

use integration_affinity::AffinityConfig;
use integration_harmonic::HarmonicConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::adapters::GoogleCalendarConfig;

const fn default_timeout() -> u64 {
    30
}

// ==============================
// Affinity Configuration
// ==============================

/// Affinity CRM configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AffinityAppConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL
    #[serde(default = "default_affinity_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_affinity_base_url() -> String {
    "https://api.affinity.co".to_string()
}

impl Default for AffinityAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_affinity_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl std::fmt::Debug for AffinityAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffinityAppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AffinityAppConfig {
    /// Convert to `integration_affinity`'s `AffinityConfig`
    #[must_use]
    pub fn to_affinity_config(&self) -> AffinityConfig {
        AffinityConfig {
            api_key: self
                .api_key
                .as_ref()
                .map(|k| k.expose_secret().to_string()),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

// ==============================
// Harmonic Configuration
// ==============================

/// Harmonic sourcing platform configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct HarmonicAppConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// GraphQL endpoint
    #[serde(default = "default_harmonic_graphql_url")]
    pub graphql_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_harmonic_graphql_url() -> String {
    "https://api.harmonic.ai/graphql".to_string()
}

impl Default for HarmonicAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            graphql_url: default_harmonic_graphql_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl std::fmt::Debug for HarmonicAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicAppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("graphql_url", &self.graphql_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HarmonicAppConfig {
    /// Convert to `integration_harmonic`'s `HarmonicConfig`
    #[must_use]
    pub fn to_harmonic_config(&self) -> HarmonicConfig {
        HarmonicConfig {
            api_key: self
                .api_key
                .as_ref()
                .map(|k| k.expose_secret().to_string()),
            graphql_url: self.graphql_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

// ==============================
// Google Calendar Configuration
// ==============================

/// Google Calendar push-notification configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct CalendarAppConfig {
    /// Calendar API root
    #[serde(default = "default_calendar_base_url")]
    pub base_url: String,

    /// OAuth access token (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Public URL notifications are delivered to
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Token echoed back in every notification (sensitive)
    #[serde(default, skip_serializing)]
    pub webhook_token: Option<SecretString>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_calendar_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

impl Default for CalendarAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_calendar_base_url(),
            access_token: None,
            webhook_url: None,
            webhook_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl std::fmt::Debug for CalendarAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarAppConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("webhook_url", &self.webhook_url)
            .field(
                "webhook_token",
                &self.webhook_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CalendarAppConfig {
    /// Connection settings for the calendar watch adapter
    #[must_use]
    pub fn to_google_config(&self) -> GoogleCalendarConfig {
        GoogleCalendarConfig {
            base_url: self.base_url.clone(),
            access_token: self
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            timeout_secs: self.timeout_secs,
        }
    }
}

// ==============================
// Reconciliation Configuration
// ==============================

/// Limits for the reconciliation workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationAppConfig {
    /// Upper bound for one reconciliation in seconds (default: 60)
    #[serde(default = "default_reconciliation_timeout")]
    pub timeout_secs: u64,
}

const fn default_reconciliation_timeout() -> u64 {
    60
}

impl Default for ReconciliationAppConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_reconciliation_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affinity_defaults() {
        let config = AffinityAppConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "https://api.affinity.co");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn affinity_converts_with_key() {
        let config: AffinityAppConfig =
            serde_json::from_str(r#"{"api_key": "aff-key", "timeout_secs": 5}"#).unwrap();
        let client_config = config.to_affinity_config();
        assert_eq!(client_config.api_key.as_deref(), Some("aff-key"));
        assert_eq!(client_config.timeout_secs, 5);
    }

    #[test]
    fn harmonic_converts_with_key() {
        let config: HarmonicAppConfig = serde_json::from_str(r#"{"api_key": "h-key"}"#).unwrap();
        let client_config = config.to_harmonic_config();
        assert_eq!(client_config.api_key.as_deref(), Some("h-key"));
        assert_eq!(client_config.graphql_url, "https://api.harmonic.ai/graphql");
    }

    #[test]
    fn secrets_are_not_serialized() {
        let config: AffinityAppConfig =
            serde_json::from_str(r#"{"api_key": "aff-key"}"#).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("aff-key"));
    }

    #[test]
    fn calendar_debug_redacts_tokens() {
        let config: CalendarAppConfig = serde_json::from_str(
            r#"{"access_token": "ya29.token", "webhook_token": "hook-secret",
                "webhook_url": "https://hooks.test/cal"}"#,
        )
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("ya29.token"));
        assert!(!debug.contains("hook-secret"));
        assert!(debug.contains("https://hooks.test/cal"));
    }

    #[test]
    fn reconciliation_timeout_defaults_to_a_minute() {
        assert_eq!(ReconciliationAppConfig::default().timeout_secs, 60);
    }
}
