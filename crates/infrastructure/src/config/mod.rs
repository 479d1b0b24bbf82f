//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `integrations`: Affinity, Harmonic, Google Calendar, reconciliation limits
//! - `remote`: JSON config documents kept in object storage

mod database;
mod integrations;
mod remote;
mod server;

use std::fmt;

use application::{CalendarWebhookSettings, CrmPipelineConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use integrations::{
    AffinityAppConfig, CalendarAppConfig, HarmonicAppConfig, ReconciliationAppConfig,
};
pub use remote::{RemoteConfigError, RemoteConfigLoader, RemoteConfigLocation};
pub use server::ServerConfig;

use crate::telemetry::TelemetryConfig;

/// Variable holding the Affinity API key, outside the `MOSAIC` prefix
pub const AFFINITY_API_KEY_VAR: &str = "AFFINITY_API_KEY";
/// Variable holding the Harmonic API key, outside the `MOSAIC` prefix
pub const HARMONIC_API_KEY_VAR: &str = "HARMONIC_API_KEY";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Informational only; nothing in the reconciliation workflow branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Affinity CRM configuration
    #[serde(default)]
    pub affinity: AffinityAppConfig,

    /// Harmonic configuration
    #[serde(default)]
    pub harmonic: HarmonicAppConfig,

    /// CRM list and field identifiers for the current workspace
    #[serde(default)]
    pub crm: Option<CrmPipelineConfig>,

    /// Reconciliation limits
    #[serde(default)]
    pub reconciliation: ReconciliationAppConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Google Calendar push notifications
    #[serde(default)]
    pub calendar: CalendarAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `config` file and the environment
    ///
    /// Environment variables use the `MOSAIC` prefix and `__` as the section
    /// separator, e.g. `MOSAIC__CRM__LP_LIST_ID=12`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("MOSAIC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_env_api_keys(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override API keys from the unprefixed `AFFINITY_API_KEY` and `HARMONIC_API_KEY`
    pub fn apply_env_api_keys(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(AFFINITY_API_KEY_VAR).filter(|k| !k.is_empty()) {
            self.affinity.api_key = Some(SecretString::from(key));
            debug!("Loaded affinity.api_key from {AFFINITY_API_KEY_VAR}");
        }
        if let Some(key) = lookup(HARMONIC_API_KEY_VAR).filter(|k| !k.is_empty()) {
            self.harmonic.api_key = Some(SecretString::from(key));
            debug!("Loaded harmonic.api_key from {HARMONIC_API_KEY_VAR}");
        }
    }

    /// Webhook delivery settings for the calendar service
    #[must_use]
    pub fn calendar_webhook_settings(&self) -> CalendarWebhookSettings {
        CalendarWebhookSettings {
            address: self.calendar.webhook_url.clone(),
            token: self
                .calendar
                .webhook_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        }
    }

    /// Upper bound for one reconciliation
    #[must_use]
    pub const fn reconciliation_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.reconciliation.timeout_secs)
    }
}
