//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Affinity and
//! Harmonic adapters, the Google Calendar watch adapter and the SQLite
//! stores. Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AffinityAppConfig, AppConfig, CalendarAppConfig, DatabaseConfig, Environment,
    HarmonicAppConfig, ReconciliationAppConfig, RemoteConfigError, RemoteConfigLoader,
    RemoteConfigLocation, ServerConfig,
};
pub use persistence::{ConnectionPool, SqliteCalendarWebhookStore, SqliteCompanyStore, create_pool};
pub use telemetry::{LogFormat, TelemetryConfig, init_telemetry};
