//! Persistence module
//!
//! SQLite-based document storage for company master records and calendar
//! webhook channels.

pub mod calendar_webhook_store;
pub mod company_store;
pub mod connection;
mod error;
pub mod migrations;

pub use calendar_webhook_store::SqliteCalendarWebhookStore;
pub use company_store::SqliteCompanyStore;
pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
