//! Mosaic HTTP presentation layer
//!
//! axum routes for company reconciliation, master records, calendar channel
//! registration and the Affinity webhook.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{AuthenticatedUser, USERINFO_HEADER, ValidatedJson};
pub use routes::create_router;
pub use state::AppState;
