//! HTTP middleware and extractors
//!
//! Request correlation, gateway userinfo extraction and body validation.

pub mod request_id;
pub mod userinfo;
pub mod validation;

pub use request_id::{REQUEST_ID_HEADER, RequestId, propagate_request_id};
pub use userinfo::{AuthenticatedUser, USERINFO_HEADER, UserinfoError};
pub use validation::ValidatedJson;
