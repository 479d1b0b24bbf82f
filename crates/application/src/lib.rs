//! Application layer - Use cases and orchestration
//!
//! Contains the company reconciliation workflow, master record helpers,
//! action item mapping and calendar webhook registration, plus the ports
//! that infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
