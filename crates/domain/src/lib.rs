//! Domain layer for Mosaic
//!
//! Contains the company and action item records shared by every integration,
//! the domain normalizer and the field value filter. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
