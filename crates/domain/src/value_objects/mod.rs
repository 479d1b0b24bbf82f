//! Value Objects - Immutable, identity-less domain primitives

mod domain_name;
mod field_value_filter;
mod webhook_id;

pub use domain_name::Domain;
pub use field_value_filter::FieldValueFilter;
pub use webhook_id::WebhookId;
