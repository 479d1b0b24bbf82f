//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod affinity_crm_adapter;
mod google_calendar_watch_adapter;
mod harmonic_sourcing_adapter;

pub use affinity_crm_adapter::AffinityCrmAdapter;
pub use google_calendar_watch_adapter::{GoogleCalendarConfig, GoogleCalendarWatchAdapter};
pub use harmonic_sourcing_adapter::HarmonicSourcingAdapter;
