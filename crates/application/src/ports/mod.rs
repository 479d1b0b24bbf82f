//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod calendar_watch_port;
mod calendar_webhook_store;
mod company_store;
mod crm_port;
mod sourcing_platform_port;

#[cfg(test)]
pub use calendar_watch_port::MockCalendarWatchPort;
pub use calendar_watch_port::{CalendarWatchPort, WatchChannelRequest};
pub use calendar_webhook_store::CalendarWebhookStorePort;
#[cfg(test)]
pub use calendar_webhook_store::MockCalendarWebhookStorePort;
pub use company_store::CompanyStorePort;
#[cfg(test)]
pub use company_store::MockCompanyStorePort;
#[cfg(test)]
pub use crm_port::MockCrmPort;
pub use crm_port::{
    CrmOrganizationRef, CrmPerson, CrmPort, CrmReminder, FieldValue, ListEntry,
    OrganizationCandidate, OrganizationDetails,
};
#[cfg(test)]
pub use sourcing_platform_port::MockSourcingPlatformPort;
pub use sourcing_platform_port::{
    EnrichedCompany, EnrichmentOutcome, SourcingPlatformPort, Watchlist,
};
