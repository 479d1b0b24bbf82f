//! Application services - Use case implementations

mod action_item_service;
mod calendar_service;
pub mod company_matching;
mod company_service;

pub use action_item_service::{ActionItemService, crm_reminder_to_action_item};
pub use calendar_service::{CalendarService, CalendarWebhookSettings};
pub use company_service::{
    CompanyDetails, CompanyService, CrmCompanyDetails, CrmPipelineConfig, PipelineEntryDetails,
};
