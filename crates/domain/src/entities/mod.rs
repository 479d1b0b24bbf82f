//! Domain entities - Objects with identity and lifecycle

mod action_item;
mod calendar_webhook;
mod company;

pub use action_item::{
    ActionItem, ActionItemMetadata, ActionItemStatus, CrmReminderResetType, User,
};
pub use calendar_webhook::CalendarWebhook;
pub use company::{Company, CompanyBase, CompanyMetadata};
