//! Action item entity - a follow-up task synced from an external system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{entities::CompanyBase, errors::DomainError};

/// State of an action item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionItemStatus {
    Completed,
    Active,
    Overdue,
}

impl ActionItemStatus {
    /// Map the CRM's numeric reminder status
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] for unknown codes.
    pub fn from_crm_code(code: u8) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::Completed),
            1 => Ok(Self::Active),
            2 => Ok(Self::Overdue),
            other => Err(DomainError::ValidationError(format!(
                "unknown reminder status code {other}"
            ))),
        }
    }

    /// Check if the item still needs attention
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::Overdue)
    }
}

/// What resets a recurring CRM reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrmReminderResetType {
    Interaction,
    Email,
    Meeting,
}

impl CrmReminderResetType {
    /// Map the CRM's numeric reset type
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] for unknown codes.
    pub fn from_crm_code(code: u8) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::Interaction),
            1 => Ok(Self::Email),
            2 => Ok(Self::Meeting),
            other => Err(DomainError::ValidationError(format!(
                "unknown reminder reset type {other}"
            ))),
        }
    }
}

/// A person referenced by an action item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    #[validate(email)]
    pub email: Option<String>,
    pub name: String,
    pub crm_id: Option<i64>,
}

impl User {
    /// Build a user from CRM person fields
    ///
    /// The display name is `"{first} {last}"`, trimmed when a part is missing.
    #[must_use]
    pub fn from_crm_person(
        crm_id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        let name = format!(
            "{} {}",
            first_name.unwrap_or_default(),
            last_name.unwrap_or_default()
        )
        .trim()
        .to_string();

        Self {
            email: email.map(str::to_lowercase),
            name,
            crm_id: Some(crm_id),
        }
    }
}

/// Provenance of an action item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItemMetadata {
    /// Identifier in the source system
    pub source_id: String,
    /// Name of the source system, e.g. `affinity`
    pub source: String,
    /// Event that produced this snapshot, e.g. `reminder.created`
    pub event_type: String,
    #[serde(default)]
    pub crm_reset_type: Option<CrmReminderResetType>,
}

/// A unified action item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: Option<i64>,
    pub status: ActionItemStatus,
    pub content: Option<String>,
    pub due_date: DateTime<Utc>,
    pub creator: User,
    pub completer: Option<User>,
    pub owner: User,
    #[serde(default)]
    pub tagged_persons: Vec<User>,
    pub tagged_crm_opportunity_id: Option<i64>,
    pub company: Option<CompanyBase>,
    pub metadata: ActionItemMetadata,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ActionItem {
    /// Check if the item was closed
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == ActionItemStatus::Completed
    }
}
