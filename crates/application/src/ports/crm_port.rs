//! CRM port
//!
//! Read access to organizations, list memberships, field values and
//! reminders held by the CRM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{ActionItemStatus, CrmReminderResetType, Domain, FieldValueFilter};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// One organization returned by a CRM search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationCandidate {
    pub id: i64,
    pub name: String,
    /// Normalized domains in the order the CRM lists them
    pub domains: Vec<Domain>,
}

/// Membership of an organization in a CRM list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: i64,
    pub list_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Full organization record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDetails {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    #[serde(default)]
    pub list_entries: Vec<ListEntry>,
}

/// A single field value
///
/// `list_entry_id` is `None` when the value belongs to the organization
/// itself rather than to one list membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: i64,
    pub field_id: i64,
    pub list_entry_id: Option<i64>,
    pub value: serde_json::Value,
}

/// Person referenced by a reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmPerson {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
}

/// Organization referenced by a reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmOrganizationRef {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
}

/// A CRM reminder with its people resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmReminder {
    pub id: i64,
    pub status: ActionItemStatus,
    pub reset_type: Option<CrmReminderResetType>,
    pub content: Option<String>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub creator: CrmPerson,
    pub owner: CrmPerson,
    pub completer: Option<CrmPerson>,
    pub person: Option<CrmPerson>,
    pub organization: Option<CrmOrganizationRef>,
    pub opportunity_id: Option<i64>,
}

/// Port for CRM reads
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CrmPort: Send + Sync {
    /// Search organizations by name or domain
    ///
    /// Each call is treated as one complete page of results.
    async fn search_organizations(
        &self,
        term: &str,
    ) -> Result<Vec<OrganizationCandidate>, ApplicationError>;

    /// Fetch an organization with its list entries
    ///
    /// Fails with [`ApplicationError::NotFound`] for unknown ids.
    async fn get_organization_details(
        &self,
        organization_id: i64,
    ) -> Result<OrganizationDetails, ApplicationError>;

    /// Fetch every field value attached to the filtered entity
    async fn get_field_values(
        &self,
        filter: &FieldValueFilter,
    ) -> Result<Vec<FieldValue>, ApplicationError>;

    /// Fetch a single reminder
    async fn get_reminder(&self, reminder_id: i64) -> Result<CrmReminder, ApplicationError>;
}
