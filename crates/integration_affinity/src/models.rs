//! Affinity API payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An organization as returned by search and reminder payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub global: bool,
}

/// One page of `GET /organizations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSearchPage {
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Membership of an entity in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: i64,
    pub list_id: i64,
    #[serde(default)]
    pub creator_id: Option<i64>,
    #[serde(default)]
    pub entity_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// `GET /organizations/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDetails {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub list_entries: Vec<ListEntry>,
    #[serde(default)]
    pub opportunity_ids: Vec<i64>,
}

/// A field value attached to an entity or a list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: i64,
    pub field_id: i64,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub list_entry_id: Option<i64>,
    #[serde(default)]
    pub value: Value,
}

/// Body of `POST /field-values`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFieldValue {
    pub field_id: i64,
    pub entity_id: i64,
    pub value: Value,
    /// Only for list-specific fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_entry_id: Option<i64>,
}

/// Body of `POST /list-entries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewListEntry {
    pub list_id: i64,
    pub entity_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
}

/// A person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub primary_email: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

/// One page of `GET /persons`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSearchPage {
    pub persons: Vec<Person>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Opportunity reference inside a reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /reminders/{id}`
///
/// `status` is 0 completed, 1 active, 2 overdue. `reset_type` is 0
/// interaction, 1 email, 2 meeting and only set for recurring reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: u8,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub reset_type: Option<u8>,
    #[serde(default)]
    pub reminder_days: Option<i64>,
    pub status: u8,
    pub creator: Person,
    pub owner: Person,
    #[serde(default)]
    pub completer: Option<Person>,
    #[serde(default)]
    pub person: Option<Person>,
    #[serde(default)]
    pub organization: Option<Organization>,
    #[serde(default)]
    pub opportunity: Option<Opportunity>,
}
