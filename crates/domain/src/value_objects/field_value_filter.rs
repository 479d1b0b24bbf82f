//! Filter for CRM field value lookups

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Selects the entity whose field values should be fetched
///
/// The CRM accepts exactly one of these keys per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValueFilter {
    OrganizationId(i64),
    ListEntryId(i64),
    PersonId(i64),
    OpportunityId(i64),
}

impl FieldValueFilter {
    /// Build a filter from optional keys, requiring exactly one to be set
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::FieldValueFilter;
    ///
    /// let filter = FieldValueFilter::from_keys(Some(7), None, None, None).unwrap();
    /// assert_eq!(filter, FieldValueFilter::OrganizationId(7));
    ///
    /// assert!(FieldValueFilter::from_keys(None, None, None, None).is_err());
    /// assert!(FieldValueFilter::from_keys(Some(1), Some(2), None, None).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFilter`] when zero or several keys are set.
    pub fn from_keys(
        organization_id: Option<i64>,
        list_entry_id: Option<i64>,
        person_id: Option<i64>,
        opportunity_id: Option<i64>,
    ) -> Result<Self, DomainError> {
        let candidates = [
            organization_id.map(Self::OrganizationId),
            list_entry_id.map(Self::ListEntryId),
            person_id.map(Self::PersonId),
            opportunity_id.map(Self::OpportunityId),
        ];

        let mut set = candidates.into_iter().flatten();
        match (set.next(), set.next()) {
            (Some(filter), None) => Ok(filter),
            _ => Err(DomainError::InvalidFilter(
                "Only one of the following keys should be specified: `organization_id`, \
                 `list_entry_id`, `person_id`, `opportunity_id`"
                    .to_string(),
            )),
        }
    }

    /// Query parameter name understood by the CRM
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::OrganizationId(_) => "organization_id",
            Self::ListEntryId(_) => "list_entry_id",
            Self::PersonId(_) => "person_id",
            Self::OpportunityId(_) => "opportunity_id",
        }
    }

    /// Identifier value of the selected key
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::OrganizationId(id)
            | Self::ListEntryId(id)
            | Self::PersonId(id)
            | Self::OpportunityId(id) => *id,
        }
    }
}

impl fmt::Display for FieldValueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.id())
    }
}
