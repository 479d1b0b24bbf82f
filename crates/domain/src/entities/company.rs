//! Company master record
//!
//! One record per company across the CRM, the sourcing platform and the
//! product board. At most one record per primary domain is `current`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{errors::DomainError, value_objects::Domain};

const fn default_true() -> bool {
    true
}

/// Merge bookkeeping for a company record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMetadata {
    /// Whether this record was produced by merging others
    #[serde(default)]
    pub merged: bool,
    /// When the merge happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    /// Ids of the records folded into this one
    #[serde(default)]
    pub merged_from: Vec<String>,
    /// Who performed the merge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_by: Option<String>,
}

/// The master company record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Company {
    /// Master id, assigned by the store on creation
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 512))]
    pub name: String,
    pub primary_domain: Domain,
    /// Every known domain, including aliases
    #[serde(default)]
    pub domains: Vec<Domain>,
    /// Sourcing platform id
    #[serde(default)]
    pub sp_id: Option<String>,
    /// CRM organization id
    #[serde(default)]
    pub crm_id: Option<String>,
    /// Product board id
    #[serde(default)]
    pub pb_id: Option<String>,
    #[serde(default = "default_true")]
    pub current: bool,
    #[serde(default)]
    pub metadata: Option<CompanyMetadata>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Company {
    /// Create a current, unsaved company
    #[must_use]
    pub fn new(name: impl Into<String>, primary_domain: Domain) -> Self {
        Self {
            id: None,
            name: name.into(),
            domains: vec![primary_domain.clone()],
            primary_domain,
            sp_id: None,
            crm_id: None,
            pb_id: None,
            current: true,
            metadata: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Set additional domains, keeping the primary domain first
    #[must_use]
    pub fn with_domains(mut self, domains: impl IntoIterator<Item = Domain>) -> Self {
        for domain in domains {
            if !self.domains.contains(&domain) {
                self.domains.push(domain);
            }
        }
        self
    }

    /// Set the sourcing platform id
    #[must_use]
    pub fn with_sp_id(mut self, sp_id: impl Into<String>) -> Self {
        self.sp_id = Some(sp_id.into());
        self
    }

    /// Set the CRM organization id
    #[must_use]
    pub fn with_crm_id(mut self, crm_id: impl Into<String>) -> Self {
        self.crm_id = Some(crm_id.into());
        self
    }

    /// Set the master id
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Check field constraints
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] when a field is out of range.
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))
    }
}

/// The subset of a company embedded into other records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBase {
    pub id: Option<i64>,
    pub name: String,
    pub primary_domain: Domain,
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub sp_id: Option<String>,
    #[serde(default)]
    pub crm_id: Option<String>,
}

impl From<&Company> for CompanyBase {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            primary_domain: company.primary_domain.clone(),
            domains: company.domains.clone(),
            sp_id: company.sp_id.clone(),
            crm_id: company.crm_id.clone(),
        }
    }
}
