//! Sourcing platform port
//!
//! Company enrichment by domain. A company the platform has never seen is a
//! regular outcome, not an error.

use async_trait::async_trait;
use domain::Domain;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A watchlist the company belongs to on the sourcing platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    pub id: String,
    pub name: String,
}

/// Enrichment data for a company
///
/// When `enrichment_urn` is set the platform has queued enrichment and every
/// other field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedCompany {
    pub name: Option<String>,
    pub id: Option<String>,
    pub website_domain: Option<Domain>,
    pub enrichment_urn: Option<String>,
    #[serde(default)]
    pub watchlists: Vec<Watchlist>,
}

impl EnrichedCompany {
    /// Placeholder for a company that is still being enriched
    #[must_use]
    pub fn pending(enrichment_urn: Option<String>) -> Self {
        Self {
            enrichment_urn,
            ..Self::default()
        }
    }
}

/// Result of an enrichment call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Found(EnrichedCompany),
    NotFound { enrichment_urn: Option<String> },
}

/// Port for company enrichment
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SourcingPlatformPort: Send + Sync {
    /// Enrich a company by its website domain
    ///
    /// Authentication, rate limit and server failures are returned as errors.
    async fn enrich_company(
        &self,
        domain: &Domain,
    ) -> Result<EnrichmentOutcome, ApplicationError>;
}
