//! Harmonic adapter - Implements SourcingPlatformPort using integration_harmonic

use application::error::ApplicationError;
use application::ports::{EnrichedCompany, EnrichmentOutcome, SourcingPlatformPort, Watchlist};
use async_trait::async_trait;
use domain::Domain;
use integration_harmonic::{
    EnrichmentResult, HarmonicClient, HarmonicCompany, HarmonicConfig, HarmonicError,
};
use tracing::{debug, instrument, warn};

/// Adapter for the Harmonic sourcing platform
pub struct HarmonicSourcingAdapter {
    client: HarmonicClient,
}

impl std::fmt::Debug for HarmonicSourcingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicSourcingAdapter")
            .field("client", &self.client)
            .finish()
    }
}

impl HarmonicSourcingAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing.
    pub fn new(config: &HarmonicConfig) -> Result<Self, ApplicationError> {
        let client = HarmonicClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    fn map_error(err: HarmonicError) -> ApplicationError {
        match err {
            HarmonicError::AuthenticationFailed(e) => ApplicationError::NotAuthorized(e),
            HarmonicError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            HarmonicError::ConfigurationError(e) => ApplicationError::Configuration(e),
            HarmonicError::Timeout { timeout_secs } => {
                ApplicationError::Timeout(format!("Harmonic request exceeded {timeout_secs}s"))
            },
            HarmonicError::ParseError(e) => {
                ApplicationError::Internal(format!("Unexpected Harmonic response: {e}"))
            },
            e @ (HarmonicError::ConnectionFailed(_)
            | HarmonicError::RequestFailed(_)
            | HarmonicError::ServerError { .. }
            | HarmonicError::QueryFailed(_)) => ApplicationError::ExternalService(e.to_string()),
        }
    }

    /// Convert a Harmonic company, normalizing its website domain
    ///
    /// A website domain that does not normalize is dropped.
    fn map_company(company: HarmonicCompany) -> EnrichedCompany {
        let website_domain = company
            .website_domain()
            .and_then(|raw| match Domain::parse(raw) {
                Ok(domain) => Some(domain),
                Err(e) => {
                    warn!(website = raw, error = %e, "Ignoring unusable Harmonic website domain");
                    None
                },
            });

        EnrichedCompany {
            name: company.name,
            id: company.id,
            website_domain,
            enrichment_urn: None,
            watchlists: company
                .watchlists
                .into_iter()
                .map(|w| Watchlist {
                    id: w.id,
                    name: w.name,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SourcingPlatformPort for HarmonicSourcingAdapter {
    #[instrument(skip(self), fields(domain = %domain))]
    async fn enrich_company(
        &self,
        domain: &Domain,
    ) -> Result<EnrichmentOutcome, ApplicationError> {
        let result = self
            .client
            .enrich_company_by_website(domain.as_str())
            .await
            .map_err(Self::map_error)?;

        Ok(match result {
            EnrichmentResult::Found(company) => {
                debug!(name = ?company.name, "Harmonic company found");
                EnrichmentOutcome::Found(Self::map_company(company))
            },
            EnrichmentResult::NotFound { enrichment_urn } => {
                EnrichmentOutcome::NotFound { enrichment_urn }
            },
        })
    }
}
