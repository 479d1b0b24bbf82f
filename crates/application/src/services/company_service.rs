//! Company service
//!
//! Reconciles a company across the sourcing platform and the CRM, and manages
//! master company records.

use std::{fmt, sync::Arc, time::Duration};

use domain::{Company, Domain, FieldValueFilter};
use futures::future::{try_join, try_join_all};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{
        CompanyStorePort, CrmPort, EnrichedCompany, EnrichmentOutcome, FieldValue,
        OrganizationCandidate, OrganizationDetails, SourcingPlatformPort,
    },
    services::company_matching::{
        dedupe, first_field_value, known_domains, last_list_entry, select_match,
    },
};

/// CRM identifiers that carry pipeline meaning
///
/// These differ between CRM workspaces and are always supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmPipelineConfig {
    /// The live pipeline list
    pub lp_list_id: i64,
    pub lp_status_field_id: i64,
    pub lp_priority_field_id: i64,
    pub lp_owner_field_id: i64,
    /// Organization-level EC flag field
    pub ec_flag_field_id: i64,
}

/// Field values of the most recent live pipeline entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEntryDetails {
    pub entry_id: i64,
    pub status: Option<FieldValue>,
    pub priority: Option<FieldValue>,
    pub owner: Option<FieldValue>,
}

/// The matched CRM organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmCompanyDetails {
    pub company_id: i64,
    pub company_name: String,
    pub domain: Option<String>,
    pub ec_flag: Option<FieldValue>,
    pub last_live_pipeline_list_entry: Option<PipelineEntryDetails>,
}

/// Combined view of a company
///
/// `crm` is `None` when no CRM organization covers every known domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub crm: Option<CrmCompanyDetails>,
    pub sourcing_platform: EnrichedCompany,
}

/// Company service for reconciliation and master records
pub struct CompanyService {
    crm: Arc<dyn CrmPort>,
    sourcing_platform: Arc<dyn SourcingPlatformPort>,
    store: Option<Arc<dyn CompanyStorePort>>,
}

impl fmt::Debug for CompanyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanyService")
            .field("has_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl CompanyService {
    /// Create a new company service
    pub fn new(crm: Arc<dyn CrmPort>, sourcing_platform: Arc<dyn SourcingPlatformPort>) -> Self {
        Self {
            crm,
            sourcing_platform,
            store: None,
        }
    }

    /// Attach the master record store
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CompanyStorePort>) -> Self {
        self.store = Some(store);
        self
    }

    /// Gather sourcing platform and CRM data for a domain
    ///
    /// A company unknown to the sourcing platform is not an error. Any other
    /// upstream failure aborts the whole call.
    #[instrument(skip(self, config))]
    pub async fn reconcile(
        &self,
        raw_domain: &str,
        config: &CrmPipelineConfig,
    ) -> Result<CompanyDetails, ApplicationError> {
        let domain = Domain::parse(raw_domain)?;
        info!(domain = %domain, "Reconciling company");

        let enriched = self.enrich(&domain).await?;
        let known = known_domains(&domain, enriched.website_domain.as_ref());
        let candidates = self
            .search_candidates(enriched.name.as_deref(), &known)
            .await?;

        let Some(matched) = select_match(&candidates, &known) else {
            info!(domain = %domain, candidates = candidates.len(), "No CRM match");
            return Ok(CompanyDetails {
                crm: None,
                sourcing_platform: enriched,
            });
        };

        info!(organization_id = matched.id, "CRM match found");
        let (details, field_values) = try_join(
            self.crm.get_organization_details(matched.id),
            self.crm.get_field_values(&FieldValueFilter::OrganizationId(matched.id)),
        )
        .await?;

        Ok(CompanyDetails {
            crm: Some(crm_company_details(&details, &field_values, config)),
            sourcing_platform: enriched,
        })
    }

    /// [`Self::reconcile`] bounded by a deadline
    #[instrument(skip(self, config))]
    pub async fn reconcile_with_timeout(
        &self,
        raw_domain: &str,
        config: &CrmPipelineConfig,
        timeout: Duration,
    ) -> Result<CompanyDetails, ApplicationError> {
        tokio::time::timeout(timeout, self.reconcile(raw_domain, config))
            .await
            .map_err(|_| {
                ApplicationError::Timeout(format!(
                    "reconciling {raw_domain} took longer than {}ms",
                    timeout.as_millis()
                ))
            })?
    }

    /// Find the current master record for a domain
    #[instrument(skip(self))]
    pub async fn lookup_master_id_by_domain(
        &self,
        raw_domain: &str,
    ) -> Result<Option<Company>, ApplicationError> {
        let domain = Domain::parse(raw_domain)?;
        let company = self
            .store()?
            .find_current_by_primary_domain(&domain)
            .await?;
        debug!(domain = %domain, found = company.is_some(), "Master id lookup");
        Ok(company)
    }

    /// Store a new master record under a freshly allocated id
    #[instrument(skip(self, company), fields(name = %company.name))]
    pub async fn create_master_id(
        &self,
        mut company: Company,
    ) -> Result<Company, ApplicationError> {
        company.ensure_valid()?;
        let store = self.store()?;

        let id = store.allocate_id().await?;
        company.id = Some(id);
        store.put(&company).await?;

        info!(id, domain = %company.primary_domain, "Created company master id");
        Ok(company)
    }

    async fn enrich(&self, domain: &Domain) -> Result<EnrichedCompany, ApplicationError> {
        match self.sourcing_platform.enrich_company(domain).await? {
            EnrichmentOutcome::Found(company) => Ok(company),
            EnrichmentOutcome::NotFound { enrichment_urn } => {
                warn!(
                    domain = %domain,
                    enrichment_urn = enrichment_urn.as_deref().unwrap_or("none"),
                    "Company not found on sourcing platform"
                );
                Ok(EnrichedCompany::pending(enrichment_urn))
            },
        }
    }

    /// Name results first, then one search per known domain
    async fn search_candidates(
        &self,
        name: Option<&str>,
        known: &[Domain],
    ) -> Result<Vec<OrganizationCandidate>, ApplicationError> {
        let terms: Vec<&str> = name
            .filter(|n| !n.trim().is_empty())
            .into_iter()
            .chain(known.iter().map(Domain::as_str))
            .collect();

        let pages = try_join_all(
            terms
                .iter()
                .map(|term| self.crm.search_organizations(term)),
        )
        .await?;

        let candidates = dedupe(pages.into_iter().flatten());
        debug!(terms = terms.len(), candidates = candidates.len(), "CRM search done");
        Ok(candidates)
    }

    fn store(&self) -> Result<&Arc<dyn CompanyStorePort>, ApplicationError> {
        self.store
            .as_ref()
            .ok_or_else(|| ApplicationError::Configuration("company store not configured".into()))
    }
}

fn crm_company_details(
    details: &OrganizationDetails,
    field_values: &[FieldValue],
    config: &CrmPipelineConfig,
) -> CrmCompanyDetails {
    let last_live_pipeline_list_entry =
        last_list_entry(&details.list_entries, config.lp_list_id).map(|entry| {
            let pick = |field_id| {
                first_field_value(field_values, Some(entry.id), field_id).cloned()
            };
            PipelineEntryDetails {
                entry_id: entry.id,
                status: pick(config.lp_status_field_id),
                priority: pick(config.lp_priority_field_id),
                owner: pick(config.lp_owner_field_id),
            }
        });

    CrmCompanyDetails {
        company_id: details.id,
        company_name: details.name.clone(),
        domain: details.domain.clone(),
        ec_flag: first_field_value(field_values, None, config.ec_flag_field_id).cloned(),
        last_live_pipeline_list_entry,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::ports::{ListEntry, MockCompanyStorePort, MockCrmPort, MockSourcingPlatformPort};

    const CONFIG: CrmPipelineConfig = CrmPipelineConfig {
        lp_list_id: 13926,
        lp_status_field_id: 23_986_439,
        lp_priority_field_id: 28_964_932,
        lp_owner_field_id: 396_430,
        ec_flag_field_id: 387_543,
    };

    fn domain(raw: &str) -> Domain {
        Domain::parse(raw).unwrap()
    }

    fn found(name: &str, website: &str) -> EnrichmentOutcome {
        EnrichmentOutcome::Found(EnrichedCompany {
            name: Some(name.to_string()),
            id: Some("sp-1".to_string()),
            website_domain: Some(domain(website)),
            enrichment_urn: None,
            watchlists: Vec::new(),
        })
    }

    fn test_candidate() -> OrganizationCandidate {
        OrganizationCandidate {
            id: 64_779_194,
            name: "Test".into(),
            domains: vec![domain("test.com")],
        }
    }

    fn entry(id: i64, list_id: i64, day: u32) -> ListEntry {
        ListEntry {
            id,
            list_id,
            created_at: Utc.with_ymd_and_hms(2015, 12, day, 0, 0, 0).unwrap(),
        }
    }

    fn test_details(entries: Vec<ListEntry>) -> OrganizationDetails {
        OrganizationDetails {
            id: 64_779_194,
            name: "Test".into(),
            domain: Some("test.com".into()),
            list_entries: entries,
        }
    }

    fn field(field_id: i64, list_entry_id: Option<i64>, value: &str) -> FieldValue {
        FieldValue {
            id: field_id + 1,
            field_id,
            list_entry_id,
            value: json!(value),
        }
    }

    fn test_field_values() -> Vec<FieldValue> {
        vec![
            field(387_543, None, "ON"),
            field(23_986_439, Some(390), "Track"),
            field(28_964_932, Some(390), "High"),
            field(396_430, Some(390), "somebody"),
        ]
    }

    fn service(crm: MockCrmPort, sourcing: MockSourcingPlatformPort) -> CompanyService {
        CompanyService::new(Arc::new(crm), Arc::new(sourcing))
    }

    #[tokio::test]
    async fn no_crm_candidates_returns_enrichment_only() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Ok(found("Test", "test.com")));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations()
            .times(2)
            .returning(|_| Ok(Vec::new()));
        crm.expect_get_organization_details().never();

        let details = service(crm, sourcing)
            .reconcile("https://www.test.com", &CONFIG)
            .await
            .unwrap();

        assert!(details.crm.is_none());
        assert_eq!(details.sourcing_platform.name.as_deref(), Some("Test"));
        assert_eq!(details.sourcing_platform.website_domain, Some(domain("test.com")));
        assert!(details.sourcing_platform.enrichment_urn.is_none());
    }

    #[tokio::test]
    async fn match_selects_latest_pipeline_entry() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Ok(found("Test", "test.com")));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations()
            .returning(|_| Ok(vec![test_candidate()]));
        crm.expect_get_organization_details()
            .withf(|id| *id == 64_779_194)
            .returning(|_| Ok(test_details(vec![entry(389, 13926, 11), entry(390, 13926, 12)])));
        crm.expect_get_field_values()
            .withf(|filter| *filter == FieldValueFilter::OrganizationId(64_779_194))
            .returning(|_| Ok(test_field_values()));

        let details = service(crm, sourcing)
            .reconcile("test.com", &CONFIG)
            .await
            .unwrap();

        let crm = details.crm.unwrap();
        assert_eq!(crm.company_id, 64_779_194);
        assert_eq!(crm.company_name, "Test");
        assert_eq!(crm.domain.as_deref(), Some("test.com"));
        assert_eq!(crm.ec_flag.unwrap().value, json!("ON"));

        let entry = crm.last_live_pipeline_list_entry.unwrap();
        assert_eq!(entry.entry_id, 390);
        assert_eq!(entry.status.unwrap().value, json!("Track"));
        assert_eq!(entry.priority.unwrap().value, json!("High"));
        assert_eq!(entry.owner.unwrap().value, json!("somebody"));
    }

    #[tokio::test]
    async fn not_found_enrichment_still_searches_crm_by_input_domain() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing.expect_enrich_company().returning(|_| {
            Ok(EnrichmentOutcome::NotFound {
                enrichment_urn: Some("urn:x:1".into()),
            })
        });
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations()
            .times(1)
            .withf(|term| term == "test.com")
            .returning(|_| Ok(Vec::new()));

        let details = service(crm, sourcing)
            .reconcile("test.com", &CONFIG)
            .await
            .unwrap();

        assert!(details.crm.is_none());
        assert_eq!(details.sourcing_platform.enrichment_urn.as_deref(), Some("urn:x:1"));
        assert!(details.sourcing_platform.name.is_none());
    }

    #[tokio::test]
    async fn match_without_pipeline_entries_keeps_ec_flag() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Ok(found("Test", "test.com")));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations()
            .returning(|_| Ok(vec![test_candidate()]));
        crm.expect_get_organization_details()
            .returning(|_| Ok(test_details(vec![entry(12, 999, 11)])));
        crm.expect_get_field_values()
            .returning(|_| Ok(test_field_values()));

        let crm = service(crm, sourcing)
            .reconcile("test.com", &CONFIG)
            .await
            .unwrap()
            .crm
            .unwrap();

        assert_eq!(crm.company_id, 64_779_194);
        assert!(crm.last_live_pipeline_list_entry.is_none());
        assert_eq!(crm.ec_flag.unwrap().value, json!("ON"));
    }

    #[tokio::test]
    async fn candidate_missing_a_known_domain_is_not_matched() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Ok(found("Test", "test.io")));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations()
            .returning(|_| Ok(vec![test_candidate()]));
        crm.expect_get_organization_details().never();

        let details = service(crm, sourcing)
            .reconcile("test.com", &CONFIG)
            .await
            .unwrap();

        assert!(details.crm.is_none());
    }

    #[tokio::test]
    async fn name_results_take_precedence_over_domain_results() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Ok(found("Acme", "test.com")));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations().returning(|term| {
            let id = if term == "Acme" { 1 } else { 2 };
            Ok(vec![OrganizationCandidate {
                id,
                name: term.to_string(),
                domains: vec![domain("test.com")],
            }])
        });
        crm.expect_get_organization_details()
            .withf(|id| *id == 1)
            .returning(|id| {
                Ok(OrganizationDetails {
                    id,
                    name: "Acme".into(),
                    domain: None,
                    list_entries: Vec::new(),
                })
            });
        crm.expect_get_field_values().returning(|_| Ok(Vec::new()));

        let crm = service(crm, sourcing)
            .reconcile("test.com", &CONFIG)
            .await
            .unwrap()
            .crm
            .unwrap();

        assert_eq!(crm.company_id, 1);
        assert!(crm.ec_flag.is_none());
    }

    #[tokio::test]
    async fn input_domain_results_take_precedence_over_website_results() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Ok(found("Acme", "test.io")));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations().returning(|term| {
            let id = match term {
                "test.com" => 1,
                "test.io" => 2,
                _ => return Ok(Vec::new()),
            };
            Ok(vec![OrganizationCandidate {
                id,
                name: format!("Acme {id}"),
                domains: vec![domain("test.io"), domain("test.com")],
            }])
        });
        crm.expect_get_organization_details()
            .withf(|id| *id == 1)
            .returning(|id| {
                Ok(OrganizationDetails {
                    id,
                    name: "Acme 1".into(),
                    domain: None,
                    list_entries: Vec::new(),
                })
            });
        crm.expect_get_field_values().returning(|_| Ok(Vec::new()));

        let crm = service(crm, sourcing)
            .reconcile("www.test.com", &CONFIG)
            .await
            .unwrap()
            .crm
            .unwrap();

        assert_eq!(crm.company_id, 1);
    }

    #[tokio::test]
    async fn invalid_domain_is_rejected_before_any_call() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing.expect_enrich_company().never();
        let crm = MockCrmPort::new();

        let err = service(crm, sourcing)
            .reconcile("not a host", &CONFIG)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(domain::DomainError::InvalidDomain(_))
        ));
    }

    #[tokio::test]
    async fn upstream_enrichment_error_propagates() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Err(ApplicationError::RateLimited));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations().never();

        let err = service(crm, sourcing)
            .reconcile("test.com", &CONFIG)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[tokio::test]
    async fn crm_search_error_propagates() {
        let mut sourcing = MockSourcingPlatformPort::new();
        sourcing
            .expect_enrich_company()
            .returning(|_| Ok(found("Test", "test.com")));
        let mut crm = MockCrmPort::new();
        crm.expect_search_organizations()
            .returning(|_| Err(ApplicationError::ExternalService("HTTP 503".into())));

        let err = service(crm, sourcing)
            .reconcile("test.com", &CONFIG)
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }

    struct SlowSourcingPlatform;

    #[async_trait]
    impl SourcingPlatformPort for SlowSourcingPlatform {
        async fn enrich_company(
            &self,
            _domain: &Domain,
        ) -> Result<EnrichmentOutcome, ApplicationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(EnrichmentOutcome::NotFound {
                enrichment_urn: None,
            })
        }
    }

    #[tokio::test]
    async fn reconcile_with_timeout_fails_on_deadline() {
        let service = CompanyService::new(
            Arc::new(MockCrmPort::new()),
            Arc::new(SlowSourcingPlatform),
        );

        let err = service
            .reconcile_with_timeout("test.com", &CONFIG, Duration::from_millis(20))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Timeout(_)));
    }

    #[tokio::test]
    async fn lookup_returns_current_record() {
        let mut store = MockCompanyStorePort::new();
        store
            .expect_find_current_by_primary_domain()
            .withf(|d| d.as_str() == "test.com")
            .returning(|d| Ok(Some(Company::new("Test", d.clone()).with_id(7))));

        let service = service(MockCrmPort::new(), MockSourcingPlatformPort::new())
            .with_store(Arc::new(store));
        let company = service
            .lookup_master_id_by_domain("https://www.test.com/about")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(company.id, Some(7));
    }

    #[tokio::test]
    async fn lookup_without_match_returns_none() {
        let mut store = MockCompanyStorePort::new();
        store
            .expect_find_current_by_primary_domain()
            .returning(|_| Ok(None));

        let service = service(MockCrmPort::new(), MockSourcingPlatformPort::new())
            .with_store(Arc::new(store));

        assert!(service
            .lookup_master_id_by_domain("test.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn create_allocates_and_stores() {
        let mut store = MockCompanyStorePort::new();
        store.expect_allocate_id().times(1).returning(|| Ok(42));
        store
            .expect_put()
            .withf(|company| company.id == Some(42))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(MockCrmPort::new(), MockSourcingPlatformPort::new())
            .with_store(Arc::new(store));
        let company = service
            .create_master_id(Company::new("Test", domain("test.com")))
            .await
            .unwrap();

        assert_eq!(company.id, Some(42));
        assert!(company.current);
    }

    #[tokio::test]
    async fn create_rejects_invalid_company() {
        let mut store = MockCompanyStorePort::new();
        store.expect_allocate_id().never();

        let service = service(MockCrmPort::new(), MockSourcingPlatformPort::new())
            .with_store(Arc::new(store));
        let err = service
            .create_master_id(Company::new("", domain("test.com")))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[tokio::test]
    async fn master_operations_need_a_store() {
        let service = service(MockCrmPort::new(), MockSourcingPlatformPort::new());
        let err = service
            .lookup_master_id_by_domain("test.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
