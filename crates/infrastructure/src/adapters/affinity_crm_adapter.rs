//! Affinity CRM adapter - Implements CrmPort using integration_affinity

use application::error::ApplicationError;
use application::ports::{
    CrmOrganizationRef, CrmPerson, CrmPort, CrmReminder, FieldValue, ListEntry,
    OrganizationCandidate, OrganizationDetails,
};
use async_trait::async_trait;
use domain::{ActionItemStatus, CrmReminderResetType, Domain, FieldValueFilter};
use integration_affinity::{
    AffinityClient, AffinityConfig, AffinityError, FieldValue as AffinityFieldValue,
    Organization as AffinityOrganization, Person as AffinityPerson, Reminder as AffinityReminder,
};
use tracing::{debug, instrument, warn};

/// Adapter for the Affinity CRM
pub struct AffinityCrmAdapter {
    client: AffinityClient,
}

impl std::fmt::Debug for AffinityCrmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffinityCrmAdapter")
            .field("client", &self.client)
            .finish()
    }
}

impl AffinityCrmAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing.
    pub fn new(config: &AffinityConfig) -> Result<Self, ApplicationError> {
        let client = AffinityClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    /// Map integration errors to application errors
    fn map_error(err: AffinityError) -> ApplicationError {
        match err {
            AffinityError::NotFound(what) => ApplicationError::NotFound(what),
            AffinityError::AuthenticationFailed(e) => ApplicationError::NotAuthorized(e),
            AffinityError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            AffinityError::ConfigurationError(e) => ApplicationError::Configuration(e),
            AffinityError::Timeout { timeout_secs } => {
                ApplicationError::Timeout(format!("Affinity request exceeded {timeout_secs}s"))
            },
            AffinityError::ParseError(e) => {
                ApplicationError::Internal(format!("Unexpected Affinity response: {e}"))
            },
            e @ (AffinityError::ConnectionFailed(_)
            | AffinityError::RequestFailed(_)
            | AffinityError::ServerError { .. }) => {
                ApplicationError::ExternalService(e.to_string())
            },
        }
    }

    /// Convert a search result, normalizing every listed domain
    ///
    /// Domains that do not normalize are dropped.
    fn map_candidate(organization: AffinityOrganization) -> OrganizationCandidate {
        let domains = organization
            .domains
            .iter()
            .filter_map(|raw| match Domain::parse(raw) {
                Ok(domain) => Some(domain),
                Err(e) => {
                    warn!(
                        organization_id = organization.id,
                        domain = %raw,
                        error = %e,
                        "Ignoring unusable Affinity domain"
                    );
                    None
                },
            })
            .collect();

        OrganizationCandidate {
            id: organization.id,
            name: organization.name,
            domains,
        }
    }

    fn map_field_value(value: AffinityFieldValue) -> FieldValue {
        FieldValue {
            id: value.id,
            field_id: value.field_id,
            list_entry_id: value.list_entry_id,
            value: value.value,
        }
    }

    fn map_person(person: AffinityPerson) -> CrmPerson {
        CrmPerson {
            id: person.id,
            first_name: person.first_name,
            last_name: person.last_name,
            primary_email: person.primary_email,
        }
    }

    fn map_reminder(reminder: AffinityReminder) -> Result<CrmReminder, ApplicationError> {
        let status = ActionItemStatus::from_crm_code(reminder.status)?;
        let reset_type = reminder
            .reset_type
            .map(CrmReminderResetType::from_crm_code)
            .transpose()?;

        Ok(CrmReminder {
            id: reminder.id,
            status,
            reset_type,
            content: reminder.content,
            due_date: reminder.due_date,
            created_at: reminder.created_at,
            completed_at: reminder.completed_at,
            creator: Self::map_person(reminder.creator),
            owner: Self::map_person(reminder.owner),
            completer: reminder.completer.map(Self::map_person),
            person: reminder.person.map(Self::map_person),
            organization: reminder.organization.map(|o| CrmOrganizationRef {
                id: o.id,
                name: o.name,
                domain: o.domain.map(|d| d.to_lowercase()),
            }),
            opportunity_id: reminder.opportunity.map(|o| o.id),
        })
    }
}

#[async_trait]
impl CrmPort for AffinityCrmAdapter {
    #[instrument(skip(self))]
    async fn search_organizations(
        &self,
        term: &str,
    ) -> Result<Vec<OrganizationCandidate>, ApplicationError> {
        let page = self
            .client
            .search_organizations(term)
            .await
            .map_err(Self::map_error)?;

        debug!(count = page.organizations.len(), "Affinity organization search");
        Ok(page
            .organizations
            .into_iter()
            .map(Self::map_candidate)
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_organization_details(
        &self,
        organization_id: i64,
    ) -> Result<OrganizationDetails, ApplicationError> {
        let details = self
            .client
            .get_organization(organization_id)
            .await
            .map_err(Self::map_error)?;

        Ok(OrganizationDetails {
            id: details.id,
            name: details.name,
            domain: details.domain.map(|d| d.to_lowercase()),
            list_entries: details
                .list_entries
                .into_iter()
                .map(|e| ListEntry {
                    id: e.id,
                    list_id: e.list_id,
                    created_at: e.created_at,
                })
                .collect(),
        })
    }

    #[instrument(skip(self), fields(filter = %filter))]
    async fn get_field_values(
        &self,
        filter: &FieldValueFilter,
    ) -> Result<Vec<FieldValue>, ApplicationError> {
        let values = self
            .client
            .get_field_values(filter)
            .await
            .map_err(Self::map_error)?;

        debug!(count = values.len(), "Affinity field values");
        Ok(values.into_iter().map(Self::map_field_value).collect())
    }

    #[instrument(skip(self))]
    async fn get_reminder(&self, reminder_id: i64) -> Result<CrmReminder, ApplicationError> {
        let reminder = self
            .client
            .get_reminder(reminder_id)
            .await
            .map_err(Self::map_error)?;
        Self::map_reminder(reminder)
    }
}
