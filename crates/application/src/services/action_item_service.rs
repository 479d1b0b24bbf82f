//! Action item service
//!
//! Turns CRM reminders into unified action items.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{ActionItem, ActionItemMetadata, CompanyBase, Domain, User};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{CompanyStorePort, CrmPerson, CrmPort, CrmReminder},
};

/// Map a CRM reminder to an action item
///
/// The item has no id yet. `updated_at` and `company` are supplied by the
/// caller because the CRM reminder carries neither.
pub fn crm_reminder_to_action_item(
    reminder: &CrmReminder,
    source: &str,
    event_type: &str,
    updated_at: Option<DateTime<Utc>>,
    company: Option<CompanyBase>,
) -> ActionItem {
    ActionItem {
        id: None,
        status: reminder.status,
        content: reminder.content.clone(),
        due_date: reminder.due_date,
        creator: to_user(&reminder.creator),
        completer: reminder.completer.as_ref().map(to_user),
        owner: to_user(&reminder.owner),
        tagged_persons: reminder.person.iter().map(to_user).collect(),
        tagged_crm_opportunity_id: reminder.opportunity_id,
        company,
        metadata: ActionItemMetadata {
            source_id: reminder.id.to_string(),
            source: source.to_string(),
            event_type: event_type.to_string(),
            crm_reset_type: reminder.reset_type,
        },
        completed_at: reminder.completed_at,
        created_at: reminder.created_at,
        updated_at,
    }
}

fn to_user(person: &CrmPerson) -> User {
    User::from_crm_person(
        person.id,
        person.first_name.as_deref(),
        person.last_name.as_deref(),
        person.primary_email.as_deref(),
    )
}

/// Action item service for CRM reminder events
pub struct ActionItemService {
    crm: Arc<dyn CrmPort>,
    companies: Option<Arc<dyn CompanyStorePort>>,
    source: String,
}

impl fmt::Debug for ActionItemService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItemService")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl ActionItemService {
    /// Create a service that labels items with `source`
    pub fn new(crm: Arc<dyn CrmPort>, source: impl Into<String>) -> Self {
        Self {
            crm,
            companies: None,
            source: source.into(),
        }
    }

    /// Resolve the reminder's organization to a master company record
    #[must_use]
    pub fn with_company_store(mut self, companies: Arc<dyn CompanyStorePort>) -> Self {
        self.companies = Some(companies);
        self
    }

    /// Fetch a reminder and map it to an action item
    #[instrument(skip(self))]
    pub async fn from_crm_reminder(
        &self,
        reminder_id: i64,
        event_type: &str,
    ) -> Result<ActionItem, ApplicationError> {
        let reminder = self.crm.get_reminder(reminder_id).await?;
        let company = self.resolve_company(&reminder).await?;

        info!(reminder_id, status = ?reminder.status, "Mapped CRM reminder");
        Ok(crm_reminder_to_action_item(
            &reminder,
            &self.source,
            event_type,
            Some(Utc::now()),
            company,
        ))
    }

    async fn resolve_company(
        &self,
        reminder: &CrmReminder,
    ) -> Result<Option<CompanyBase>, ApplicationError> {
        let (Some(companies), Some(organization)) = (&self.companies, &reminder.organization)
        else {
            return Ok(None);
        };
        let Some(raw_domain) = organization.domain.as_deref() else {
            debug!(organization_id = organization.id, "Organization has no domain");
            return Ok(None);
        };

        let domain = match Domain::parse(raw_domain) {
            Ok(domain) => domain,
            Err(e) => {
                warn!(
                    organization_id = organization.id,
                    error = %e,
                    "Unusable organization domain"
                );
                return Ok(None);
            },
        };

        Ok(companies
            .find_current_by_primary_domain(&domain)
            .await?
            .as_ref()
            .map(CompanyBase::from))
    }
}
