//! Application state shared across handlers

use std::{sync::Arc, time::Duration};

use application::{ActionItemService, CalendarService, CompanyService, CrmPipelineConfig};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Reconciliation and master records
    pub company_service: Arc<CompanyService>,
    /// CRM reminder mapping for the Affinity webhook
    pub action_item_service: Arc<ActionItemService>,
    /// Calendar channel registration
    pub calendar_service: Arc<CalendarService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Pipeline ids needed by reconciliation, if configured
    pub fn crm_pipeline(&self) -> Option<&CrmPipelineConfig> {
        self.config.crm.as_ref()
    }

    pub fn reconciliation_timeout(&self) -> Duration {
        self.config.reconciliation_timeout()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("company_service", &self.company_service)
            .field("calendar_service", &self.calendar_service)
            .finish_non_exhaustive()
    }
}
