//! Company handlers
//!
//! Reconciliation across the CRM and the sourcing platform, plus the master
//! record lookup and creation endpoints.

use application::CompanyDetails;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use domain::Company;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    error::ApiError,
    middleware::{AuthenticatedUser, ValidatedJson},
    state::AppState,
};

/// `?domain=` query parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainQuery {
    /// Domain or URL, normalized by the service
    pub domain: String,
}

/// Reconcile a company
///
/// GET /v1/companies/details?domain=
#[instrument(skip_all, fields(domain = %query.domain, caller = user.subject()))]
pub async fn get_company_details(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DomainQuery>,
) -> Result<Json<CompanyDetails>, ApiError> {
    let Some(pipeline) = state.crm_pipeline() else {
        return Err(ApiError::ServiceUnavailable(
            "CRM pipeline is not configured".to_string(),
        ));
    };

    let details = state
        .company_service
        .reconcile_with_timeout(&query.domain, pipeline, state.reconciliation_timeout())
        .await?;

    Ok(Json(details))
}

/// Current master record for a domain
///
/// GET /v1/companies?domain=
#[instrument(skip_all, fields(domain = %query.domain, caller = user.subject()))]
pub async fn lookup_company(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DomainQuery>,
) -> Result<Json<Company>, ApiError> {
    state
        .company_service
        .lookup_master_id_by_domain(&query.domain)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no current company for {}", query.domain)))
}

/// Create a master record
///
/// POST /v1/companies
#[instrument(skip_all, fields(caller = user.subject()))]
pub async fn create_company(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(company): ValidatedJson<Company>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    if company.id.is_some() {
        return Err(ApiError::BadRequest(
            "id is assigned by the server".to_string(),
        ));
    }

    let created = state.company_service.create_master_id(company).await?;
    info!(id = created.id, domain = %created.primary_domain, "Company created via API");

    Ok((StatusCode::CREATED, Json(created)))
}
