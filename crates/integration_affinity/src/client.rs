//! Affinity REST client

use std::time::Duration;

use domain::FieldValueFilter;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::{
    config::AffinityConfig,
    error::AffinityError,
    models::{
        FieldValue, ListEntry, NewFieldValue, NewListEntry, Organization, OrganizationDetails,
        OrganizationSearchPage, PersonSearchPage, Reminder,
    },
};

/// Affinity v1 API client
pub struct AffinityClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for AffinityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffinityClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AffinityClient {
    /// Create a new Affinity client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot be created.
    pub fn new(config: &AffinityConfig) -> Result<Self, AffinityError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AffinityError::ConfigurationError(
                "Affinity API key not found in environment variables or passed as argument"
                    .to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AffinityError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Search organizations by name or domain
    #[instrument(skip(self))]
    pub async fn search_organizations(
        &self,
        term: &str,
    ) -> Result<OrganizationSearchPage, AffinityError> {
        let request = self
            .client
            .get(self.url("/organizations"))
            .query(&[("term", term)]);
        self.send(request, "organizations").await
    }

    /// Create an organization
    #[instrument(skip(self))]
    pub async fn create_organization(
        &self,
        name: &str,
        domain: &str,
    ) -> Result<Organization, AffinityError> {
        let request = self
            .client
            .post(self.url("/organizations"))
            .json(&json!({ "name": name, "domain": domain }));
        self.send(request, "organization").await
    }

    /// Get an organization with list entries, opportunities and interaction data
    #[instrument(skip(self))]
    pub async fn get_organization(
        &self,
        organization_id: i64,
    ) -> Result<OrganizationDetails, AffinityError> {
        let request = self
            .client
            .get(self.url(&format!("/organizations/{organization_id}")))
            .query(&[
                ("with_opportunities", "true"),
                ("with_interaction_dates", "true"),
                ("with_interaction_persons", "true"),
            ]);
        self.send(request, &format!("organization {organization_id}"))
            .await
    }

    /// Get all field values of one entity
    #[instrument(skip(self), fields(filter = %filter))]
    pub async fn get_field_values(
        &self,
        filter: &FieldValueFilter,
    ) -> Result<Vec<FieldValue>, AffinityError> {
        let request = self
            .client
            .get(self.url("/field-values"))
            .query(&[(filter.key(), filter.id())]);
        self.send(request, &format!("field values for {filter}"))
            .await
    }

    /// Search persons by name or email
    #[instrument(skip(self))]
    pub async fn search_persons(&self, term: &str) -> Result<PersonSearchPage, AffinityError> {
        let request = self
            .client
            .get(self.url("/persons"))
            .query(&[("term", term)]);
        self.send(request, "persons").await
    }

    /// Create a field value
    #[instrument(skip(self, field_value), fields(field_id = field_value.field_id))]
    pub async fn create_field_value(
        &self,
        field_value: &NewFieldValue,
    ) -> Result<FieldValue, AffinityError> {
        let request = self
            .client
            .post(self.url("/field-values"))
            .json(field_value);
        self.send(request, "field value").await
    }

    /// Replace the value of an existing field value
    #[instrument(skip(self, value))]
    pub async fn update_field_value(
        &self,
        field_value_id: i64,
        value: Value,
    ) -> Result<FieldValue, AffinityError> {
        let request = self
            .client
            .put(self.url(&format!("/field-values/{field_value_id}")))
            .json(&json!({ "value": value }));
        self.send(request, &format!("field value {field_value_id}"))
            .await
    }

    /// Add an entity to a list
    #[instrument(skip(self))]
    pub async fn create_list_entry(
        &self,
        list_entry: &NewListEntry,
    ) -> Result<ListEntry, AffinityError> {
        let request = self
            .client
            .post(self.url("/list-entries"))
            .json(list_entry);
        self.send(request, "list entry").await
    }

    /// Get a reminder
    #[instrument(skip(self))]
    pub async fn get_reminder(&self, reminder_id: i64) -> Result<Reminder, AffinityError> {
        let request = self
            .client
            .get(self.url(&format!("/reminders/{reminder_id}")));
        self.send(request, &format!("reminder {reminder_id}"))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, AffinityError> {
        let response = request
            .basic_auth("", Some(&self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AffinityError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else if e.is_connect() {
                    AffinityError::ConnectionFailed(e.to_string())
                } else {
                    AffinityError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(status = %status, resource, "Received Affinity response");

        match status {
            StatusCode::NOT_FOUND => return Err(AffinityError::NotFound(resource.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AffinityError::AuthenticationFailed(
                    "Invalid Affinity API key".to_string(),
                ));
            },
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse().ok());
                return Err(AffinityError::RateLimitExceeded {
                    retry_after_secs: retry_after,
                });
            },
            _ => {},
        }

        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(AffinityError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AffinityError::RequestFailed(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AffinityError::ParseError(e.to_string()))
    }
}
