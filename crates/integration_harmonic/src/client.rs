//! Harmonic GraphQL client

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::{
    config::HarmonicConfig,
    error::HarmonicError,
    models::{ENRICH_COMPANY_MUTATION, EnrichmentResult, GraphQlError, GraphQlResponse},
};

/// Harmonic GraphQL client
pub struct HarmonicClient {
    client: Client,
    api_key: String,
    graphql_url: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for HarmonicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicClient")
            .field("graphql_url", &self.graphql_url)
            .finish_non_exhaustive()
    }
}

impl HarmonicClient {
    /// Create a new Harmonic client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot be created.
    pub fn new(config: &HarmonicConfig) -> Result<Self, HarmonicError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            HarmonicError::ConfigurationError(
                "Harmonic API Key not found in environment variables or passed as argument"
                    .to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HarmonicError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            graphql_url: config.graphql_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Enrich a company by its website domain
    ///
    /// A company Harmonic has not seen yet comes back as
    /// [`EnrichmentResult::NotFound`].
    #[instrument(skip(self))]
    pub async fn enrich_company_by_website(
        &self,
        website_url: &str,
    ) -> Result<EnrichmentResult, HarmonicError> {
        let body = json!({
            "query": ENRICH_COMPANY_MUTATION,
            "variables": { "identifiers": { "websiteUrl": website_url } },
        });

        let response = self
            .client
            .post(&self.graphql_url)
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HarmonicError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else if e.is_connect() {
                    HarmonicError::ConnectionFailed(e.to_string())
                } else {
                    HarmonicError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(status = %status, "Received Harmonic response");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(HarmonicError::AuthenticationFailed(
                    "Invalid Harmonic API key".to_string(),
                ));
            },
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse().ok());
                return Err(HarmonicError::RateLimitExceeded {
                    retry_after_secs: retry_after,
                });
            },
            _ => {},
        }

        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(HarmonicError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        // GraphQL errors may arrive with 200 or 4xx; both carry the envelope
        let text = response
            .text()
            .await
            .map_err(|e| HarmonicError::RequestFailed(e.to_string()))?;
        let envelope: GraphQlResponse = serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                HarmonicError::ParseError(e.to_string())
            } else {
                HarmonicError::RequestFailed(format!("HTTP {status}: {text}"))
            }
        })?;

        if !envelope.errors.is_empty() {
            return classify_errors(&envelope.errors);
        }

        let payload = envelope
            .data
            .and_then(|d| d.enrich)
            .ok_or_else(|| HarmonicError::ParseError("missing enrichment payload".to_string()))?;

        match payload.company {
            Some(company) if payload.company_found => Ok(EnrichmentResult::Found(company)),
            _ => {
                debug!(website_url, "Harmonic reported company not found");
                Ok(EnrichmentResult::NotFound {
                    enrichment_urn: None,
                })
            },
        }
    }
}

/// Map GraphQL errors to a not-found outcome or an error
///
/// The first error whose upstream status is 404 wins.
fn classify_errors(errors: &[GraphQlError]) -> Result<EnrichmentResult, HarmonicError> {
    if let Some(not_found) = errors.iter().find(|e| e.upstream_status() == Some(404)) {
        return Ok(EnrichmentResult::NotFound {
            enrichment_urn: not_found.enrichment_urn(),
        });
    }

    let Some(first) = errors.first() else {
        return Err(HarmonicError::QueryFailed("empty error list".to_string()));
    };
    warn!(
        message = %first.message,
        status = ?first.upstream_status(),
        "Harmonic query failed"
    );
    match first.upstream_status() {
        Some(401 | 403) => Err(HarmonicError::AuthenticationFailed(first.message.clone())),
        Some(429) => Err(HarmonicError::RateLimitExceeded {
            retry_after_secs: None,
        }),
        Some(status) if status >= 500 => Err(HarmonicError::ServerError {
            status,
            message: first.message.clone(),
        }),
        _ => Err(HarmonicError::QueryFailed(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn errors(value: serde_json::Value) -> Vec<GraphQlError> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = HarmonicClient::new(&HarmonicConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Harmonic API Key not found"));
    }

    #[test]
    fn not_found_error_wins_over_others() {
        let result = classify_errors(&errors(json!([
            {"message": "other", "extensions": {"response": {"status": 400}}},
            {"message": "404", "extensions": {"response": {"status": 404,
                "body": {"detail": {"enrichment_urn": "urn:x:1"}}}}}
        ])))
        .unwrap();

        assert_eq!(
            result,
            EnrichmentResult::NotFound {
                enrichment_urn: Some("urn:x:1".into())
            }
        );
    }

    #[test]
    fn unprocessable_entity_is_a_query_failure() {
        let err = classify_errors(&errors(json!([
            {"message": "422: Unprocessable Entity",
             "extensions": {"response": {"status": 422}}}
        ])))
        .unwrap_err();

        assert!(matches!(err, HarmonicError::QueryFailed(_)));
    }

    #[test]
    fn upstream_auth_failure_is_mapped() {
        let err = classify_errors(&errors(json!([
            {"message": "401: Unauthorized", "extensions": {"response": {"status": 401}}}
        ])))
        .unwrap_err();

        assert!(matches!(err, HarmonicError::AuthenticationFailed(_)));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = HarmonicClient::new(&HarmonicConfig::with_api_key("very-secret")).unwrap();
        assert!(!format!("{client:?}").contains("very-secret"));
    }
}
