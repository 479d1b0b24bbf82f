//! Harmonic client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Harmonic client
#[derive(Clone, Serialize, Deserialize)]
pub struct HarmonicConfig {
    /// API key, sent in the `apikey` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// GraphQL endpoint
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_graphql_url() -> String {
    "https://api.harmonic.ai/graphql".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            graphql_url: default_graphql_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for HarmonicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("graphql_url", &self.graphql_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HarmonicConfig {
    /// Default configuration with the given API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Point the client at another GraphQL endpoint
    #[must_use]
    pub fn with_graphql_url(mut self, graphql_url: impl Into<String>) -> Self {
        self.graphql_url = graphql_url.into();
        self
    }
}
