//! Remote JSON configuration documents
//!
//! Per-environment settings may live as a JSON object in a storage bucket.
//! The bucket and object name come from `CONFIG_BUCKET` / `CONFIG_OBJECT_NAME`
//! or are passed explicitly.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};

/// Variable naming the config bucket
pub const CONFIG_BUCKET_VAR: &str = "CONFIG_BUCKET";
/// Variable naming the config object
pub const CONFIG_OBJECT_NAME_VAR: &str = "CONFIG_OBJECT_NAME";

const DEFAULT_STORAGE_URL: &str = "https://storage.googleapis.com";

/// Errors from resolving or fetching a remote config document
#[derive(Debug, Error)]
pub enum RemoteConfigError {
    #[error(
        "Config bucket not found in environment variables (`CONFIG_BUCKET`) or passed as argument"
    )]
    MissingBucket,

    #[error(
        "Config object name not found in environment variables (`CONFIG_OBJECT_NAME`) or passed as argument"
    )]
    MissingObjectName,

    #[error("Invalid storage URL: {0}")]
    InvalidUrl(String),

    #[error("Config object not found: {0}")]
    NotFound(String),

    #[error("Config request failed: {0}")]
    RequestFailed(String),

    #[error("Config document is not a JSON object: {0}")]
    ParseError(String),
}

/// Where a config document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfigLocation {
    pub bucket: String,
    pub object_name: String,
    /// Object generation; the live version when unset
    pub version: Option<i64>,
}

/// Downloads JSON config documents from object storage
pub struct RemoteConfigLoader {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl std::fmt::Debug for RemoteConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfigLoader")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl RemoteConfigLoader {
    /// Create a loader against the public storage endpoint
    pub fn new(access_token: Option<String>) -> Result<Self, RemoteConfigError> {
        Self::with_base_url(DEFAULT_STORAGE_URL, access_token)
    }

    /// Create a loader against a custom storage endpoint
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: Option<String>,
    ) -> Result<Self, RemoteConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RemoteConfigError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Resolve the document location from the process environment and arguments
    ///
    /// Environment variables win over the arguments.
    pub fn resolve(
        bucket: Option<&str>,
        object_name: Option<&str>,
        version: Option<i64>,
    ) -> Result<RemoteConfigLocation, RemoteConfigError> {
        Self::resolve_with(|name| std::env::var(name).ok(), bucket, object_name, version)
    }

    /// Resolve the document location using `lookup` for environment variables
    pub fn resolve_with(
        lookup: impl Fn(&str) -> Option<String>,
        bucket: Option<&str>,
        object_name: Option<&str>,
        version: Option<i64>,
    ) -> Result<RemoteConfigLocation, RemoteConfigError> {
        let pick = |var: &str, arg: Option<&str>| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .or_else(|| arg.filter(|a| !a.is_empty()).map(ToString::to_string))
        };

        let bucket = pick(CONFIG_BUCKET_VAR, bucket).ok_or(RemoteConfigError::MissingBucket)?;
        let object_name = pick(CONFIG_OBJECT_NAME_VAR, object_name)
            .ok_or(RemoteConfigError::MissingObjectName)?;

        Ok(RemoteConfigLocation {
            bucket,
            object_name,
            version,
        })
    }

    fn object_url(&self, location: &RemoteConfigLocation) -> Result<Url, RemoteConfigError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RemoteConfigError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| RemoteConfigError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                "storage",
                "v1",
                "b",
                &location.bucket,
                "o",
                &location.object_name,
            ]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(version) = location.version {
                query.append_pair("generation", &version.to_string());
            }
        }
        Ok(url)
    }

    /// Download the document and parse it as a JSON object
    #[instrument(skip(self), fields(bucket = %location.bucket, object = %location.object_name))]
    pub async fn fetch(
        &self,
        location: &RemoteConfigLocation,
    ) -> Result<Map<String, Value>, RemoteConfigError> {
        let url = self.object_url(location)?;
        debug!(url = %url, "Fetching remote config");

        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteConfigError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteConfigError::NotFound(format!(
                "{}/{}",
                location.bucket, location.object_name
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteConfigError::RequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        response
            .json::<Map<String, Value>>()
            .await
            .map_err(|e| RemoteConfigError::ParseError(e.to_string()))
    }
}
