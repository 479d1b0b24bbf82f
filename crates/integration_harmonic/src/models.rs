//! Harmonic GraphQL payloads

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Company enrichment mutation
///
/// `$identifiers` takes `{"websiteUrl": "<domain>"}`.
pub(crate) const ENRICH_COMPANY_MUTATION: &str = r"
mutation ($identifiers: CompanyEnrichmentIdentifiersInput!) {
    enrichCompanyByIdentifiers(identifiers: $identifiers) {
        companyFound
        company {
            name
            id
            website {
                domain
            }
            watchlists {
                name
                id
            }
        }
    }
}";

/// Company website as reported by Harmonic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    #[serde(default)]
    pub domain: Option<String>,
}

/// A watchlist the company is on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonicWatchlist {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
}

/// An enriched company
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonicCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_id_as_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub website: Option<Website>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub watchlists: Vec<HarmonicWatchlist>,
}

impl HarmonicCompany {
    /// Website domain, if Harmonic knows one
    pub fn website_domain(&self) -> Option<&str> {
        self.website.as_ref().and_then(|w| w.domain.as_deref())
    }
}

/// Outcome of an enrichment call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentResult {
    Found(HarmonicCompany),
    /// Harmonic does not know the company yet
    ///
    /// `enrichment_urn` identifies the enrichment job Harmonic queued, when
    /// it reported one.
    NotFound { enrichment_urn: Option<String> },
}

/// Harmonic ids arrive as numbers or strings depending on the type
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_id_as_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<EnrichData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrichData {
    #[serde(rename = "enrichCompanyByIdentifiers")]
    pub enrich: Option<EnrichPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrichPayload {
    #[serde(rename = "companyFound", default)]
    pub company_found: bool,
    #[serde(default)]
    pub company: Option<HarmonicCompany>,
}

/// One entry of the GraphQL `errors` array
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Value,
}

impl GraphQlError {
    /// HTTP status of the upstream REST call that failed, if reported
    pub fn upstream_status(&self) -> Option<u16> {
        self.extensions
            .pointer("/response/status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// Enrichment job URN from a not-found error
    ///
    /// Only present when `detail` is an object.
    pub fn enrichment_urn(&self) -> Option<String> {
        self.extensions
            .pointer("/response/body/detail/enrichment_urn")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
