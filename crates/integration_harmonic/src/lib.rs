#![forbid(unsafe_code)]
//! Harmonic integration for Mosaic
//!
//! Company enrichment through the Harmonic GraphQL API. Requests carry the
//! API key in an `apikey` header.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_harmonic::{EnrichmentResult, HarmonicClient, HarmonicConfig};
//!
//! let client = HarmonicClient::new(&HarmonicConfig::with_api_key("key"))?;
//! match client.enrich_company_by_website("example.com").await? {
//!     EnrichmentResult::Found(company) => println!("{:?}", company.name),
//!     EnrichmentResult::NotFound { enrichment_urn } => println!("pending: {enrichment_urn:?}"),
//! }
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::HarmonicClient;
pub use config::HarmonicConfig;
pub use error::HarmonicError;
pub use models::{EnrichmentResult, HarmonicCompany, HarmonicWatchlist, Website};
