#![forbid(unsafe_code)]
//! Affinity CRM integration for Mosaic
//!
//! Thin client over the Affinity v1 REST API
//! (<https://api-docs.affinity.co/>). Requests authenticate with HTTP basic
//! auth using an empty user name and the API key as password.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_affinity::{AffinityClient, AffinityConfig};
//!
//! let client = AffinityClient::new(&AffinityConfig::with_api_key("key"))?;
//! let page = client.search_organizations("example.com").await?;
//! for org in page.organizations {
//!     println!("{} {:?}", org.name, org.domains);
//! }
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::AffinityClient;
pub use config::AffinityConfig;
pub use error::AffinityError;
pub use models::{
    FieldValue, ListEntry, NewFieldValue, NewListEntry, Opportunity, Organization,
    OrganizationDetails, OrganizationSearchPage, Person, PersonSearchPage, Reminder,
};
