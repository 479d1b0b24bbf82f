//! Company master record store port

use async_trait::async_trait;
use domain::{Company, Domain};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the company master record store
///
/// Implementations reject a write that would leave two current records with
/// the same primary domain.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompanyStorePort: Send + Sync {
    /// Reserve a fresh, never reused company id
    async fn allocate_id(&self) -> Result<i64, ApplicationError>;

    /// Insert or replace a company keyed by its id
    ///
    /// Fails with [`ApplicationError::Conflict`] when another current record
    /// already owns the primary domain.
    async fn put(&self, company: &Company) -> Result<(), ApplicationError>;

    /// Get a company by id
    async fn get(&self, id: i64) -> Result<Option<Company>, ApplicationError>;

    /// Find the current record for a primary domain
    async fn find_current_by_primary_domain(
        &self,
        domain: &Domain,
    ) -> Result<Option<Company>, ApplicationError>;
}
