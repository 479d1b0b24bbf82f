//! SQLite company master record store
//!
//! Implements the `CompanyStorePort` port. Each company is kept as a JSON
//! document next to the indexed `primary_domain` and `current` columns.

use std::sync::Arc;

use application::{error::ApplicationError, ports::CompanyStorePort};
use async_trait::async_trait;
use domain::{Company, Domain, DomainError};
use rusqlite::{OptionalExtension, params};
use tokio::task;
use tracing::{debug, instrument};

use super::{
    connection::ConnectionPool,
    error::{map_document_error, map_pool_error, map_sqlite_error},
};

const COMPANY_SEQUENCE: &str = "company";

/// SQLite-based company store
#[derive(Debug, Clone)]
pub struct SqliteCompanyStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteCompanyStore {
    /// Create a new SQLite company store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn parse_document(document: &str) -> Result<Company, ApplicationError> {
    serde_json::from_str(document).map_err(map_document_error)
}

#[async_trait]
impl CompanyStorePort for SqliteCompanyStore {
    #[instrument(skip(self))]
    async fn allocate_id(&self) -> Result<i64, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            let id: i64 = conn
                .query_row(
                    "INSERT INTO id_sequences (kind, next_id) VALUES (?1, 1)
                     ON CONFLICT(kind) DO UPDATE SET next_id = next_id + 1
                     RETURNING next_id",
                    [COMPANY_SEQUENCE],
                    |row| row.get(0),
                )
                .map_err(map_sqlite_error)?;

            debug!(id, "Allocated company id");
            Ok(id)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, company), fields(id = ?company.id, domain = %company.primary_domain))]
    async fn put(&self, company: &Company) -> Result<(), ApplicationError> {
        let id = company.id.ok_or_else(|| {
            DomainError::ValidationError("company id must be allocated before storing".into())
        })?;
        let document = serde_json::to_string(company).map_err(map_document_error)?;
        let primary_domain = company.primary_domain.as_str().to_string();
        let current = company.current;
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            conn.execute(
                "INSERT INTO companies (id, primary_domain, current, document)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     primary_domain = excluded.primary_domain,
                     current = excluded.current,
                     document = excluded.document",
                params![id, primary_domain, current, document],
            )
            .map_err(|e| match map_sqlite_error(e) {
                ApplicationError::Conflict(_) => ApplicationError::Conflict(format!(
                    "a current company already exists for {primary_domain}"
                )),
                other => other,
            })?;

            debug!("Stored company");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Option<Company>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            let document: Option<String> = conn
                .query_row(
                    "SELECT document FROM companies WHERE id = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sqlite_error)?;

            debug!(found = document.is_some(), "Retrieved company");
            document.as_deref().map(parse_document).transpose()
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(domain = %domain))]
    async fn find_current_by_primary_domain(
        &self,
        domain: &Domain,
    ) -> Result<Option<Company>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let domain = domain.as_str().to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            let document: Option<String> = conn
                .query_row(
                    "SELECT document FROM companies
                     WHERE primary_domain = ?1 AND current = 1
                     ORDER BY id LIMIT 1",
                    [&domain],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sqlite_error)?;

            debug!(found = document.is_some(), "Looked up current company");
            document.as_deref().map(parse_document).transpose()
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
