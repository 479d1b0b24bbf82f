//! Database migrations
//!
//! Manages database schema versioning and migrations.
//!
//! ## Adding New Migrations
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a new `migrate_vX` function
//! 3. Call it from `run_migrations`

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Running database migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(version = 1, error = %e, "Migration V001 (document store) failed");
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Database migrations complete");
    } else {
        debug!(version = current_version, "Database schema is up to date");
    }

    Ok(())
}

/// Get current schema version
fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: company master records, id sequences, calendar webhooks
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: Document store");

    conn.execute_batch(
        "
        -- Company master records, one JSON document per row
        CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY,
            primary_domain TEXT NOT NULL,
            current INTEGER NOT NULL DEFAULT 1 CHECK(current IN (0, 1)),
            document TEXT NOT NULL
        );

        -- At most one current record per primary domain
        CREATE UNIQUE INDEX IF NOT EXISTS idx_companies_current_domain
            ON companies(primary_domain) WHERE current = 1;

        -- Monotonic id allocation per record kind
        CREATE TABLE IF NOT EXISTS id_sequences (
            kind TEXT PRIMARY KEY,
            next_id INTEGER NOT NULL
        );

        -- Calendar push channels keyed by calendar
        CREATE TABLE IF NOT EXISTS calendar_webhooks (
            calendar_id TEXT PRIMARY KEY,
            document TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn fresh_database_is_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn current_domain_index_rejects_duplicates() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO companies (id, primary_domain, current, document) VALUES (1, 'a.com', 1, '{}')",
            [],
        )
        .unwrap();
        // Historical records may share the domain
        conn.execute(
            "INSERT INTO companies (id, primary_domain, current, document) VALUES (2, 'a.com', 0, '{}')",
            [],
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO companies (id, primary_domain, current, document) VALUES (3, 'a.com', 1, '{}')",
            [],
        );
        assert!(duplicate.is_err());
    }
}
