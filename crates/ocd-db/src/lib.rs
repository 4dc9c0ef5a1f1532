//! # ocd-db
//!
//! libSQL persistence for the OCD decision ledger.
//!
//! Holds decisions, the subject items they refer to, and the audit trail.
//! Repository methods hang off [`service::OcdService`] and follow one mutation
//! protocol: SQL write, audit row, JSONL trail line. The outcome tracker and the
//! batch reward job live here as well, since both need the store.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod trail;
pub mod tracker;
pub mod updates;

mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection, and generates
/// prefixed entity IDs.
pub struct OcdDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl OcdDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let ocd_db = Self { db, conn };
        ocd_db.run_migrations().await?;
        Ok(ocd_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"dec-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> OcdDb {
        OcdDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["items", "decisions", "audit_trail"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("dec").await.unwrap();
        assert!(id.starts_with("dec-"), "ID should start with 'dec-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");

        let hex_part = &id[4..];
        assert!(
            hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "Random part should be hex: {hex_part}"
        );
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in ocd_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
            assert_eq!(ocd_core::ids::prefix_of(&id), Some(prefix));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn rejects_unknown_agent_type() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO decisions (id, agent_type, state, action, model_version, user_id)
                 VALUES ('dec-00000001', 'SUMMARIZER', '{}', '{}', 'v1', 'usr-1')",
                (),
            )
            .await;
        assert!(result.is_err(), "CHECK constraint should reject the agent type");
    }

    #[tokio::test]
    async fn decision_identity_columns_are_immutable() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO decisions (id, agent_type, state, action, model_version, user_id)
                 VALUES ('dec-00000001', 'FILER', '{}', '{}', 'v1', 'usr-1')",
                (),
            )
            .await
            .unwrap();

        let retag = db
            .conn()
            .execute(
                "UPDATE decisions SET agent_type = 'STORER' WHERE id = 'dec-00000001'",
                (),
            )
            .await;
        assert!(retag.is_err(), "agent_type must not change");

        db.conn()
            .execute(
                "UPDATE decisions SET reward = 1.5 WHERE id = 'dec-00000001'",
                (),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn decision_item_must_exist() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO decisions (id, agent_type, state, action, model_version, user_id, item_id)
                 VALUES ('dec-00000001', 'FILER', '{}', '{}', 'v1', 'usr-1', 'itm-missing0')",
                (),
            )
            .await;
        assert!(result.is_err(), "foreign key should reject a dangling item_id");
    }
}
