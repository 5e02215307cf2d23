//! # rmd-db
//!
//! libSQL task store for Remind.
//!
//! Holds the single `tasks` table (owner-scoped via an `owner_id` column),
//! repository methods for CRUD and the batch mutations the reminder scan and
//! retention sweep apply, and row-parsing helpers.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repo;
pub mod sweep;
pub mod update;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// ID prefix for task records.
pub const PREFIX_TASK: &str = "tsk";

/// Central database handle for the Remind task store.
///
/// Wraps a libSQL database and connection; repository methods live in
/// [`repo`] as `impl TaskDb`.
pub struct TaskDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TaskDb {
    /// Open a local-only database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let task_db = Self { db, conn };
        task_db.run_migrations().await?;
        Ok(task_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"tsk-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the
    /// prefix.
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
    use crate::test_support::test_db;

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
                (),
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn tasks_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remind.db");
        let path = path.to_str().unwrap();

        let id = {
            let db = TaskDb::open_local(path).await.unwrap();
            let task = db
                .create_task(crate::test_support::new_task("user-1"))
                .await
                .unwrap();
            task.id
        };

        let db = TaskDb::open_local(path).await.unwrap();
        let task = db.get_task("user-1", &id).await.unwrap();
        assert_eq!(task.id, id);
    }

    #[tokio::test]
    async fn generate_id_has_prefix_and_hex_suffix() {
        let db = test_db().await;
        let id = db.generate_id(PREFIX_TASK).await.unwrap();
        assert!(id.starts_with("tsk-"));
        assert_eq!(id.len(), 12);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
