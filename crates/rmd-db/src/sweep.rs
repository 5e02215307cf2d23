//! Batched application of retention sweep results.
//!
//! The sweep planner (rmd-service) maps each task to at most one action;
//! the whole batch is applied in a single transaction so a failed run leaves
//! the store untouched and the next scheduled sweep retries wholesale.

use serde::Serialize;

use rmd_core::TaskState;

use crate::TaskDb;
use crate::error::DatabaseError;

/// One store mutation produced by the retention sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum SweepAction {
    /// Move the task's state to archived.
    Archive { task_id: String },
    /// Remove the record entirely (subsumes archival in the same pass).
    Delete { task_id: String },
}

/// Counts of applied sweep mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub archived: usize,
    pub deleted: usize,
}

impl TaskDb {
    /// Apply a sweep plan in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement or the commit fails; nothing
    /// is applied in that case.
    pub async fn apply_sweep(
        &self,
        actions: &[SweepAction],
    ) -> Result<SweepSummary, DatabaseError> {
        let mut summary = SweepSummary::default();
        if actions.is_empty() {
            return Ok(summary);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn().transaction().await?;
        for action in actions {
            match action {
                SweepAction::Archive { task_id } => {
                    tx.execute(
                        "UPDATE tasks SET state = ?1, updated_at = ?2 WHERE id = ?3",
                        libsql::params![
                            TaskState::Archived.as_str(),
                            now.as_str(),
                            task_id.as_str()
                        ],
                    )
                    .await?;
                    summary.archived += 1;
                }
                SweepAction::Delete { task_id } => {
                    tx.execute("DELETE FROM tasks WHERE id = ?1", [task_id.as_str()])
                        .await?;
                    summary.deleted += 1;
                }
            }
        }
        tx.commit().await?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_task, test_db};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn empty_plan_is_a_noop() {
        let db = test_db().await;
        let summary = db.apply_sweep(&[]).await.unwrap();
        assert_eq!(summary, SweepSummary::default());
    }

    #[tokio::test]
    async fn archive_and_delete_apply_in_one_batch() {
        let db = test_db().await;
        let keep = db.create_task(new_task("user-1")).await.unwrap();
        let archive = db.create_task(new_task("user-1")).await.unwrap();
        let delete = db.create_task(new_task("user-1")).await.unwrap();

        let summary = db
            .apply_sweep(&[
                SweepAction::Archive {
                    task_id: archive.id.clone(),
                },
                SweepAction::Delete {
                    task_id: delete.id.clone(),
                },
            ])
            .await
            .unwrap();

        assert_eq!(summary.archived, 1);
        assert_eq!(summary.deleted, 1);

        let archived = db.get_task("user-1", &archive.id).await.unwrap();
        assert_eq!(archived.state, TaskState::Archived);
        assert!(db.get_task("user-1", &delete.id).await.is_err());
        assert!(db.get_task("user-1", &keep.id).await.is_ok());
    }
}
