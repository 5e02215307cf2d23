//! Retention sweep: archive finished tasks and delete those past the
//! retention window.
//!
//! The plan maps each task to at most one action via the lifecycle rules;
//! deletion subsumes archival within the same pass. Applying is one batched
//! transaction, so a failed run changes nothing and the next scheduled sweep
//! retries wholesale.

use chrono::NaiveDate;

use rmd_core::{LifecyclePolicy, Task, TaskState};
use rmd_db::TaskDb;
use rmd_db::sweep::{SweepAction, SweepSummary};

use crate::error::ServiceError;

/// Decide the sweep actions for a task snapshot. Pure.
///
/// Tasks whose disposition matches their stored state produce no action, so
/// re-running a sweep immediately after an applied one yields an empty plan.
#[must_use]
pub fn plan_sweep(tasks: &[Task], today: NaiveDate, policy: &LifecyclePolicy) -> Vec<SweepAction> {
    tasks
        .iter()
        .filter_map(|task| {
            let disposition = policy.next_state(task.state, task.due_date, today);
            if disposition.delete {
                return Some(SweepAction::Delete {
                    task_id: task.id.clone(),
                });
            }
            if disposition.state == TaskState::Archived && task.state != TaskState::Archived {
                return Some(SweepAction::Archive {
                    task_id: task.id.clone(),
                });
            }
            None
        })
        .collect()
}

/// Loads all tasks, plans, and applies the batch.
pub struct RetentionSweeper<'a> {
    db: &'a TaskDb,
    policy: LifecyclePolicy,
}

impl<'a> RetentionSweeper<'a> {
    #[must_use]
    pub const fn new(db: &'a TaskDb, policy: LifecyclePolicy) -> Self {
        Self { db, policy }
    }

    /// Run one sweep for `today`. Safe to run repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if loading tasks or applying the batch fails;
    /// a failed batch applies nothing.
    pub async fn run(&self, today: NaiveDate) -> Result<SweepSummary, ServiceError> {
        let tasks = self.db.list_all_tasks().await?;
        let plan = plan_sweep(&tasks, today, &self.policy);
        let summary = self.db.apply_sweep(&plan).await?;
        tracing::info!(
            archived = summary.archived,
            deleted = summary.deleted,
            %today,
            "retention sweep finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Utc};
    use pretty_assertions::assert_eq;
    use rmd_core::RecurrenceRule;
    use rmd_db::repo::NewTaskRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(due: NaiveDate, state: TaskState) -> NewTaskRecord {
        NewTaskRecord {
            owner_id: "user-1".into(),
            title: "stale".into(),
            description: "desc".into(),
            responsible_emails: vec!["ops@example.com".into()],
            due_date: due,
            end_date: None,
            start_time: None,
            state,
            recurrence: RecurrenceRule::none(),
        }
    }

    fn snapshot_task(id: &str, due: NaiveDate, state: TaskState) -> Task {
        Task {
            id: id.into(),
            owner_id: "user-1".into(),
            title: "t".into(),
            description: "d".into(),
            responsible_emails: vec![],
            due_date: due,
            end_date: None,
            start_time: None,
            state,
            recurrence: RecurrenceRule::none(),
            reminder_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const POLICY: LifecyclePolicy = LifecyclePolicy { retention_days: 30 };

    #[test]
    fn plan_archives_and_deletes_by_age() {
        let today = date(2025, 3, 3);
        let tasks = vec![
            snapshot_task("tsk-current", today, TaskState::Pending),
            snapshot_task("tsk-overdue", date(2025, 3, 1), TaskState::Pending),
            snapshot_task("tsk-done", date(2025, 3, 1), TaskState::Completed),
            snapshot_task("tsk-archived", date(2025, 2, 10), TaskState::Archived),
            snapshot_task("tsk-ancient", date(2025, 1, 1), TaskState::Archived),
        ];

        let plan = plan_sweep(&tasks, today, &POLICY);
        assert_eq!(
            plan,
            vec![
                SweepAction::Archive {
                    task_id: "tsk-overdue".into()
                },
                SweepAction::Archive {
                    task_id: "tsk-done".into()
                },
                SweepAction::Delete {
                    task_id: "tsk-ancient".into()
                },
            ]
        );
    }

    #[test]
    fn delete_subsumes_archive_after_long_downtime() {
        let today = date(2025, 3, 3);
        let tasks = vec![snapshot_task(
            "tsk-forgotten",
            date(2024, 11, 1),
            TaskState::Pending,
        )];
        let plan = plan_sweep(&tasks, today, &POLICY);
        assert_eq!(
            plan,
            vec![SweepAction::Delete {
                task_id: "tsk-forgotten".into()
            }]
        );
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let db = TaskDb::open_local(":memory:").await.unwrap();
        let today = date(2025, 3, 3);
        db.create_task(record(date(2025, 3, 1), TaskState::Pending))
            .await
            .unwrap();
        let sweeper = RetentionSweeper::new(&db, POLICY);

        let first = sweeper.run(today).await.unwrap();
        assert_eq!(first.archived, 1);
        assert_eq!(first.deleted, 0);

        // No elapsed time: the second run finds nothing to do.
        let second = sweeper.run(today).await.unwrap();
        assert_eq!(second, SweepSummary::default());
    }

    #[tokio::test]
    async fn archive_then_delete_across_the_window() {
        let db = TaskDb::open_local(":memory:").await.unwrap();
        let completed_on = date(2025, 1, 10);
        let task = db
            .create_task(record(completed_on, TaskState::Completed))
            .await
            .unwrap();
        let sweeper = RetentionSweeper::new(&db, POLICY);

        // Any sweep after the completion date archives.
        let day_after = completed_on.checked_add_days(Days::new(1)).unwrap();
        sweeper.run(day_after).await.unwrap();
        let stored = db.get_task("user-1", &task.id).await.unwrap();
        assert_eq!(stored.state, TaskState::Archived);

        // Within the window the record survives.
        let within = completed_on.checked_add_days(Days::new(30)).unwrap();
        let kept = sweeper.run(within).await.unwrap();
        assert_eq!(kept.deleted, 0);

        // Past the window it is removed.
        let past = completed_on.checked_add_days(Days::new(31)).unwrap();
        let removed = sweeper.run(past).await.unwrap();
        assert_eq!(removed.deleted, 1);
        assert!(db.get_task("user-1", &task.id).await.is_err());
    }
}
