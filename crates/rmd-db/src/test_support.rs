//! Shared test utilities for rmd-db tests.

use chrono::NaiveDate;

use rmd_core::{RecurrenceRule, TaskState, Weekday};

use crate::TaskDb;
use crate::repo::NewTaskRecord;

/// Create an in-memory database.
pub(crate) async fn test_db() -> TaskDb {
    TaskDb::open_local(":memory:").await.unwrap()
}

/// A valid pending task record for `owner`, biweekly from Monday 2025-01-06.
pub(crate) fn new_task(owner: &str) -> NewTaskRecord {
    NewTaskRecord {
        owner_id: owner.to_string(),
        title: "Rotate backups".to_string(),
        description: "Swap the off-site drive".to_string(),
        responsible_emails: vec!["ops@example.com".to_string()],
        due_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        end_date: None,
        start_time: None,
        state: TaskState::Pending,
        recurrence: RecurrenceRule::weekly(Weekday::Monday, 2),
    }
}
