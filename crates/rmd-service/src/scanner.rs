//! Reminder scan: find tasks due today, dispatch mail, advance reminder
//! dates.
//!
//! Dispatch is at-least-once: a crash between a successful send and the
//! reminder advance causes a duplicate send on the next scan. There is no
//! distributed lock; overlapping scans are tolerated because the advance is
//! a monotonic store write.

use chrono::NaiveDate;
use serde::Serialize;

use rmd_core::{Task, TaskState, recurrence};
use rmd_db::TaskDb;
use rmd_mailer::{MailMessage, Mailer};

use crate::error::ServiceError;

/// One task the scan decided to remind, with its precomputed next fire date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub owner_id: String,
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub recipients: Vec<String>,
    pub next_reminder: NaiveDate,
}

/// Decide which tasks get a reminder today. Pure over the task snapshot.
///
/// A task qualifies when it is pending, actually recurring, has recipients,
/// and its effective reminder date (stored date, or due date before the first
/// fire) equals today. Tasks already advanced past today produce nothing, so
/// scanning is idempotent for them.
#[must_use]
pub fn plan_scan(tasks: &[Task], today: NaiveDate) -> Vec<DueReminder> {
    tasks
        .iter()
        .filter(|task| task.state == TaskState::Pending)
        .filter(|task| task.recurrence.is_recurring())
        .filter(|task| !task.responsible_emails.is_empty())
        .filter_map(|task| {
            let reference = task.effective_reminder_date()?;
            if !recurrence::is_due_on(&task.recurrence, reference, today) {
                return None;
            }
            let next_reminder = recurrence::next_occurrence(&task.recurrence, reference)?;
            Some(DueReminder {
                owner_id: task.owner_id.clone(),
                task_id: task.id.clone(),
                title: task.title.clone(),
                description: task.description.clone(),
                recipients: task.responsible_emails.clone(),
                next_reminder,
            })
        })
        .collect()
}

/// Result of one scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    /// Task ids whose reminder was dispatched.
    pub dispatched: Vec<String>,
    /// Task ids whose dispatch failed (retried on the next scan).
    pub failed: Vec<String>,
    /// Reminder dates actually advanced in the store.
    pub advanced: usize,
}

/// Loads all tasks, plans, dispatches, and advances reminder dates.
pub struct ReminderScanner<'a, M: Mailer> {
    db: &'a TaskDb,
    mailer: &'a M,
}

impl<'a, M: Mailer> ReminderScanner<'a, M> {
    #[must_use]
    pub const fn new(db: &'a TaskDb, mailer: &'a M) -> Self {
        Self { db, mailer }
    }

    /// Run one scan for `today`.
    ///
    /// One dispatch attempt per due task; a failed send is logged, leaves the
    /// reminder date untouched, and never blocks the other tasks.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` only for store failures; mail failures are
    /// contained in the outcome.
    pub async fn run(&self, today: NaiveDate) -> Result<ScanOutcome, ServiceError> {
        let tasks = self.db.list_all_tasks().await?;
        let plan = plan_scan(&tasks, today);
        tracing::info!(due = plan.len(), %today, "reminder scan planned");

        let mut outcome = ScanOutcome::default();
        for due in plan {
            let message =
                MailMessage::task_reminder(&due.title, &due.description, due.recipients.clone());
            match self.mailer.send(&message).await {
                Ok(()) => {
                    outcome.dispatched.push(due.task_id.clone());
                    if self
                        .db
                        .advance_reminder(&due.task_id, due.next_reminder)
                        .await?
                    {
                        outcome.advanced += 1;
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        task_id = %due.task_id,
                        %error,
                        "reminder dispatch failed; will retry on next scan"
                    );
                    outcome.failed.push(due.task_id.clone());
                }
            }
        }

        tracing::info!(
            dispatched = outcome.dispatched.len(),
            failed = outcome.failed.len(),
            advanced = outcome.advanced,
            "reminder scan finished"
        );
        Ok(outcome)
    }
}
