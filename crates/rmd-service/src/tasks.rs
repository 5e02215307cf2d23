//! Task service: validated creation, ownership-checked updates, completion,
//! and listing.
//!
//! Requests cross this boundary as an explicit typed schema and are fully
//! validated before any store mutation; the core never sees raw input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rmd_core::{CoreError, RecurrenceKind, RecurrenceRule, Task, TaskState, Weekday};
use rmd_db::TaskDb;
use rmd_db::error::DatabaseError;
use rmd_db::repo::NewTaskRecord;
use rmd_db::update::TaskUpdate;
use rmd_mailer::{MailMessage, Mailer};

use crate::error::ServiceError;

/// Storage format for request dates.
const DATE_FMT: &str = "%Y-%m-%d";

/// Typed creation request.
///
/// Dates arrive as `YYYY-MM-DD` strings and `repeat` as a recurrence-kind
/// name, numeric index, or legacy frontend alias; everything is parsed and
/// validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub responsible_emails: Vec<String>,
    pub due_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub repeat: String,
    /// Weekly only: anchor weekday, Monday-first 1..=7. Defaults to Monday.
    #[serde(default)]
    pub start_weekday: Option<u8>,
    /// Weekly only: weeks between occurrences. Defaults to 1.
    #[serde(default)]
    pub interval_weeks: Option<u32>,
    /// Initial state index (0..=2). Defaults to pending.
    #[serde(default)]
    pub state: Option<u8>,
}

/// Result of a successful creation.
#[derive(Debug, Clone)]
pub struct CreatedTask {
    pub task: Task,
    /// Whether a same-day reminder dispatch was attempted. The attempt's
    /// outcome never fails the creation.
    pub dispatch_attempted: bool,
}

/// Validated task operations over an injected store and mailer.
pub struct TaskService<'a, M: Mailer> {
    db: &'a TaskDb,
    mailer: &'a M,
}

impl<'a, M: Mailer> TaskService<'a, M> {
    #[must_use]
    pub const fn new(db: &'a TaskDb, mailer: &'a M) -> Self {
        Self { db, mailer }
    }

    /// Create a task. If it is due today, one reminder dispatch is attempted
    /// synchronously; a failed dispatch is logged and the creation still
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns a validation error (no mutation) for missing fields, bad
    /// dates, an end date before the due date, or unrecognized recurrence or
    /// state values.
    pub async fn create(
        &self,
        request: CreateTaskRequest,
        today: NaiveDate,
    ) -> Result<CreatedTask, ServiceError> {
        let record = validate_create(request)?;
        let task = self.db.create_task(record).await?;

        let mut dispatch_attempted = false;
        if task.due_date == today && !task.responsible_emails.is_empty() {
            dispatch_attempted = true;
            let message = MailMessage::task_reminder(
                &task.title,
                &task.description,
                task.responsible_emails.clone(),
            );
            if let Err(error) = self.mailer.send(&message).await {
                tracing::warn!(
                    task_id = %task.id,
                    %error,
                    "same-day reminder dispatch failed; task was still created"
                );
            }
        }

        Ok(CreatedTask {
            task,
            dispatch_attempted,
        })
    }

    /// Merge the supplied fields into an existing task.
    ///
    /// # Errors
    ///
    /// `NotFound` when the task is absent, `PermissionDenied` when the
    /// acting principal does not own it, `Validation` when the merged record
    /// would violate date or recurrence constraints, `InvalidTransition` for
    /// a backward state change. No mutation happens on any failure.
    pub async fn update(
        &self,
        principal: &str,
        owner_id: &str,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, ServiceError> {
        let current = self.get_owned(principal, owner_id, task_id).await?;

        let merged_due = update.due_date.unwrap_or(current.due_date);
        let merged_end = update.end_date.unwrap_or(current.end_date);
        if let Some(end) = merged_end {
            if end < merged_due {
                return Err(ServiceError::validation(
                    "end_date cannot be before due_date",
                ));
            }
        }
        if let Some(recurrence) = update.recurrence {
            if recurrence.kind == RecurrenceKind::Weekly && recurrence.interval_weeks == 0 {
                return Err(ServiceError::validation("interval_weeks must be positive"));
            }
        }
        if let Some(next_state) = update.state {
            if next_state != current.state && !current.state.can_transition_to(next_state) {
                return Err(ServiceError::Core(CoreError::InvalidTransition {
                    task_id: task_id.to_string(),
                    from: current.state.to_string(),
                    to: next_state.to_string(),
                }));
            }
        }

        self.db.apply_update(task_id, &update).await?;
        Ok(self.db.get_task(owner_id, task_id).await?)
    }

    /// Explicit user completion: pending -> completed.
    ///
    /// # Errors
    ///
    /// Same ownership and lookup failures as [`Self::update`];
    /// `InvalidTransition` if the task is not pending.
    pub async fn complete(
        &self,
        principal: &str,
        owner_id: &str,
        task_id: &str,
    ) -> Result<Task, ServiceError> {
        let current = self.get_owned(principal, owner_id, task_id).await?;
        if !current.state.can_transition_to(TaskState::Completed) {
            return Err(ServiceError::Core(CoreError::InvalidTransition {
                task_id: task_id.to_string(),
                from: current.state.to_string(),
                to: TaskState::Completed.to_string(),
            }));
        }

        let update = TaskUpdate {
            state: Some(TaskState::Completed),
            ..TaskUpdate::default()
        };
        self.db.apply_update(task_id, &update).await?;
        Ok(self.db.get_task(owner_id, task_id).await?)
    }

    /// All tasks for one owner.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Database` if the query fails.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Task>, ServiceError> {
        Ok(self.db.list_tasks(owner_id).await?)
    }

    async fn get_owned(
        &self,
        principal: &str,
        owner_id: &str,
        task_id: &str,
    ) -> Result<Task, ServiceError> {
        let task = self
            .db
            .get_task(owner_id, task_id)
            .await
            .map_err(|error| match error {
                DatabaseError::NoResult => ServiceError::Core(CoreError::NotFound {
                    owner_id: owner_id.to_string(),
                    task_id: task_id.to_string(),
                }),
                other => ServiceError::Database(other),
            })?;

        if task.owner_id != principal {
            return Err(ServiceError::Core(CoreError::PermissionDenied {
                principal: principal.to_string(),
                task_id: task_id.to_string(),
            }));
        }
        Ok(task)
    }
}

fn validate_create(request: CreateTaskRequest) -> Result<NewTaskRecord, ServiceError> {
    let owner_id = required(&request.owner_id, "owner_id")?;
    let title = required(&request.title, "title")?;
    let description = required(&request.description, "description")?;

    let responsible_emails: Vec<String> = request
        .responsible_emails
        .iter()
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .collect();
    if responsible_emails.is_empty() {
        return Err(ServiceError::validation(
            "responsible_emails must not be empty",
        ));
    }

    let due_date = parse_request_date(&request.due_date, "due_date")?;
    let end_date = request
        .end_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| parse_request_date(s, "end_date"))
        .transpose()?;
    if let Some(end) = end_date {
        if end < due_date {
            return Err(ServiceError::validation(
                "end_date cannot be before due_date",
            ));
        }
    }

    let kind: RecurrenceKind = request.repeat.parse().map_err(ServiceError::Core)?;
    let recurrence = if kind == RecurrenceKind::Weekly {
        let number = request.start_weekday.unwrap_or(1);
        let start_weekday = Weekday::from_number(number).ok_or_else(|| {
            ServiceError::validation(format!("start_weekday must be 1..=7, got {number}"))
        })?;
        let interval_weeks = request.interval_weeks.unwrap_or(1);
        if interval_weeks == 0 {
            return Err(ServiceError::validation("interval_weeks must be positive"));
        }
        RecurrenceRule::weekly(start_weekday, interval_weeks)
    } else {
        RecurrenceRule {
            kind,
            ..RecurrenceRule::none()
        }
    };

    let state = match request.state {
        None => TaskState::Pending,
        Some(index) => TaskState::from_index(index).ok_or_else(|| {
            ServiceError::validation(format!("state must be 0..=2, got {index}"))
        })?,
    };

    Ok(NewTaskRecord {
        owner_id,
        title,
        description,
        responsible_emails,
        due_date,
        end_date,
        start_time: request.start_time.filter(|s| !s.is_empty()),
        state,
        recurrence,
    })
}

fn required(value: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn parse_request_date(value: &str, field: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value, DATE_FMT)
        .map_err(|_| ServiceError::validation(format!("{field} must be a valid YYYY-MM-DD date")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rmd_db::update::TaskUpdateBuilder;
    use rmd_mailer::CaptureMailer;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> CreateTaskRequest {
        CreateTaskRequest {
            owner_id: "user-1".into(),
            title: "Quarterly report".into(),
            description: "Compile and circulate".into(),
            responsible_emails: vec!["a@example.com".into(), " b@example.com ".into()],
            due_date: "2025-01-06".into(),
            end_date: None,
            start_time: None,
            repeat: "week".into(),
            start_weekday: None,
            interval_weeks: Some(2),
            state: None,
        }
    }

    async fn service_db() -> TaskDb {
        TaskDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn create_applies_weekly_defaults_and_trims_emails() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);

        let created = service
            .create(request(), date(2025, 1, 1))
            .await
            .unwrap();
        let task = created.task;
        assert_eq!(task.state, TaskState::Pending);
        assert_eq!(task.recurrence.kind, RecurrenceKind::Weekly);
        assert_eq!(task.recurrence.start_weekday, Weekday::Monday);
        assert_eq!(task.recurrence.interval_weeks, 2);
        assert_eq!(
            task.responsible_emails,
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );

        // Not due today: no dispatch.
        assert!(!created.dispatch_attempted);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn create_due_today_attempts_one_dispatch() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);

        let created = service
            .create(request(), date(2025, 1, 6))
            .await
            .unwrap();
        assert!(created.dispatch_attempted);
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].subject, "Reminder: Quarterly report");
    }

    #[tokio::test]
    async fn create_succeeds_even_when_dispatch_fails() {
        let db = service_db().await;
        let mailer = CaptureMailer::failing_on("Quarterly");
        let service = TaskService::new(&db, &mailer);

        let created = service
            .create(request(), date(2025, 1, 6))
            .await
            .unwrap();
        assert!(created.dispatch_attempted);
        assert!(mailer.sent().is_empty());

        // The record exists despite the failed send.
        let stored = db.get_task("user-1", &created.task.id).await.unwrap();
        assert_eq!(stored.title, "Quarterly report");
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);
        let today = date(2025, 1, 1);

        let mut missing_title = request();
        missing_title.title = "  ".into();
        assert!(service.create(missing_title, today).await.is_err());

        let mut no_emails = request();
        no_emails.responsible_emails = vec!["  ".into()];
        assert!(service.create(no_emails, today).await.is_err());

        let mut bad_date = request();
        bad_date.due_date = "06/01/2025".into();
        assert!(service.create(bad_date, today).await.is_err());

        let mut inverted = request();
        inverted.end_date = Some("2025-01-01".into());
        assert!(service.create(inverted, today).await.is_err());

        let mut bad_repeat = request();
        bad_repeat.repeat = "fortnightly".into();
        assert!(service.create(bad_repeat, today).await.is_err());

        let mut zero_interval = request();
        zero_interval.interval_weeks = Some(0);
        assert!(service.create(zero_interval, today).await.is_err());

        let mut bad_state = request();
        bad_state.state = Some(7);
        assert!(service.create(bad_state, today).await.is_err());

        // Nothing was persisted by any rejected request.
        assert!(db.list_all_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn end_date_equal_to_due_date_is_allowed() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);

        let mut same_day = request();
        same_day.end_date = Some("2025-01-06".into());
        let created = service.create(same_day, date(2025, 1, 1)).await.unwrap();
        assert_eq!(created.task.end_date, Some(date(2025, 1, 6)));
    }

    #[tokio::test]
    async fn update_requires_ownership() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);
        let created = service.create(request(), date(2025, 1, 1)).await.unwrap();

        let update = TaskUpdateBuilder::new().title("Hijacked").build();
        let result = service
            .update("intruder", "user-1", &created.task.id, update)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::PermissionDenied { .. }))
        ));

        // No mutation happened.
        let stored = db.get_task("user-1", &created.task.id).await.unwrap();
        assert_eq!(stored.title, "Quarterly report");
    }

    #[tokio::test]
    async fn update_merges_supplied_fields() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);
        let created = service.create(request(), date(2025, 1, 1)).await.unwrap();

        let update = TaskUpdateBuilder::new()
            .description("Circulate to the board")
            .build();
        let updated = service
            .update("user-1", "user-1", &created.task.id, update)
            .await
            .unwrap();
        assert_eq!(updated.description, "Circulate to the board");
        assert_eq!(updated.title, "Quarterly report");
    }

    #[tokio::test]
    async fn update_unknown_task_is_not_found() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);

        let result = service
            .update(
                "user-1",
                "user-1",
                "tsk-missing",
                TaskUpdateBuilder::new().title("x").build(),
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn update_rejects_merged_date_inversion() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);
        let created = service.create(request(), date(2025, 1, 1)).await.unwrap();

        // Stored due date is 2025-01-06; this end date lands before it.
        let update = TaskUpdateBuilder::new()
            .end_date(Some(date(2025, 1, 2)))
            .build();
        let result = service
            .update("user-1", "user-1", &created.task.id, update)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn complete_moves_pending_forward_only() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);
        let created = service.create(request(), date(2025, 1, 1)).await.unwrap();

        let completed = service
            .complete("user-1", "user-1", &created.task.id)
            .await
            .unwrap();
        assert_eq!(completed.state, TaskState::Completed);

        // Completing twice is an invalid transition.
        let again = service.complete("user-1", "user-1", &created.task.id).await;
        assert!(matches!(
            again,
            Err(ServiceError::Core(CoreError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn update_rejects_backward_state_change() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);
        let created = service.create(request(), date(2025, 1, 1)).await.unwrap();
        service
            .complete("user-1", "user-1", &created.task.id)
            .await
            .unwrap();

        let update = TaskUpdateBuilder::new().state(TaskState::Pending).build();
        let result = service
            .update("user-1", "user-1", &created.task.id, update)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Core(CoreError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn list_returns_owner_tasks() {
        let db = service_db().await;
        let mailer = CaptureMailer::new();
        let service = TaskService::new(&db, &mailer);
        service.create(request(), date(2025, 1, 1)).await.unwrap();

        let mut other = request();
        other.owner_id = "user-2".into();
        service.create(other, date(2025, 1, 1)).await.unwrap();

        assert_eq!(service.list("user-1").await.unwrap().len(), 1);
        assert_eq!(service.list("user-2").await.unwrap().len(), 1);
    }
}
