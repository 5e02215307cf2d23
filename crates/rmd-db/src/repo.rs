//! Task repository — CRUD, partial updates, and the monotonic reminder
//! advance used by the scanner.

use chrono::{NaiveDate, Utc};

use rmd_core::{RecurrenceRule, Task, TaskState};

use crate::PREFIX_TASK;
use crate::TaskDb;
use crate::error::DatabaseError;
use crate::helpers::{
    DATE_FMT, encode_email_list, get_opt_string, parse_date, parse_datetime, parse_email_list,
    parse_enum, parse_optional_date,
};
use crate::update::TaskUpdate;

const SELECT_COLS: &str = "id, owner_id, title, description, responsible_emails, due_date, \
     end_date, start_time, state, recurrence_kind, start_weekday, interval_weeks, \
     reminder_date, created_at, updated_at";

/// A validated task ready for insertion. The store assigns `id`,
/// `reminder_date` (empty) and timestamps.
#[derive(Debug, Clone)]
pub struct NewTaskRecord {
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub responsible_emails: Vec<String>,
    pub due_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub state: TaskState,
    pub recurrence: RecurrenceRule,
}

fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    let interval = row.get::<i64>(11)?;
    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        responsible_emails: parse_email_list(&row.get::<String>(4)?)?,
        due_date: parse_date(&row.get::<String>(5)?)?,
        end_date: parse_optional_date(get_opt_string(row, 6)?.as_deref())?,
        start_time: get_opt_string(row, 7)?,
        state: parse_enum(&row.get::<String>(8)?)?,
        recurrence: RecurrenceRule {
            kind: parse_enum(&row.get::<String>(9)?)?,
            start_weekday: parse_enum(&row.get::<String>(10)?)?,
            interval_weeks: u32::try_from(interval)
                .map_err(|_| DatabaseError::Query(format!("Invalid interval_weeks {interval}")))?,
        },
        reminder_date: parse_optional_date(get_opt_string(row, 12)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(13)?)?,
        updated_at: parse_datetime(&row.get::<String>(14)?)?,
    })
}

impl TaskDb {
    /// Insert a new task. State defaults were resolved by the caller;
    /// `reminder_date` starts empty so the first fire uses the due date.
    pub async fn create_task(&self, new: NewTaskRecord) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let id = self.generate_id(PREFIX_TASK).await?;

        self.conn()
            .execute(
                &format!(
                    "INSERT INTO tasks ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
                ),
                libsql::params![
                    id.as_str(),
                    new.owner_id.as_str(),
                    new.title.as_str(),
                    new.description.as_str(),
                    encode_email_list(&new.responsible_emails)?,
                    new.due_date.format(DATE_FMT).to_string(),
                    new.end_date.map(|d| d.format(DATE_FMT).to_string()),
                    new.start_time.clone(),
                    new.state.as_str(),
                    new.recurrence.kind.as_str(),
                    new.recurrence.start_weekday.as_str(),
                    i64::from(new.recurrence.interval_weeks),
                    Option::<String>::None,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Task {
            id,
            owner_id: new.owner_id,
            title: new.title,
            description: new.description,
            responsible_emails: new.responsible_emails,
            due_date: new.due_date,
            end_date: new.end_date,
            start_time: new.start_time,
            state: new.state,
            recurrence: new.recurrence,
            reminder_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch one task within an owner's namespace.
    pub async fn get_task(&self, owner_id: &str, task_id: &str) -> Result<Task, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM tasks WHERE owner_id = ?1 AND id = ?2"),
                [owner_id, task_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_task(&row)
    }

    /// All tasks for one owner, oldest due date first.
    pub async fn list_tasks(&self, owner_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks WHERE owner_id = ?1 \
                     ORDER BY due_date, created_at"
                ),
                [owner_id],
            )
            .await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Every task in the store — the input for scans and sweeps.
    pub async fn list_all_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM tasks ORDER BY owner_id, due_date"),
                (),
            )
            .await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Merge the supplied fields into a stored task. Ownership was checked by
    /// the caller; an empty update is a no-op.
    pub async fn apply_update(
        &self,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<(), DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().into());
            idx += 1;
        }
        if let Some(ref emails) = update.responsible_emails {
            sets.push(format!("responsible_emails = ?{idx}"));
            params.push(encode_email_list(emails)?.into());
            idx += 1;
        }
        if let Some(due_date) = update.due_date {
            sets.push(format!("due_date = ?{idx}"));
            params.push(due_date.format(DATE_FMT).to_string().into());
            idx += 1;
        }
        if let Some(end_date) = update.end_date {
            sets.push(format!("end_date = ?{idx}"));
            params.push(end_date.map_or(libsql::Value::Null, |d| {
                d.format(DATE_FMT).to_string().into()
            }));
            idx += 1;
        }
        if let Some(ref start_time) = update.start_time {
            sets.push(format!("start_time = ?{idx}"));
            params.push(start_time.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(state) = update.state {
            sets.push(format!("state = ?{idx}"));
            params.push(state.as_str().into());
            idx += 1;
        }
        if let Some(recurrence) = update.recurrence {
            sets.push(format!("recurrence_kind = ?{idx}"));
            params.push(recurrence.kind.as_str().into());
            idx += 1;
            sets.push(format!("start_weekday = ?{idx}"));
            params.push(recurrence.start_weekday.as_str().into());
            idx += 1;
            sets.push(format!("interval_weeks = ?{idx}"));
            params.push(i64::from(recurrence.interval_weeks).into());
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(task_id.into());
        let sql = format!("UPDATE tasks SET {} WHERE id = ?{idx}", sets.join(", "));
        self.conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        Ok(())
    }

    /// Advance a task's reminder date after a successful dispatch.
    ///
    /// The SQL guard makes the write monotonic: a reminder date never moves
    /// backward, so racing scans settle on the furthest date. Returns whether
    /// a row actually changed.
    pub async fn advance_reminder(
        &self,
        task_id: &str,
        next: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let next_text = next.format(DATE_FMT).to_string();
        let affected = self
            .conn()
            .execute(
                "UPDATE tasks SET reminder_date = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND (reminder_date IS NULL OR reminder_date < ?1)",
                libsql::params![next_text, Utc::now().to_rfc3339(), task_id],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Remove one task record entirely.
    pub async fn delete_task(&self, owner_id: &str, task_id: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "DELETE FROM tasks WHERE owner_id = ?1 AND id = ?2",
                [owner_id, task_id],
            )
            .await?;
        Ok(())
    }
}
