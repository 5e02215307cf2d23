//! The `Task` entity and its recurrence rule.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{RecurrenceKind, TaskState, Weekday};

/// Far-future marker on `reminder_date` meaning "no further reminders are
/// scheduled". A terminal marker, not a real date: the engine treats it as
/// never due, and nothing in this codebase writes it for recurring tasks.
#[must_use]
pub fn reminder_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Recurrence policy for a task.
///
/// `start_weekday` and `interval_weeks` are meaningful only when
/// `kind == Weekly`; for every other kind they keep their defaults and are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecurrenceRule {
    pub kind: RecurrenceKind,
    /// Anchor weekday for weekly recurrence (display/validation only).
    pub start_weekday: Weekday,
    /// Weeks between occurrences for weekly recurrence.
    pub interval_weeks: u32,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self::none()
    }
}

impl RecurrenceRule {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RecurrenceKind::None,
            start_weekday: Weekday::Monday,
            interval_weeks: 1,
        }
    }

    #[must_use]
    pub const fn daily() -> Self {
        Self {
            kind: RecurrenceKind::Daily,
            ..Self::none()
        }
    }

    #[must_use]
    pub const fn weekly(start_weekday: Weekday, interval_weeks: u32) -> Self {
        Self {
            kind: RecurrenceKind::Weekly,
            start_weekday,
            interval_weeks,
        }
    }

    #[must_use]
    pub const fn monthly() -> Self {
        Self {
            kind: RecurrenceKind::Monthly,
            ..Self::none()
        }
    }

    #[must_use]
    pub const fn yearly() -> Self {
        Self {
            kind: RecurrenceKind::Yearly,
            ..Self::none()
        }
    }

    /// Whether this rule repeats at all.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.kind != RecurrenceKind::None
    }

    /// Human-readable description for list output, e.g.
    /// `"weekly - monday, every 2 week(s)"`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            RecurrenceKind::Weekly => format!(
                "{} - {}, every {} week(s)",
                self.kind, self.start_weekday, self.interval_weeks
            ),
            kind => kind.to_string(),
        }
    }
}

/// A schedulable reminder item owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub responsible_emails: Vec<String>,
    pub due_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Opaque time-of-day display string (e.g. `"09:30"`).
    pub start_time: Option<String>,
    pub state: TaskState,
    pub recurrence: RecurrenceRule,
    /// Next date a reminder should fire. `None` means "use `due_date` as the
    /// first reminder"; the sentinel means "no further reminders".
    pub reminder_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// The date the next reminder should be compared against "today".
    ///
    /// Returns `None` when `reminder_date` holds the sentinel (no further
    /// reminders are scheduled); otherwise the stored reminder date, falling
    /// back to `due_date` for tasks that have never fired.
    #[must_use]
    pub fn effective_reminder_date(&self) -> Option<NaiveDate> {
        match self.reminder_date {
            Some(date) if date == reminder_sentinel() => None,
            Some(date) => Some(date),
            None => Some(self.due_date),
        }
    }
}
