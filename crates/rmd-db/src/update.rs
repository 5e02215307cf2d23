//! Partial-update builder for tasks.
//!
//! Only supplied fields are merged into the stored record. Optional columns
//! use `Option<Option<T>>`: the outer `Some` means "set this field", the
//! inner `None` means "clear it".

use chrono::NaiveDate;
use serde::Serialize;

use rmd_core::{RecurrenceRule, TaskState};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TaskState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl TaskUpdate {
    /// Whether the update carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.responsible_emails.is_none()
            && self.due_date.is_none()
            && self.end_date.is_none()
            && self.start_time.is_none()
            && self.state.is_none()
            && self.recurrence.is_none()
    }
}

pub struct TaskUpdateBuilder(TaskUpdate);

impl TaskUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn responsible_emails(mut self, emails: Vec<String>) -> Self {
        self.0.responsible_emails = Some(emails);
        self
    }

    #[must_use]
    pub const fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.0.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub const fn end_date(mut self, end_date: Option<NaiveDate>) -> Self {
        self.0.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn start_time(mut self, start_time: Option<String>) -> Self {
        self.0.start_time = Some(start_time);
        self
    }

    #[must_use]
    pub const fn state(mut self, state: TaskState) -> Self {
        self.0.state = Some(state);
        self
    }

    #[must_use]
    pub const fn recurrence(mut self, recurrence: RecurrenceRule) -> Self {
        self.0.recurrence = Some(recurrence);
        self
    }

    #[must_use]
    pub fn build(self) -> TaskUpdate {
        self.0
    }
}

impl Default for TaskUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_detected() {
        assert!(TaskUpdateBuilder::new().build().is_empty());
        assert!(!TaskUpdateBuilder::new().title("x").build().is_empty());
    }

    #[test]
    fn serialization_skips_unset_fields() {
        let update = TaskUpdateBuilder::new()
            .title("Renamed")
            .end_date(None)
            .build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["title"], "Renamed");
        assert!(json["end_date"].is_null());
        assert!(json.get("description").is_none());
    }
}
