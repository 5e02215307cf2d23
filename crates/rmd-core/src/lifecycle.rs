//! Retention lifecycle: when tasks are implicitly completed, archived, and
//! finally deleted.
//!
//! The rules are evaluated daily against a task's effective date (its due
//! date, or the completion-derived date) and "today":
//!
//! 1. Pending with the effective date in the past counts as implicitly
//!    completed — a task whose due date passed without an explicit update is
//!    considered done.
//! 2. Completed (explicit or implicit) with the effective date in the past is
//!    archived.
//! 3. Archived beyond the retention window is deleted from the store.
//!
//! Cascading within a single evaluation is legal: after long downtime a
//! pending task can come out archived-and-deletable in one pass, because each
//! threshold is satisfied independently.

use chrono::{Days, NaiveDate};

use crate::enums::TaskState;

/// Default number of days an archived task is retained before deletion.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// What the retention sweeper should do with a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    /// State the task should hold after this evaluation.
    pub state: TaskState,
    /// Whether the record should be removed from the store entirely.
    pub delete: bool,
}

/// Retention policy, wired from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Days an archived task survives past its effective date.
    pub retention_days: u32,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl LifecyclePolicy {
    /// Evaluate the lifecycle rules for one task. Pure; the caller batches
    /// the resulting store mutations.
    #[must_use]
    pub fn next_state(
        &self,
        current: TaskState,
        effective_date: NaiveDate,
        today: NaiveDate,
    ) -> Disposition {
        let mut state = current;
        if state == TaskState::Pending && effective_date < today {
            state = TaskState::Completed;
        }
        if state == TaskState::Completed && effective_date < today {
            state = TaskState::Archived;
        }

        let cutoff = today.checked_sub_days(Days::new(u64::from(self.retention_days)));
        let delete =
            state == TaskState::Archived && cutoff.is_some_and(|cutoff| effective_date < cutoff);

        Disposition { state, delete }
    }
}
