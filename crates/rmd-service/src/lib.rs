//! # rmd-service
//!
//! Orchestration layer for Remind: validated task creation and updates,
//! the reminder scan, and the retention sweep.
//!
//! Each orchestrator takes its collaborators (`TaskDb`, a `Mailer`) by
//! reference so tests can substitute an in-memory store and a capturing
//! mailer. The scan and sweep decisions themselves are pure planning
//! functions over a task snapshot; the orchestrators only load, plan, and
//! apply.

pub mod error;
pub mod scanner;
pub mod sweeper;
pub mod tasks;

pub use error::ServiceError;
pub use scanner::{DueReminder, ReminderScanner, ScanOutcome, plan_scan};
pub use sweeper::{RetentionSweeper, plan_sweep};
pub use tasks::{CreateTaskRequest, CreatedTask, TaskService};
