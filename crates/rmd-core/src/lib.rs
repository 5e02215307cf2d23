//! # rmd-core
//!
//! Core types and pure logic for Remind, the task-reminder backend.
//!
//! This crate provides the foundational pieces shared across all Remind crates:
//! - The `Task` entity and its recurrence rule
//! - State and recurrence enums with forward-only transitions
//! - The recurrence engine (due-ness and next-occurrence computation)
//! - The retention lifecycle state machine
//! - Cross-cutting error types
//!
//! Everything here is I/O-free; persistence and mail dispatch live in
//! `rmd-db` and `rmd-mailer`.

pub mod enums;
pub mod errors;
pub mod lifecycle;
pub mod recurrence;
pub mod task;

pub use enums::{RecurrenceKind, TaskState, Weekday};
pub use errors::CoreError;
pub use lifecycle::{Disposition, LifecyclePolicy};
pub use task::{RecurrenceRule, Task, reminder_sentinel};
