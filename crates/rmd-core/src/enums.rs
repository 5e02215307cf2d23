//! Task state, recurrence kind, and weekday enums for Remind.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Numeric wire values are accepted where clients send them: state indices
//! `0..=2`, recurrence-kind indices `0..=4` (through `FromStr`), and
//! Monday-first weekday numbers `1..=7`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// TaskState
// ---------------------------------------------------------------------------

/// Lifecycle state of a task.
///
/// ```text
/// pending → completed → archived → (deleted, not stored)
/// ```
///
/// Transitions only move forward. Deletion is terminal and handled by the
/// retention sweeper, never stored as a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Completed,
    Archived,
}

impl TaskState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Completed],
            Self::Completed => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Stable numeric index (0 = pending, 1 = completed, 2 = archived).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Completed => 1,
            Self::Archived => 2,
        }
    }

    /// Resolve a numeric index back to a state.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Pending),
            1 => Some(Self::Completed),
            2 => Some(Self::Archived),
            _ => None,
        }
    }

    /// String representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RecurrenceKind
// ---------------------------------------------------------------------------

/// How often a task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceKind {
    /// String representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceKind {
    type Err = crate::CoreError;

    /// Parse a recurrence kind from its snake_case name, its numeric index,
    /// or the legacy frontend aliases (`noRepeat`, `day`, `week`, `month`,
    /// `year`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "noRepeat" | "0" | "" => Ok(Self::None),
            "daily" | "day" | "1" => Ok(Self::Daily),
            "weekly" | "week" | "2" => Ok(Self::Weekly),
            "monthly" | "month" | "3" => Ok(Self::Monthly),
            "yearly" | "year" | "4" => Ok(Self::Yearly),
            other => Err(crate::CoreError::Validation(format!(
                "unrecognized recurrence kind '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Day of week, Monday-first (1 = Monday .. 7 = Sunday).
///
/// Weekly recurrence stores its anchor weekday for display and validation;
/// due-ness is driven purely by the stored reminder date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Resolve a Monday-first number (1..=7) back to a weekday.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            7 => Some(Self::Sunday),
            _ => None,
        }
    }

    /// String representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
