//! Helpers shared across command handlers.

use anyhow::Context;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Resolve the evaluation date: an explicit `--today` override or the local
/// calendar date.
pub fn resolve_today(override_value: Option<&str>) -> anyhow::Result<NaiveDate> {
    match override_value {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("invalid --today '{value}': expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parse a snake_case enum value the way it appears on the wire.
pub fn parse_enum<T: DeserializeOwned>(value: &str, field: &str) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .with_context(|| format!("invalid {field} '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rmd_core::TaskState;

    #[test]
    fn today_override_must_be_iso_date() {
        let parsed = resolve_today(Some("2025-01-06")).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert!(resolve_today(Some("06/01/2025")).is_err());
    }

    #[test]
    fn enum_values_parse_from_snake_case() {
        let state: TaskState = parse_enum("completed", "state").unwrap();
        assert_eq!(state, TaskState::Completed);
        assert!(parse_enum::<TaskState>("done", "state").is_err());
    }
}
