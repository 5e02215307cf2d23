//! Recurrence engine: due-ness checks and next-occurrence computation.
//!
//! Pure and total over valid rules. Due-ness is driven entirely by the stored
//! reference date matching "today"; the weekly anchor weekday never gates it.
//! Month and year advancement use chrono's calendar arithmetic, which clamps
//! to the last day of the target month (Jan 31 + 1 month = Feb 29 in leap
//! years, Feb 28 otherwise). That clamp rule is applied consistently for
//! monthly and yearly kinds.

use chrono::{Days, Months, NaiveDate};

use crate::enums::RecurrenceKind;
use crate::task::RecurrenceRule;

/// Whether a reminder anchored at `reference` is due on `today`.
///
/// `kind = None` is never due; every other kind is due exactly when the
/// reference date equals today.
#[must_use]
pub fn is_due_on(rule: &RecurrenceRule, reference: NaiveDate, today: NaiveDate) -> bool {
    match rule.kind {
        RecurrenceKind::None => false,
        _ => reference == today,
    }
}

/// The next date a reminder should fire after one anchored at `reference`.
///
/// Returns `None` for non-recurring rules and on calendar overflow (dates
/// beyond chrono's representable range).
#[must_use]
pub fn next_occurrence(rule: &RecurrenceRule, reference: NaiveDate) -> Option<NaiveDate> {
    match rule.kind {
        RecurrenceKind::None => None,
        RecurrenceKind::Daily => reference.succ_opt(),
        RecurrenceKind::Weekly => {
            let weeks = u64::from(rule.interval_weeks.max(1));
            reference.checked_add_days(Days::new(7 * weeks))
        }
        RecurrenceKind::Monthly => reference.checked_add_months(Months::new(1)),
        RecurrenceKind::Yearly => reference.checked_add_months(Months::new(12)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Weekday;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn none_is_never_due() {
        let rule = RecurrenceRule::none();
        let today = date(2025, 1, 6);
        assert!(!is_due_on(&rule, today, today));
        assert_eq!(next_occurrence(&rule, today), None);
    }

    #[test]
    fn due_only_when_reference_equals_today() {
        let today = date(2025, 1, 6);
        for rule in [
            RecurrenceRule::daily(),
            RecurrenceRule::weekly(Weekday::Monday, 1),
            RecurrenceRule::monthly(),
            RecurrenceRule::yearly(),
        ] {
            assert!(is_due_on(&rule, today, today));
            assert!(!is_due_on(&rule, date(2025, 1, 5), today));
            assert!(!is_due_on(&rule, date(2025, 1, 7), today));
        }
    }

    #[test]
    fn weekly_anchor_weekday_does_not_gate_dueness() {
        // Anchored on Monday, but the stored reference is a Thursday: still due.
        let rule = RecurrenceRule::weekly(Weekday::Monday, 1);
        let thursday = date(2025, 1, 9);
        assert!(is_due_on(&rule, thursday, thursday));
    }

    #[test]
    fn daily_advances_one_day() {
        let rule = RecurrenceRule::daily();
        assert_eq!(next_occurrence(&rule, date(2025, 1, 6)), Some(date(2025, 1, 7)));
        assert_eq!(
            next_occurrence(&rule, date(2024, 12, 31)),
            Some(date(2025, 1, 1))
        );
    }

    #[test]
    fn weekly_advances_by_interval() {
        let biweekly = RecurrenceRule::weekly(Weekday::Monday, 2);
        assert_eq!(
            next_occurrence(&biweekly, date(2025, 1, 6)),
            Some(date(2025, 1, 20))
        );
        let weekly = RecurrenceRule::weekly(Weekday::Friday, 1);
        assert_eq!(
            next_occurrence(&weekly, date(2025, 1, 3)),
            Some(date(2025, 1, 10))
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_shorter_month() {
        let rule = RecurrenceRule::monthly();
        // Leap-year February keeps the 29th.
        assert_eq!(
            next_occurrence(&rule, date(2024, 1, 31)),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            next_occurrence(&rule, date(2025, 1, 31)),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            next_occurrence(&rule, date(2024, 3, 31)),
            Some(date(2024, 4, 30))
        );
        // Mid-month days are unaffected.
        assert_eq!(
            next_occurrence(&rule, date(2024, 2, 15)),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn yearly_clamps_leap_day() {
        let rule = RecurrenceRule::yearly();
        assert_eq!(
            next_occurrence(&rule, date(2024, 2, 29)),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            next_occurrence(&rule, date(2024, 7, 4)),
            Some(date(2025, 7, 4))
        );
    }

    #[test]
    fn repeated_occurrences_never_decrease() {
        for rule in [
            RecurrenceRule::daily(),
            RecurrenceRule::weekly(Weekday::Monday, 3),
            RecurrenceRule::monthly(),
            RecurrenceRule::yearly(),
        ] {
            let mut current = date(2024, 1, 31);
            for _ in 0..48 {
                let next = next_occurrence(&rule, current).unwrap();
                assert!(next > current, "{rule:?} went backward: {current} -> {next}");
                current = next;
            }
        }
    }
}
