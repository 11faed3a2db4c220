//! Recurrence periods and the date arithmetic behind recurring chores.
//!
//! A recurring chore repeats every `value` periods of one [`RecurrenceType`].
//! Two questions are answered here and nowhere else:
//!
//! - **When is the next occurrence due?** ([`Recurrence::next_due`]) Days and
//!   weeks advance by a fixed elapsed duration (24h / 7 × 24h). Months advance
//!   the calendar month field and keep the day of month; when the target month
//!   is shorter the day is clamped to its last day, so Jan 31 + 1 month is
//!   Feb 28 (Feb 29 in leap years). Time of day is always preserved.
//! - **Has a full period elapsed since the last occurrence?**
//!   ([`Recurrence::is_elapsed`]) Days and weeks compare elapsed durations,
//!   months compare the calendar month difference and ignore the day.
//!
//! All arithmetic runs on UTC instants. A 23-hour sweep debounce combined with
//! daily chores approximates wall-clock periodicity; DST shifts of the
//! household's local time are not compensated.

use crate::libs::error::{ChoreError, ChoreResult};
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted period count.
pub const MIN_RECURRENCE_VALUE: u32 = 1;
/// Largest accepted period count.
pub const MAX_RECURRENCE_VALUE: u32 = 365;

/// Period unit of a recurring chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Days,
    Weeks,
    Months,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::Days => "days",
            RecurrenceType::Weeks => "weeks",
            RecurrenceType::Months => "months",
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceType {
    type Err = ChoreError;

    /// Unknown period names are rejected instead of silently becoming "1 day".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days" => Ok(RecurrenceType::Days),
            "weeks" => Ok(RecurrenceType::Weeks),
            "months" => Ok(RecurrenceType::Months),
            other => Err(ChoreError::validation(format!(
                "Unknown recurrence type '{}' (expected days, weeks or months)",
                other
            ))),
        }
    }
}

impl ToSql for RecurrenceType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecurrenceType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e: ChoreError| FromSqlError::Other(Box::new(e)))
    }
}

/// A validated schedule: every `value` × `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub kind: RecurrenceType,
    pub value: u32,
}

impl Recurrence {
    /// Builds a schedule, enforcing `1 <= value <= 365`.
    pub fn new(kind: RecurrenceType, value: u32) -> ChoreResult<Self> {
        if !(MIN_RECURRENCE_VALUE..=MAX_RECURRENCE_VALUE).contains(&value) {
            return Err(ChoreError::validation(format!(
                "Recurrence value must be between {} and {}, got {}",
                MIN_RECURRENCE_VALUE, MAX_RECURRENCE_VALUE, value
            )));
        }
        Ok(Self { kind, value })
    }

    /// Instant obtained by advancing `from` by `value` periods.
    ///
    /// Saturates at the maximum representable instant instead of panicking on
    /// overflow.
    pub fn next_due(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let value = i64::from(self.value);
        let advanced = match self.kind {
            RecurrenceType::Days => from.checked_add_signed(Duration::days(value)),
            RecurrenceType::Weeks => from.checked_add_signed(Duration::weeks(value)),
            RecurrenceType::Months => from.checked_add_months(Months::new(self.value)),
        };
        advanced.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn next_due_from_now(&self) -> DateTime<Utc> {
        self.next_due(Utc::now())
    }

    /// Whether a full period separates `last` from `now`.
    ///
    /// An occurrence stamped in the future (queued by a completion) never
    /// counts as elapsed.
    pub fn is_elapsed(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let value = i64::from(self.value);
        match self.kind {
            RecurrenceType::Days => now.signed_duration_since(last) >= Duration::days(value),
            RecurrenceType::Weeks => now.signed_duration_since(last) >= Duration::weeks(value),
            RecurrenceType::Months => months_between(last, now) >= value,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} {}", self.value, self.kind)
    }
}

/// Calendar month difference, ignoring the day of month.
fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn every(kind: RecurrenceType, value: u32) -> Recurrence {
        Recurrence::new(kind, value).unwrap()
    }

    #[test]
    fn days_add_fixed_duration() {
        let next = every(RecurrenceType::Days, 3).next_due(at(2025, 3, 1, 8, 30));
        assert_eq!(next, at(2025, 3, 4, 8, 30));
    }

    #[test]
    fn two_weeks_equal_fourteen_days() {
        let from = at(2025, 6, 10, 19, 45);
        let weeks = every(RecurrenceType::Weeks, 2).next_due(from);
        let days = every(RecurrenceType::Days, 14).next_due(from);
        assert_eq!(weeks, days);
        assert_eq!(weeks - from, Duration::days(14));
    }

    #[test]
    fn next_due_from_now_counts_from_the_current_instant() {
        let weekly = every(RecurrenceType::Weeks, 1);
        let before = Utc::now();
        let next = weekly.next_due_from_now();
        let after = Utc::now();
        assert!(next >= before + Duration::weeks(1));
        assert!(next <= after + Duration::weeks(1));
    }

    #[test]
    fn month_end_clamps_to_shorter_month() {
        let monthly = every(RecurrenceType::Months, 1);
        assert_eq!(monthly.next_due(at(2025, 1, 31, 10, 0)), at(2025, 2, 28, 10, 0));
        assert_eq!(monthly.next_due(at(2024, 1, 31, 10, 0)), at(2024, 2, 29, 10, 0));
        assert_eq!(monthly.next_due(at(2025, 3, 31, 10, 0)), at(2025, 4, 30, 10, 0));
    }

    #[test]
    fn months_keep_day_when_valid() {
        assert_eq!(every(RecurrenceType::Months, 2).next_due(at(2025, 1, 31, 7, 0)), at(2025, 3, 31, 7, 0));
        assert_eq!(every(RecurrenceType::Months, 1).next_due(at(2025, 12, 15, 7, 0)), at(2026, 1, 15, 7, 0));
    }

    #[test]
    fn unknown_type_is_a_validation_error() {
        let err = "fortnights".parse::<RecurrenceType>().unwrap_err();
        assert!(matches!(err, ChoreError::Validation(_)));
        assert_eq!("Weeks".parse::<RecurrenceType>().unwrap(), RecurrenceType::Weeks);
    }

    #[test]
    fn value_range_is_enforced() {
        assert!(Recurrence::new(RecurrenceType::Days, 0).is_err());
        assert!(Recurrence::new(RecurrenceType::Days, 366).is_err());
        assert!(Recurrence::new(RecurrenceType::Days, 365).is_ok());
    }

    #[test]
    fn elapsed_days_compares_duration() {
        let daily = every(RecurrenceType::Days, 1);
        let last = at(2025, 5, 1, 12, 0);
        assert!(!daily.is_elapsed(last, at(2025, 5, 2, 11, 59)));
        assert!(daily.is_elapsed(last, at(2025, 5, 2, 12, 0)));
    }

    #[test]
    fn elapsed_months_ignores_day_of_month() {
        let monthly = every(RecurrenceType::Months, 1);
        assert!(monthly.is_elapsed(at(2025, 1, 31, 0, 0), at(2025, 2, 1, 0, 0)));
        assert!(!monthly.is_elapsed(at(2025, 2, 1, 0, 0), at(2025, 2, 28, 23, 0)));
        assert!(monthly.is_elapsed(at(2024, 12, 20, 0, 0), at(2025, 1, 2, 0, 0)));
    }

    #[test]
    fn future_occurrence_is_never_elapsed() {
        let now = at(2025, 5, 1, 12, 0);
        let queued = every(RecurrenceType::Days, 1).next_due(now);
        assert!(!every(RecurrenceType::Days, 1).is_elapsed(queued, now));
        assert!(!every(RecurrenceType::Months, 1).is_elapsed(at(2025, 6, 1, 12, 0), now));
    }
}
