//! Point ledger entries and the trailing windows used for statistics.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;
use std::fmt;

/// One immutable award in the point ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub task_id: Option<i64>,
    pub points: i64,
    pub earned_at: DateTime<Utc>,
}

/// Sum of a member's awards inside a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPoints {
    pub user_id: i64,
    pub name: String,
    pub points: i64,
}

/// Trailing statistics window, measured back from the start of the current
/// UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsWindow {
    Weekly,
    Monthly,
}

impl StatsWindow {
    pub fn days(&self) -> i64 {
        match self {
            StatsWindow::Weekly => 7,
            StatsWindow::Monthly => 30,
        }
    }

    /// Earliest `earned_at` counted for a window evaluated at `now`.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        midnight - Duration::days(self.days())
    }
}

impl fmt::Display for StatsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsWindow::Weekly => f.write_str("weekly"),
            StatsWindow::Monthly => f.write_str("monthly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 17, 23, 5).unwrap();
        assert_eq!(StatsWindow::Weekly.since(now), Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
        assert_eq!(StatsWindow::Monthly.since(now), Utc.with_ymd_and_hms(2025, 2, 8, 0, 0, 0).unwrap());
    }
}
