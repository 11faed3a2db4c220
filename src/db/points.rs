//! Append-only point ledger and windowed statistics.

use crate::libs::error::ChoreResult;
use crate::libs::stats::{PointEntry, UserPoints};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

const INSERT_ENTRY: &str = "INSERT INTO point_history (user_id, task_id, points, earned_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_FOR_USER: &str =
    "SELECT id, user_id, task_id, points, earned_at FROM point_history WHERE user_id = ?1 ORDER BY earned_at ASC, id ASC";
const SELECT_FOR_TASK: &str =
    "SELECT id, user_id, task_id, points, earned_at FROM point_history WHERE task_id = ?1 ORDER BY id ASC";
const CLEAR_HISTORY: &str = "DELETE FROM point_history";

/// Every member appears, with zero when nothing was earned in the window.
const SELECT_TOTALS_SINCE: &str = "SELECT u.id, u.name, COALESCE(SUM(ph.points), 0) AS total
    FROM users u
    LEFT JOIN point_history ph ON u.id = ph.user_id AND ph.earned_at >= ?1
    GROUP BY u.id, u.name
    ORDER BY total DESC, u.name ASC";

pub struct PointHistory<'a> {
    conn: &'a Connection,
}

impl<'a> PointHistory<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        PointHistory { conn }
    }

    pub fn append(&self, user_id: i64, task_id: i64, points: i64, earned_at: DateTime<Utc>) -> ChoreResult<i64> {
        self.conn.execute(INSERT_ENTRY, params![user_id, task_id, points, earned_at])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn for_user(&self, user_id: i64) -> ChoreResult<Vec<PointEntry>> {
        self.collect(SELECT_FOR_USER, user_id)
    }

    pub fn for_task(&self, task_id: i64) -> ChoreResult<Vec<PointEntry>> {
        self.collect(SELECT_FOR_TASK, task_id)
    }

    pub fn totals_since(&self, since: DateTime<Utc>) -> ChoreResult<Vec<UserPoints>> {
        let mut stmt = self.conn.prepare(SELECT_TOTALS_SINCE)?;
        let totals = stmt
            .query_map([since], |row| {
                Ok(UserPoints {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    points: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(totals)
    }

    /// Removes the whole ledger. Only the score reset calls this, inside the
    /// same transaction that zeroes user points.
    pub fn clear(&self) -> ChoreResult<usize> {
        Ok(self.conn.execute(CLEAR_HISTORY, [])?)
    }

    fn collect(&self, sql: &str, id: i64) -> ChoreResult<Vec<PointEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt
            .query_map([id], |row| {
                Ok(PointEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    task_id: row.get(2)?,
                    points: row.get(3)?,
                    earned_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
