//! Recurring task definition storage.
//!
//! `last_generated` is written by both the completion path and the periodic
//! sweep. The sweep updates it with a compare-and-set ([`RecurringTasks::mark_generated`])
//! so a concurrent completion is never silently overwritten.

use crate::libs::error::ChoreResult;
use crate::libs::task::{NewRecurringTask, RecurringTask, RecurringTaskView};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const RECURRING_COLUMNS: &str = "rt.id, rt.title, rt.description, rt.points, rt.created_by, rt.assigned_to, rt.recurrence_type, \
     rt.recurrence_value, rt.is_active, rt.created_at, rt.last_generated";

const INSERT_RECURRING: &str = "INSERT INTO recurring_tasks (title, description, points, created_by, assigned_to, recurrence_type, recurrence_value, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const TOGGLE_ACTIVE: &str = "UPDATE recurring_tasks SET is_active = NOT is_active WHERE id = ?1";
const TOUCH_GENERATED: &str = "UPDATE recurring_tasks SET last_generated = ?2 WHERE id = ?1";
const MARK_GENERATED: &str =
    "UPDATE recurring_tasks SET last_generated = ?2 WHERE id = ?1 AND is_active = TRUE AND last_generated IS ?3";

pub struct RecurringTasks<'a> {
    conn: &'a Connection,
}

impl<'a> RecurringTasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        RecurringTasks { conn }
    }

    pub fn insert(&self, task: &NewRecurringTask) -> ChoreResult<i64> {
        self.conn.execute(
            INSERT_RECURRING,
            params![
                task.title,
                task.description,
                task.points,
                task.created_by,
                task.assigned_to,
                task.recurrence.kind,
                task.recurrence.value,
                task.created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, id: i64) -> ChoreResult<Option<RecurringTask>> {
        let sql = format!("SELECT {} FROM recurring_tasks rt WHERE rt.id = ?1", RECURRING_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], map_recurring).optional()?)
    }

    /// Flips `is_active` and returns the updated definition.
    pub fn toggle(&self, id: i64) -> ChoreResult<Option<RecurringTask>> {
        if self.conn.execute(TOGGLE_ACTIVE, [id])? == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    /// Active definitions never generated, or last generated before `threshold`.
    pub fn due_for_sweep(&self, threshold: DateTime<Utc>) -> ChoreResult<Vec<RecurringTask>> {
        let sql = format!(
            "SELECT {} FROM recurring_tasks rt
             WHERE rt.is_active = TRUE AND (rt.last_generated IS NULL OR rt.last_generated < ?1)
             ORDER BY rt.id",
            RECURRING_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let definitions = stmt.query_map([threshold], map_recurring)?.collect::<Result<Vec<_>, _>>()?;
        Ok(definitions)
    }

    /// Sets `last_generated` to `at` only if it still equals `previous` and the
    /// definition is still active. Returns whether the update won.
    pub fn mark_generated(&self, id: i64, previous: Option<DateTime<Utc>>, at: DateTime<Utc>) -> ChoreResult<bool> {
        Ok(self.conn.execute(MARK_GENERATED, params![id, at, previous])? > 0)
    }

    /// Unconditional `last_generated` update, used inside the completion
    /// transaction which already holds the write lock.
    pub fn touch_generated(&self, id: i64, at: DateTime<Utc>) -> ChoreResult<bool> {
        Ok(self.conn.execute(TOUCH_GENERATED, params![id, at])? > 0)
    }

    /// Definitions newest first with member names joined in.
    pub fn list_with_names(&self, include_inactive: bool) -> ChoreResult<Vec<RecurringTaskView>> {
        let filter = if include_inactive { "" } else { "WHERE rt.is_active = TRUE" };
        let sql = format!(
            "SELECT {}, u1.name, u2.name
             FROM recurring_tasks rt
             LEFT JOIN users u1 ON rt.created_by = u1.id
             LEFT JOIN users u2 ON rt.assigned_to = u2.id
             {}
             ORDER BY rt.created_at DESC, rt.id DESC",
            RECURRING_COLUMNS, filter
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let views = stmt
            .query_map([], |row| {
                Ok(RecurringTaskView {
                    task: map_recurring(row)?,
                    created_by_name: row.get(11)?,
                    assigned_to_name: row.get(12)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }
}

fn map_recurring(row: &Row) -> rusqlite::Result<RecurringTask> {
    Ok(RecurringTask {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        points: row.get(3)?,
        created_by: row.get(4)?,
        assigned_to: row.get(5)?,
        recurrence_type: row.get(6)?,
        recurrence_value: row.get(7)?,
        is_active: row.get(8)?,
        created_at: row.get(9)?,
        last_generated: row.get(10)?,
    })
}
