//! Task instance storage.
//!
//! Instances are append-only apart from the one-way completion update. The
//! back-reference to a recurring definition (`parent_task_id`) is the only way
//! to find a definition's instances.

use crate::libs::error::ChoreResult;
use crate::libs::task::{NewTask, Task, TaskSuggestion, TaskView};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.points, t.created_by, t.assigned_to, t.completed, t.completed_by, \
     t.completed_at, t.created_at, t.is_recurring, t.recurrence_type, t.recurrence_value, t.parent_task_id";

const INSERT_TASK: &str = "INSERT INTO tasks (title, description, points, created_by, assigned_to, is_recurring, recurrence_type, recurrence_value, parent_task_id, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

/// Conditional so that only one of two racing completions can win.
const COMPLETE_TASK: &str =
    "UPDATE tasks SET completed = TRUE, completed_by = ?2, completed_at = ?3 WHERE id = ?1 AND completed = FALSE";

const SELECT_SUGGESTIONS: &str = "SELECT title, description, points, COUNT(*) AS usage_count, MAX(created_at) AS last_used
    FROM (
        SELECT title, description, points, created_at FROM tasks
        WHERE LOWER(title) LIKE LOWER(?1) ESCAPE '\\'
        UNION ALL
        SELECT title, description, points, created_at FROM recurring_tasks
        WHERE LOWER(title) LIKE LOWER(?1) ESCAPE '\\'
    )
    GROUP BY title, description, points
    ORDER BY usage_count DESC, last_used DESC
    LIMIT ?2";

pub struct Tasks<'a> {
    conn: &'a Connection,
}

impl<'a> Tasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Tasks { conn }
    }

    pub fn insert(&self, task: &NewTask) -> ChoreResult<i64> {
        let (kind, value) = match task.recurrence {
            Some(r) => (Some(r.kind), Some(r.value)),
            None => (None, None),
        };
        self.conn.execute(
            INSERT_TASK,
            params![
                task.title,
                task.description,
                task.points,
                task.created_by,
                task.assigned_to,
                task.recurrence.is_some(),
                kind,
                value,
                task.parent_task_id,
                task.created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, id: i64) -> ChoreResult<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks t WHERE t.id = ?1", TASK_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], map_task).optional()?)
    }

    /// Marks the task completed; `false` when it was already completed or
    /// does not exist.
    pub fn mark_completed(&self, id: i64, completed_by: i64, at: DateTime<Utc>) -> ChoreResult<bool> {
        Ok(self.conn.execute(COMPLETE_TASK, params![id, completed_by, at])? > 0)
    }

    /// Most recently created instance of a recurring definition.
    pub fn latest_for_parent(&self, parent_id: i64) -> ChoreResult<Option<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks t WHERE t.parent_task_id = ?1 ORDER BY t.created_at DESC, t.id DESC LIMIT 1",
            TASK_COLUMNS
        );
        Ok(self.conn.query_row(&sql, [parent_id], map_task).optional()?)
    }

    /// All instances of a recurring definition, oldest first.
    pub fn for_parent(&self, parent_id: i64) -> ChoreResult<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks t WHERE t.parent_task_id = ?1 ORDER BY t.created_at ASC, t.id ASC",
            TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt.query_map([parent_id], map_task)?.collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn count(&self) -> ChoreResult<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?)
    }

    /// Every instance, newest first, with member names joined in.
    pub fn list_with_names(&self) -> ChoreResult<Vec<TaskView>> {
        let sql = format!(
            "SELECT {}, u1.name, u2.name, u3.name
             FROM tasks t
             LEFT JOIN users u1 ON t.created_by = u1.id
             LEFT JOIN users u2 ON t.assigned_to = u2.id
             LEFT JOIN users u3 ON t.completed_by = u3.id
             ORDER BY t.created_at DESC, t.id DESC",
            TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let views = stmt
            .query_map([], |row| {
                Ok(TaskView {
                    task: map_task(row)?,
                    created_by_name: row.get(14)?,
                    assigned_to_name: row.get(15)?,
                    completed_by_name: row.get(16)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }

    /// Titles from tasks and recurring definitions containing `query`,
    /// ranked by how often they were used, then by recency.
    pub fn suggestions(&self, query: &str, limit: usize) -> ChoreResult<Vec<TaskSuggestion>> {
        let pattern = format!("%{}%", escape_like(query));
        let mut stmt = self.conn.prepare(SELECT_SUGGESTIONS)?;
        let suggestions = stmt
            .query_map(params![pattern, limit as i64], |row| {
                Ok(TaskSuggestion {
                    title: row.get(0)?,
                    description: row.get(1)?,
                    points: row.get(2)?,
                    usage_count: row.get(3)?,
                    last_used: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(suggestions)
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        points: row.get(3)?,
        created_by: row.get(4)?,
        assigned_to: row.get(5)?,
        completed: row.get(6)?,
        completed_by: row.get(7)?,
        completed_at: row.get(8)?,
        created_at: row.get(9)?,
        is_recurring: row.get(10)?,
        recurrence_type: row.get(11)?,
        recurrence_value: row.get(12)?,
        parent_task_id: row.get(13)?,
    })
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("dishes"), "dishes");
    }
}
