//! Task completion: awarding points and chaining recurring chores.
//!
//! Completing an instance is one `BEGIN IMMEDIATE` transaction:
//!
//! 1. mark the instance completed (conditional on it not being completed yet),
//! 2. add the instance's points to the completing member,
//! 3. append a point ledger entry,
//! 4. for an instance spawned by a recurring definition, queue the next
//!    instance stamped one period after the completion and record the
//!    generation on the definition.
//!
//! Either all four steps land or none does. Of two racing completions of the
//! same instance exactly one succeeds; the other gets a conflict and nothing
//! is awarded twice.

use crate::db::points::PointHistory;
use crate::db::recurring::RecurringTasks;
use crate::db::tasks::Tasks;
use crate::db::users::Users;
use crate::libs::error::{ChoreError, ChoreResult};
use crate::libs::task::{NewTask, Task};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{info, warn};

/// What a successful completion did.
#[derive(Debug, Clone)]
pub struct Completion {
    pub task_id: i64,
    pub completed_by: i64,
    pub points: i64,
    pub completed_at: DateTime<Utc>,
    /// Next occurrence queued for a recurring chore.
    pub next_task: Option<Task>,
}

pub struct CompletionProcessor<'a> {
    conn: &'a Connection,
}

impl<'a> CompletionProcessor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        CompletionProcessor { conn }
    }

    pub fn complete(&self, task_id: i64, completed_by: i64) -> ChoreResult<Completion> {
        self.complete_at(task_id, completed_by, Utc::now())
    }

    pub fn complete_at(&self, task_id: i64, completed_by: i64, now: DateTime<Utc>) -> ChoreResult<Completion> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let tasks = Tasks::new(&tx);
        let task = tasks.get(task_id)?.ok_or_else(|| ChoreError::not_found("Task", task_id))?;
        if task.completed {
            return Err(already_completed(task_id));
        }

        let users = Users::new(&tx);
        if !users.exists(completed_by)? {
            return Err(ChoreError::not_found("User", completed_by));
        }

        if !tasks.mark_completed(task_id, completed_by, now)? {
            return Err(already_completed(task_id));
        }
        users.add_points(completed_by, task.points)?;
        PointHistory::new(&tx).append(completed_by, task_id, task.points, now)?;

        let next_task = match (task.is_recurring, task.parent_task_id) {
            (true, Some(parent_id)) => queue_next(&tx, parent_id, now)?,
            _ => None,
        };

        tx.commit()?;

        info!(task_id, completed_by, points = task.points, "task completed");
        Ok(Completion {
            task_id,
            completed_by,
            points: task.points,
            completed_at: now,
            next_task,
        })
    }
}

/// Inserts the next instance of `parent_id`, due one period after `now`.
fn queue_next(tx: &Transaction, parent_id: i64, now: DateTime<Utc>) -> ChoreResult<Option<Task>> {
    let definitions = RecurringTasks::new(tx);
    let Some(definition) = definitions.get(parent_id)? else {
        warn!(parent_id, "recurring definition missing, next occurrence not queued");
        return Ok(None);
    };

    let due = definition.recurrence().next_due(now);
    let tasks = Tasks::new(tx);
    let next_id = tasks.insert(&NewTask::from_definition(&definition, due))?;
    definitions.touch_generated(parent_id, now)?;

    info!(parent_id, next_id, due = %due, "queued next recurring occurrence");
    tasks.get(next_id)
}

fn already_completed(task_id: i64) -> ChoreError {
    ChoreError::conflict(format!("Task {} is already completed", task_id))
}
