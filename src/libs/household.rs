//! Chore operations available to approved household members.
//!
//! `Household` is the entry point the commands call: it checks the acting
//! member, then delegates to the repositories, the [`CompletionProcessor`] and
//! the recurrence helpers.

use crate::db::points::PointHistory;
use crate::db::recurring::RecurringTasks;
use crate::db::tasks::Tasks;
use crate::db::users::Users;
use crate::libs::access::Access;
use crate::libs::completion::{Completion, CompletionProcessor};
use crate::libs::error::{ChoreError, ChoreResult};
use crate::libs::stats::{StatsWindow, UserPoints};
use crate::libs::task::{
    NewRecurringTask, NewTask, RecurringTask, RecurringTaskView, Task, TaskCreation, TaskDraft, TaskSuggestion, TaskView,
};
use crate::libs::validation;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::info;

pub const SUGGESTION_LIMIT: usize = 10;

/// What `create_task` produced.
#[derive(Debug, Clone)]
pub enum CreatedTask {
    Simple(Task),
    /// The definition and its first instance.
    Recurring { definition: RecurringTask, first: Task },
}

impl CreatedTask {
    /// The instance visible in task listings.
    pub fn task(&self) -> &Task {
        match self {
            CreatedTask::Simple(task) => task,
            CreatedTask::Recurring { first, .. } => first,
        }
    }
}

pub struct Household<'a> {
    conn: &'a Connection,
}

impl<'a> Household<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Household { conn }
    }

    pub fn create_task(&self, actor: i64, draft: TaskDraft) -> ChoreResult<CreatedTask> {
        self.create_task_at(actor, draft, Utc::now())
    }

    pub fn create_task_at(&self, actor: i64, draft: TaskDraft, now: DateTime<Utc>) -> ChoreResult<CreatedTask> {
        Access::new(self.conn).approved(actor)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !Users::new(&tx).exists(draft.assigned_to)? {
            return Err(ChoreError::not_found("User", draft.assigned_to));
        }

        let tasks = Tasks::new(&tx);
        let created = match draft.creation {
            TaskCreation::Simple => {
                let id = tasks.insert(&NewTask {
                    title: draft.title,
                    description: draft.description,
                    points: draft.points,
                    created_by: Some(actor),
                    assigned_to: Some(draft.assigned_to),
                    recurrence: None,
                    parent_task_id: None,
                    created_at: now,
                })?;
                CreatedTask::Simple(load_task(&tasks, id)?)
            }
            TaskCreation::Recurring(recurrence) => {
                let definitions = RecurringTasks::new(&tx);
                let definition_id = definitions.insert(&NewRecurringTask {
                    title: draft.title,
                    description: draft.description,
                    points: draft.points,
                    created_by: Some(actor),
                    assigned_to: Some(draft.assigned_to),
                    recurrence,
                    created_at: now,
                })?;
                let definition = definitions
                    .get(definition_id)?
                    .ok_or_else(|| ChoreError::not_found("Recurring task", definition_id))?;
                let first_id = tasks.insert(&NewTask::from_definition(&definition, now))?;
                CreatedTask::Recurring {
                    definition,
                    first: load_task(&tasks, first_id)?,
                }
            }
        };
        tx.commit()?;

        info!(task_id = created.task().id, created_by = actor, recurring = created.task().is_recurring, "task created");
        Ok(created)
    }

    pub fn tasks(&self, actor: i64) -> ChoreResult<Vec<TaskView>> {
        Access::new(self.conn).approved(actor)?;
        Tasks::new(self.conn).list_with_names()
    }

    /// Completes `task_id` on behalf of `completed_by`, or of the actor when
    /// not given.
    pub fn complete_task(&self, actor: i64, task_id: i64, completed_by: Option<i64>) -> ChoreResult<Completion> {
        self.complete_task_at(actor, task_id, completed_by, Utc::now())
    }

    pub fn complete_task_at(
        &self,
        actor: i64,
        task_id: i64,
        completed_by: Option<i64>,
        now: DateTime<Utc>,
    ) -> ChoreResult<Completion> {
        Access::new(self.conn).approved(actor)?;
        let completed_by = validation::id("completed_by", completed_by.unwrap_or(actor))?;
        CompletionProcessor::new(self.conn).complete_at(task_id, completed_by, now)
    }

    pub fn suggestions(&self, actor: i64, query: &str) -> ChoreResult<Vec<TaskSuggestion>> {
        Access::new(self.conn).approved(actor)?;
        let query = validation::query(query)?;
        Tasks::new(self.conn).suggestions(&query, SUGGESTION_LIMIT)
    }

    pub fn recurring(&self, actor: i64, include_inactive: bool) -> ChoreResult<Vec<RecurringTaskView>> {
        Access::new(self.conn).approved(actor)?;
        RecurringTasks::new(self.conn).list_with_names(include_inactive)
    }

    /// Pauses or resumes a definition. Existing instances are left alone.
    pub fn toggle_recurring(&self, actor: i64, definition_id: i64) -> ChoreResult<RecurringTask> {
        Access::new(self.conn).approved(actor)?;
        let definition = RecurringTasks::new(self.conn)
            .toggle(definition_id)?
            .ok_or_else(|| ChoreError::not_found("Recurring task", definition_id))?;
        info!(definition_id, active = definition.is_active, "recurring task toggled");
        Ok(definition)
    }

    pub fn stats(&self, actor: i64, window: StatsWindow) -> ChoreResult<Vec<UserPoints>> {
        self.stats_at(actor, window, Utc::now())
    }

    pub fn stats_at(&self, actor: i64, window: StatsWindow, now: DateTime<Utc>) -> ChoreResult<Vec<UserPoints>> {
        Access::new(self.conn).approved(actor)?;
        PointHistory::new(self.conn).totals_since(window.since(now))
    }
}

fn load_task(tasks: &Tasks, id: i64) -> ChoreResult<Task> {
    tasks.get(id)?.ok_or_else(|| ChoreError::not_found("Task", id))
}
