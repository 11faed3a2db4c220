//! Task instances, recurring task definitions and their creation inputs.

use crate::libs::recurrence::{Recurrence, RecurrenceType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One concrete, completable chore.
///
/// Once `completed` is set, `completed_by` and `completed_at` are set as well
/// and never change again. Instances spawned by a recurring definition keep a
/// copy of its schedule for display and point back to it via `parent_task_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub created_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub completed: bool,
    pub completed_by: Option<i64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_recurring: bool,
    pub recurrence_type: Option<RecurrenceType>,
    pub recurrence_value: Option<u32>,
    pub parent_task_id: Option<i64>,
}

impl Task {
    pub fn recurrence(&self) -> Option<Recurrence> {
        match (self.recurrence_type, self.recurrence_value) {
            (Some(kind), Some(value)) => Some(Recurrence { kind, value }),
            _ => None,
        }
    }
}

/// Insert payload for a task instance.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub created_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub recurrence: Option<Recurrence>,
    pub parent_task_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl NewTask {
    /// Next occurrence of a recurring definition, stamped `created_at`.
    pub fn from_definition(definition: &RecurringTask, created_at: DateTime<Utc>) -> Self {
        Self {
            title: definition.title.clone(),
            description: definition.description.clone(),
            points: definition.points,
            created_by: definition.created_by,
            assigned_to: definition.assigned_to,
            recurrence: Some(definition.recurrence()),
            parent_task_id: Some(definition.id),
            created_at,
        }
    }
}

/// Task row enriched with member names for listings.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub created_by_name: Option<String>,
    pub assigned_to_name: Option<String>,
    pub completed_by_name: Option<String>,
}

/// Persisted template of a repeating chore.
///
/// The definition never tracks its instances; they are looked up by
/// `parent_task_id`. Schedules are never edited in place, only paused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringTask {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub created_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub recurrence_type: RecurrenceType,
    pub recurrence_value: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_generated: Option<DateTime<Utc>>,
}

impl RecurringTask {
    pub fn recurrence(&self) -> Recurrence {
        Recurrence {
            kind: self.recurrence_type,
            value: self.recurrence_value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRecurringTask {
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub created_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringTaskView {
    #[serde(flatten)]
    pub task: RecurringTask,
    pub created_by_name: Option<String>,
    pub assigned_to_name: Option<String>,
}

/// How a new chore should be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCreation {
    /// A one-off task.
    Simple,
    /// A recurring definition plus its first instance.
    Recurring(Recurrence),
}

/// Validated creation request; see [`crate::libs::validation::TaskInput`].
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub assigned_to: i64,
    pub creation: TaskCreation,
}

/// Autocomplete entry aggregated over tasks and definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSuggestion {
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub usage_count: i64,
    pub last_used: DateTime<Utc>,
}
