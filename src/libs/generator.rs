//! Periodic generation of recurring task instances.
//!
//! One [`Generator::sweep`] keeps recurring chores appearing even when nobody
//! completes them:
//!
//! 1. pick active definitions that were never generated or were last
//!    generated before the debounce threshold (23 hours by default),
//! 2. look up each candidate's most recently created instance,
//! 3. generate a new instance, stamped with the sweep time, when there is no
//!    instance yet or a full period has elapsed since the latest one.
//!
//! Both guards are needed: the debounce keeps back-to-back sweeps from firing
//! twice, the lookback keeps the sweep from duplicating an occurrence that a
//! completion already queued. Each definition is processed in its own
//! immediate transaction and recorded with a compare-and-set on
//! `last_generated`; a failure on one definition is logged and the sweep moves
//! on to the next.

use crate::db::recurring::RecurringTasks;
use crate::db::tasks::Tasks;
use crate::libs::error::ChoreResult;
use crate::libs::task::{NewTask, RecurringTask};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use tracing::{debug, error, info};

pub const DEFAULT_DEBOUNCE_HOURS: i64 = 23;

/// Counters for one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Definitions that passed the debounce filter.
    pub examined: usize,
    /// Ids of the instances created.
    pub generated: Vec<i64>,
    /// Not due yet, or another writer got there first.
    pub skipped: usize,
    pub failed: usize,
}

/// Result of processing one definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Created(i64),
    NotDue,
    /// `last_generated` changed or the definition was paused mid-sweep.
    Superseded,
}

pub struct Generator<'a> {
    conn: &'a Connection,
    debounce: Duration,
}

impl<'a> Generator<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Generator {
            conn,
            debounce: Duration::hours(DEFAULT_DEBOUNCE_HOURS),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn sweep(&self) -> ChoreResult<SweepReport> {
        self.sweep_at(Utc::now())
    }

    /// Runs one sweep as of `now`. Only the candidate query can fail the
    /// sweep as a whole. A debounce reaching past the earliest representable
    /// instant leaves only never-generated definitions as candidates.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> ChoreResult<SweepReport> {
        let threshold = now.checked_sub_signed(self.debounce).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let candidates = RecurringTasks::new(self.conn).due_for_sweep(threshold)?;
        let mut report = SweepReport {
            examined: candidates.len(),
            ..Default::default()
        };

        for definition in &candidates {
            match self.generate(definition, now) {
                Ok(Generation::Created(task_id)) => {
                    info!(definition_id = definition.id, task_id, title = %definition.title, "generated recurring task");
                    report.generated.push(task_id);
                }
                Ok(Generation::NotDue) => {
                    debug!(definition_id = definition.id, "recurring task not due");
                    report.skipped += 1;
                }
                Ok(Generation::Superseded) => {
                    debug!(definition_id = definition.id, "recurring task generated concurrently, skipping");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(definition_id = definition.id, error = %e, "error generating recurring task");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Applies the decision rule to a single definition, all or nothing.
    pub fn generate(&self, definition: &RecurringTask, now: DateTime<Utc>) -> ChoreResult<Generation> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let tasks = Tasks::new(&tx);

        let due = match tasks.latest_for_parent(definition.id)? {
            None => true,
            Some(last) => definition.recurrence().is_elapsed(last.created_at, now),
        };
        if !due {
            return Ok(Generation::NotDue);
        }

        let task_id = tasks.insert(&NewTask::from_definition(definition, now))?;
        if !RecurringTasks::new(&tx).mark_generated(definition.id, definition.last_generated, now)? {
            return Ok(Generation::Superseded);
        }

        tx.commit()?;
        Ok(Generation::Created(task_id))
    }
}
