//! Database layer for choreboard.
//!
//! SQLite persistence for members, task instances, recurring definitions and
//! the point ledger. Repositories borrow a [`rusqlite::Connection`]; because a
//! `Transaction` dereferences to a connection, the same repositories serve
//! both plain reads and the multi-table writes of task completion and the
//! recurring sweep.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use choreboard::db::{db::Db, tasks::Tasks};
//!
//! let db = Db::new()?;
//! let open_tasks = Tasks::new(&db.conn).list_with_names()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection management, path resolution and pragma setup.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Point ledger and statistics aggregation.
pub mod points;

/// Recurring task definitions.
pub mod recurring;

/// Task instances.
pub mod tasks;

/// Household members.
pub mod users;
