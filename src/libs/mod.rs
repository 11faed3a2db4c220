//! Core library modules for choreboard.
//!
//! - **Domain**: members, tasks, recurring definitions, the point ledger
//! - **Operations**: accounts, household chores, completion, generation
//! - **Infrastructure**: configuration, data storage, messages, views
//! - **Background work**: the scheduler and its daemon process
//!
//! ## Usage
//!
//! ```rust,no_run
//! use choreboard::db::db::Db;
//! use choreboard::libs::household::Household;
//!
//! let db = Db::new()?;
//! let completion = Household::new(&db.conn).complete_task(1, 12, None)?;
//! println!("+{} points", completion.points);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod access;
pub mod accounts;
pub mod completion;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod error;
pub mod generator;
pub mod household;
pub mod messages;
pub mod recurrence;
pub mod scheduler;
pub mod stats;
pub mod task;
pub mod user;
pub mod validation;
pub mod view;
