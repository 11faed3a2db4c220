//! # choreboard
//!
//! A command-line household chore tracker: members register and are approved
//! by an administrator, chores carry points, recurring chores keep coming
//! back, and completed work feeds a leaderboard and weekly/monthly statistics.
//!
//! ## Features
//!
//! - **Membership**: first member becomes admin, later members need approval
//! - **Tasks**: one-off and recurring chores with point values
//! - **Completion**: atomic point award with chaining of the next occurrence
//! - **Scheduler**: periodic generation of due recurring chores
//! - **Statistics**: leaderboard and trailing 7/30 day point totals
//!
//! ## Usage
//!
//! ```rust,no_run
//! use choreboard::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
