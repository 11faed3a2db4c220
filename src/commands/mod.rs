//! Command-line interface.
//!
//! Every subcommand receives a [`Context`] carrying the global options: the
//! acting member (`--user`, or `CHOREBOARD_USER`) and an optional database
//! override (`--db`, or `CHOREBOARD_DB`).

pub mod init;
pub mod migrations;
pub mod recurring;
pub mod scheduler;
pub mod stats;
pub mod task;
pub mod user;

use crate::db::db::{Db, DB_PATH_ENV};
use crate::libs::config::Config;
use crate::libs::error::ChoreError;
use crate::libs::messages::Message;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Register, approve and manage household members")]
    User(user::UserArgs),
    #[command(about = "Create, list and complete tasks")]
    Task(task::TaskArgs),
    #[command(about = "Recurring task definitions")]
    Recurring(recurring::RecurringArgs),
    #[command(about = "Points earned over the last week or month")]
    Stats(stats::StatsArgs),
    #[command(about = "Generate due recurring tasks in the background")]
    Scheduler(scheduler::SchedulerArgs),
    #[command(about = "Database schema version and history")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Acting member id
    #[arg(long, global = true, env = "CHOREBOARD_USER")]
    user: Option<i64>,

    /// Database file to use instead of the configured one
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Global options shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub user: Option<i64>,
    pub db: Option<PathBuf>,
}

impl Context {
    pub fn open_db(&self) -> Result<Db> {
        match &self.db {
            Some(path) => Db::open_with(path, &Config::read()?.database.unwrap_or_default()),
            None => Db::new(),
        }
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => Db::resolve_path(&Config::read()?.database.unwrap_or_default()),
        }
    }

    /// The acting member; commands that check permissions need one.
    pub fn actor(&self) -> Result<i64> {
        self.user
            .ok_or_else(|| ChoreError::unauthorized(Message::ActingUserRequired.to_string()).into())
    }
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let ctx = Context {
            user: cli.user,
            db: cli.db,
        };

        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::User(args) => user::cmd(&ctx, args),
            Commands::Task(args) => task::cmd(&ctx, args),
            Commands::Recurring(args) => recurring::cmd(&ctx, args),
            Commands::Stats(args) => stats::cmd(&ctx, args),
            Commands::Scheduler(args) => scheduler::cmd(&ctx, args).await,
            Commands::Migrations(args) => migrations::cmd(&ctx, args),
        }
    }
}
