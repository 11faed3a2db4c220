//! Background driver for the periodic generator.
//!
//! A [`Scheduler`] owns one tokio task that waits for the configured startup
//! delay, then runs a [`Generator`] sweep on every interval tick until it is
//! stopped. Sweeps are synchronous SQLite work and run on the blocking pool
//! against the shared database handle.
//!
//! ```rust,no_run
//! use choreboard::db::db::Db;
//! use choreboard::libs::config::SchedulerConfig;
//! use choreboard::libs::scheduler::Scheduler;
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let db = Arc::new(Mutex::new(Db::new()?));
//! let mut scheduler = Scheduler::new(db, SchedulerConfig::default());
//! scheduler.start();
//! // ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::db::Db;
use crate::libs::config::SchedulerConfig;
use crate::libs::generator::{Generator, SweepReport};
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Database handle shared between the scheduler task and its sweeps.
pub type SharedDb = Arc<Mutex<Db>>;

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct Scheduler {
    db: SharedDb,
    config: SchedulerConfig,
    running: Option<Running>,
}

impl Scheduler {
    pub fn new(db: SharedDb, config: SchedulerConfig) -> Self {
        Scheduler {
            db,
            config,
            running: None,
        }
    }

    /// Starts the sweep loop. Calling `start` on a running scheduler cancels
    /// the old loop and starts a fresh one, so there is never more than one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if let Some(previous) = self.running.take() {
            debug!("restarting scheduler");
            previous.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(self.db.clone(), self.config.clone(), cancel.clone()));
        self.running = Some(Running { cancel, handle });
        info!(
            interval_secs = self.config.interval_secs,
            startup_delay_secs = self.config.startup_delay_secs,
            "scheduler started"
        );
    }

    /// Stops the loop and waits for it to exit. A sweep already in progress
    /// finishes first.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(running) = self.running.take() {
            running.cancel.cancel();
            running.handle.await?;
            info!("scheduler stopped");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|r| !r.handle.is_finished())
    }
}

/// Runs one sweep on the blocking pool.
pub async fn run_sweep(db: SharedDb, debounce: chrono::Duration) -> Result<SweepReport> {
    let report = tokio::task::spawn_blocking(move || {
        let db = db.lock();
        Generator::new(&db.conn).with_debounce(debounce).sweep()
    })
    .await??;
    Ok(report)
}

async fn run_loop(db: SharedDb, config: SchedulerConfig, cancel: CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(config.startup_delay()) => {}
    }

    let mut interval = tokio::time::interval(config.interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                match run_sweep(db.clone(), config.debounce()).await {
                    Ok(report) => info!(
                        examined = report.examined,
                        generated = report.generated.len(),
                        skipped = report.skipped,
                        failed = report.failed,
                        "recurring task sweep finished"
                    ),
                    Err(e) => error!(error = %e, "recurring task sweep failed"),
                }
            }
        }
    }
}
