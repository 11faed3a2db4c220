//! Display implementation for choreboard messages.
//!
//! Every user-facing string lives in this one match, so wording stays
//! consistent across commands and the daemon. Parameters are interpolated
//! here rather than at the call site.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === USER MESSAGES ===
            Message::AdminRegistered(name) => {
                format!("Welcome, {}! As the first member you are the household administrator.", name)
            }
            Message::UserRegistered(name) => format!("Member '{}' registered", name),
            Message::UserPendingApproval => "An administrator has to approve the account before it can be used.".to_string(),
            Message::UserApproved(name) => format!("Member '{}' approved", name),
            Message::UserRevoked(name) => format!("Approval for '{}' revoked", name),
            Message::UserDeleted(id) => format!("Member {} deleted", id),
            Message::ScoresReset(count) => format!("Scores reset for {} members, point history cleared", count),
            Message::ConfirmResetScores => "Reset every member's points and clear the point history?".to_string(),
            Message::ResetCancelled => "Score reset cancelled".to_string(),
            Message::LeaderboardHeader => "Leaderboard".to_string(),
            Message::PendingUsersHeader => "Members waiting for approval".to_string(),
            Message::AllUsersHeader => "All members".to_string(),
            Message::NoUsersFound => "No members found".to_string(),
            Message::NoPendingUsers => "No members are waiting for approval".to_string(),
            Message::ActingUserRequired => {
                "This command needs an acting member: pass --user <id> or set CHOREBOARD_USER".to_string()
            }

            // === TASK MESSAGES ===
            Message::TaskCreated(id, title) => format!("Task {} '{}' created", id, title),
            Message::RecurringTaskCreated(id, title, schedule) => {
                format!("Recurring task {} '{}' created, repeats {}", id, title, schedule)
            }
            Message::TaskCompleted(name, points) => format!("Task completed by {}, +{} points", name, points),
            Message::NextOccurrenceQueued(id, due) => format!("Next occurrence queued as task {} for {}", id, due),
            Message::TasksHeader => "Tasks".to_string(),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::SuggestionsHeader(query) => format!("Suggestions for '{}'", query),
            Message::NoSuggestionsFound(query) => format!("No suggestions for '{}'", query),
            Message::RecurrenceValueRequired => "--every needs a count and a period, e.g. --every 2 weeks".to_string(),

            // === RECURRING MESSAGES ===
            Message::RecurringTasksHeader => "Recurring tasks".to_string(),
            Message::NoRecurringTasksFound => "No recurring tasks found".to_string(),
            Message::RecurringTaskResumed(title) => format!("Recurring task '{}' resumed", title),
            Message::RecurringTaskPaused(title) => format!("Recurring task '{}' paused", title),

            // === STATS MESSAGES ===
            Message::StatsHeader(window, since) => format!("Points, {} (since {})", window, since),
            Message::NoStatsFound => "No members to report on".to_string(),

            // === SCHEDULER MESSAGES ===
            Message::SchedulerStarted(pid) => format!("Scheduler started with PID: {}", pid),
            Message::SchedulerStopped(pid) => format!("Scheduler with PID {} stopped", pid),
            Message::SchedulerRunning(delay, interval) => {
                format!("Scheduler running: first sweep in {}s, then every {}s", delay, interval)
            }
            Message::SchedulerShuttingDown => "Scheduler shutting down".to_string(),
            Message::SchedulerExitedNormally => "Scheduler exited".to_string(),
            Message::SchedulerTaskPanicked(error) => format!("Scheduler task panicked: {}", error),
            Message::SchedulerNotRunning => "Scheduler is not running".to_string(),
            Message::SchedulerStoppingExisting(pid) => format!("Stopping running scheduler (PID {})", pid),
            Message::SchedulerFailedToStopExisting(error) => format!("Failed to stop running scheduler: {}", error),
            Message::SchedulerFailedToStop(pid) => format!("Scheduler with PID {} was not running", pid),
            Message::SchedulerReceivedSigterm => "Received SIGTERM".to_string(),
            Message::SchedulerReceivedSigint => "Received SIGINT".to_string(),
            Message::SchedulerReceivedCtrlC => "Received Ctrl+C".to_string(),
            Message::SchedulerCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::SignalHandlerFailed(error) => format!("Failed to install signal handler: {}", error),
            Message::SignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::SweepCompleted(examined, generated, skipped, failed) => format!(
                "Sweep finished: {} examined, {} generated, {} skipped, {} failed",
                examined, generated, skipped, failed
            ),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::DaemonModeNotSupported => "Daemon mode is not supported on this platform".to_string(),
            Message::ProcessTerminationNotSupported => "Process termination is not supported on this platform".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process, error code: {}", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process, error code: {}", code),
            Message::FailedToSignalProcess(pid, error) => format!("Failed to signal process {}: {}", pid, error),

            // === CONFIG MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigNotFound => "No configuration file to remove".to_string(),
            Message::ConfigModuleScheduler => "Scheduler settings".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptSchedulerInterval => "Seconds between sweeps".to_string(),
            Message::PromptSchedulerStartupDelay => "Seconds before the first sweep".to_string(),
            Message::PromptDebounceHours => "Hours before a definition is examined again".to_string(),
            Message::PromptDatabasePath => "Database file (empty for the default location)".to_string(),
            Message::PromptBusyTimeout => "Busy timeout in milliseconds".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(current, latest) => format!("Database version: {} (latest {})", current, latest),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::NoMigrationsApplied => "No migrations applied yet".to_string(),
            Message::NothingToRollback => "Nothing to rollback".to_string(),
            Message::RollingBack(from, to) => format!("Rolling back from v{} to v{}", from, to),
            Message::RollbackCompleted(version) => format!("Rollback to v{} completed", version),
        };

        write!(f, "{}", text)
    }
}
