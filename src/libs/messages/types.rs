#[derive(Debug, Clone)]
pub enum Message {
    // === USER MESSAGES ===
    AdminRegistered(String),
    UserRegistered(String),
    UserPendingApproval,
    UserApproved(String),
    UserRevoked(String),
    UserDeleted(i64),
    ScoresReset(usize),
    ConfirmResetScores,
    ResetCancelled,
    LeaderboardHeader,
    PendingUsersHeader,
    AllUsersHeader,
    NoUsersFound,
    NoPendingUsers,
    ActingUserRequired,

    // === TASK MESSAGES ===
    TaskCreated(i64, String),
    RecurringTaskCreated(i64, String, String), // definition id, title, schedule
    TaskCompleted(String, i64),                // completer, points
    NextOccurrenceQueued(i64, String),         // task id, due date
    TasksHeader,
    NoTasksFound,
    SuggestionsHeader(String),
    NoSuggestionsFound(String),
    RecurrenceValueRequired,

    // === RECURRING MESSAGES ===
    RecurringTasksHeader,
    NoRecurringTasksFound,
    RecurringTaskResumed(String),
    RecurringTaskPaused(String),

    // === STATS MESSAGES ===
    StatsHeader(String, String), // window, since
    NoStatsFound,

    // === SCHEDULER MESSAGES ===
    SchedulerStarted(u32),
    SchedulerStopped(u32),
    SchedulerRunning(u64, u64), // startup delay, interval
    SchedulerShuttingDown,
    SchedulerExitedNormally,
    SchedulerTaskPanicked(String),
    SchedulerNotRunning,
    SchedulerStoppingExisting(String),
    SchedulerFailedToStopExisting(String),
    SchedulerFailedToStop(u32),
    SchedulerReceivedSigterm,
    SchedulerReceivedSigint,
    SchedulerReceivedCtrlC,
    SchedulerCtrlCListenFailed(String),
    SignalHandlerFailed(String),
    SignalHandlingNotSupported,
    SweepCompleted(usize, usize, usize, usize), // examined, generated, skipped, failed
    InvalidPidFileContent,
    DaemonModeNotSupported,
    ProcessTerminationNotSupported,
    FailedToOpenProcess(u32),
    FailedToTerminateProcess(u32),
    FailedToSignalProcess(u32, String),

    // === CONFIG MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleScheduler,
    ConfigModuleDatabase,
    PromptSelectModules,
    PromptSchedulerInterval,
    PromptSchedulerStartupDelay,
    PromptDebounceHours,
    PromptDatabasePath,
    PromptBusyTimeout,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32, u32), // current, latest
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    NoMigrationsApplied,
    NothingToRollback,
    RollingBack(u32, u32),
    RollbackCompleted(u32),
}
