//! Scheduler process management.
//!
//! `scheduler run` keeps a [`Scheduler`] alive in the foreground until SIGTERM,
//! SIGINT or Ctrl+C. `scheduler start` re-executes the binary detached as
//! `scheduler run` and records its PID; `scheduler stop` terminates it.

use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::scheduler::Scheduler;
use crate::{msg_bail_anyhow, msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const PID_FILE: &str = "choreboard-scheduler.pid";

/// Runs the scheduler over `db` until a shutdown signal arrives.
pub async fn run_with_signal_handling(db: Db) -> Result<()> {
    let config = Config::read()?.scheduler.unwrap_or_default();
    let db = Arc::new(Mutex::new(db));
    let mut scheduler = Scheduler::new(db, config.clone());

    let shutdown = shutdown_signal()?;

    scheduler.start();
    msg_info!(Message::SchedulerRunning(config.startup_delay_secs, config.interval_secs));

    shutdown.await;
    msg_info!(Message::SchedulerShuttingDown);

    match scheduler.stop().await {
        Ok(()) => {
            msg_info!(Message::SchedulerExitedNormally);
        }
        Err(e) => {
            msg_error!(Message::SchedulerTaskPanicked(e.to_string()));
        }
    }

    remove_own_pid_file()?;
    Ok(())
}

/// Installs the shutdown handlers. The returned future resolves once a
/// shutdown signal arrives.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).map_err(|e| msg_error_anyhow!(Message::SignalHandlerFailed(e.to_string())))?;
    let mut sigint = signal(SignalKind::interrupt()).map_err(|e| msg_error_anyhow!(Message::SignalHandlerFailed(e.to_string())))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                msg_info!(Message::SchedulerReceivedSigterm);
            }
            _ = sigint.recv() => {
                msg_info!(Message::SchedulerReceivedSigint);
            }
        }
    })
}

#[cfg(windows)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                msg_info!(Message::SchedulerReceivedCtrlC);
            }
            Err(e) => {
                // Still stoppable through `scheduler stop`.
                msg_error!(Message::SchedulerCtrlCListenFailed(e.to_string()));
                std::future::pending::<()>().await;
            }
        }
    })
}

#[cfg(not(any(unix, windows)))]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    msg_warning!(Message::SignalHandlingNotSupported);
    Ok(std::future::pending::<()>())
}

/// Starts the scheduler as a detached background process, replacing one that
/// is already running. `db_path` is forwarded to the child.
pub fn spawn(db_path: Option<&Path>) -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;

    if pid_path.exists() {
        if let Ok(pid_str) = std::fs::read_to_string(&pid_path) {
            msg_info!(Message::SchedulerStoppingExisting(pid_str.trim().to_string()));
            if let Err(e) = stop_internal() {
                msg_warning!(Message::SchedulerFailedToStopExisting(e.to_string()));
                let _ = std::fs::remove_file(&pid_path);
            }
            std::thread::sleep(Duration::from_millis(500));
        }
    }

    let current_exe = std::env::current_exe()?;
    let mut args: Vec<OsString> = Vec::new();
    if let Some(path) = db_path {
        args.push("--db".into());
        args.push(path.as_os_str().to_owned());
    }
    args.push("scheduler".into());
    args.push("run".into());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let mut command = std::process::Command::new(current_exe);
        command.args(&args);
        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
        let child = command.spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::SchedulerStarted(pid));
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        let child = std::process::Command::new(current_exe)
            .args(&args)
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::SchedulerStarted(pid));
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = (pid_path, current_exe, args);
        msg_bail_anyhow!(Message::DaemonModeNotSupported);
    }

    Ok(())
}

/// Stops the background scheduler. Not running is not an error.
pub fn stop() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_info!(Message::SchedulerNotRunning);
        return Ok(());
    }
    stop_internal()
}

fn stop_internal() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    let pid = read_pid(&std::fs::read_to_string(&pid_path)?)?;

    let killed = kill_process(pid)?;
    std::fs::remove_file(pid_path)?;

    if killed {
        msg_info!(Message::SchedulerStopped(pid));
        Ok(())
    } else {
        msg_bail_anyhow!(Message::SchedulerFailedToStop(pid));
    }
}

fn read_pid(content: &str) -> Result<u32> {
    content.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))
}

/// Removes the PID file when it names this process.
fn remove_own_pid_file() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if let Ok(content) = std::fs::read_to_string(&pid_path) {
        if read_pid(&content).ok() == Some(std::process::id()) {
            let _ = std::fs::remove_file(&pid_path);
        }
    }
    Ok(())
}

#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid_i32 = i32::try_from(pid).map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;
    let target = Pid::from_raw(pid_i32);

    match kill(target, Signal::SIGTERM) {
        Ok(()) => {}
        Err(Errno::ESRCH) => return Ok(false),
        Err(e) => {
            msg_bail_anyhow!(Message::FailedToSignalProcess(pid, e.to_string()));
        }
    }

    // Up to a second for the current sweep to finish.
    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(100));
        if let Err(Errno::ESRCH) = kill(target, None) {
            return Ok(true);
        }
    }

    let _ = kill(target, Signal::SIGKILL);
    std::thread::sleep(Duration::from_millis(100));
    Ok(true)
}

#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            // ERROR_INVALID_PARAMETER: no such process
            if error == 87 {
                return Ok(false);
            }
            msg_bail_anyhow!(Message::FailedToOpenProcess(error));
        }

        let result = TerminateProcess(handle, 0);
        CloseHandle(handle);

        if result == 0 {
            msg_bail_anyhow!(Message::FailedToTerminateProcess(GetLastError()));
        }
        std::thread::sleep(Duration::from_millis(100));
        Ok(true)
    }
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    msg_bail_anyhow!(Message::ProcessTerminationNotSupported);
}

#[cfg(test)]
mod tests {
    use super::read_pid;
    #[cfg(unix)]
    use super::shutdown_signal;

    #[test]
    fn pid_file_content_is_trimmed() {
        assert_eq!(read_pid("4242\n").unwrap(), 4242);
        assert!(read_pid("not a pid").is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shutdown_waits_for_a_signal() {
        let shutdown = shutdown_signal().unwrap();
        let waited = tokio::time::timeout(std::time::Duration::from_millis(200), shutdown).await;
        assert!(waited.is_err());
    }
}
