use std::process::{Child, ExitStatus};

use tracing::debug;

use crate::error::ExecError;

/// Reported for abnormal termination and for anything that kept a command
/// from running at all (`-1` truncated to a byte).
pub const FAILURE_STATUS: i32 = 255;

/// Convert an OS process status into the shell's exit code.
///
/// Normal exits report the program's own code; a process killed by a signal
/// reports [`FAILURE_STATUS`].
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            debug!(signal, "process terminated by signal");
        }
    }

    FAILURE_STATUS
}

/// One entry per stage the coordinator attempted.
#[derive(Debug)]
pub enum StageProcess {
    Running(Child),
    /// The program could not be found; no process exists to wait for.
    NotLaunched,
}

/// Wait for every process in `processes` and return the status of the last one.
///
/// Earlier statuses are collected and discarded. Every child is waited for
/// even if an earlier wait fails; the first such failure is returned.
pub fn reap(processes: Vec<StageProcess>) -> Result<i32, ExecError> {
    let mut last = FAILURE_STATUS;
    let mut first_error = None;

    for process in processes {
        last = match process {
            StageProcess::Running(mut child) => {
                let pid = child.id();
                match child.wait() {
                    Ok(status) => {
                        let code = exit_code(status);
                        debug!(pid, code, "reaped stage");
                        code
                    }
                    Err(source) => {
                        first_error.get_or_insert(ExecError::Wait { pid, source });
                        FAILURE_STATUS
                    }
                }
            }
            StageProcess::NotLaunched => FAILURE_STATUS,
        };
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(last),
    }
}
