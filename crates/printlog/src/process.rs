//! Child processes bounded by a wall-clock timeout.

use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::runtime::Runtime;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {}s and was killed", .timeout.as_secs_f32())]
    Timeout { program: String, timeout: Duration },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed waiting on '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Single-threaded runtime used to drive child processes from sync code.
pub(crate) fn current_thread_runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Runs the command to completion and returns its stdout (lossy UTF-8).
///
/// Non-zero exits and timeouts are errors. On timeout the child is killed and
/// its pipes are abandoned, so a descendant holding them open cannot stall
/// the caller.
pub fn run_captured(cmd: Command, timeout: Duration) -> Result<String, ProcessError> {
    let rt = current_thread_runtime().map_err(ProcessError::Runtime)?;
    rt.block_on(run_captured_async(cmd, timeout))
}

async fn run_captured_async(cmd: Command, timeout: Duration) -> Result<String, ProcessError> {
    let mut cmd = TokioCommand::from(cmd);
    let program = cmd.as_std().get_program().to_string_lossy().to_string();

    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ProcessError::Spawn {
            program: program.clone(),
            source: e,
        })?;

    // Dropping the output future on timeout drops the child, which kills it.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| ProcessError::Wait {
            program: program.clone(),
            source: e,
        })?,
        Err(_) => return Err(ProcessError::Timeout { program, timeout }),
    };

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
