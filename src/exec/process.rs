// src/exec/process.rs

//! Handle around a single PK-Sim CLI process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{QualificationError, Result};
use crate::types::ExitCode;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// How a wait on the process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The process terminated on its own (or was killed by someone else).
    Exited(ExitCode),
    /// The cancellation token fired first; the process has been killed and
    /// reaped.
    Cancelled,
}

/// A started OS process.
///
/// The child is spawned with `kill_on_drop(true)`, so dropping the handle on
/// any path (error, panic, dropped future) never leaves the process running.
#[derive(Debug)]
pub struct ProcessHandle {
    program: PathBuf,
    child: Child,
    pid: Option<u32>,
}

impl ProcessHandle {
    /// Start `program` with `args`, each passed as a discrete argument.
    ///
    /// No console window is shown, stdin is closed and stdout/stderr are
    /// drained into debug logs so the pipes never fill up.
    pub fn start(program: &Path, args: &[String]) -> Result<Self> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let mut child = cmd.spawn().map_err(|source| QualificationError::Launch {
            program: program.to_path_buf(),
            source,
        })?;

        let pid = child.id();
        info!(program = ?program, pid, ?args, "started PK-Sim CLI process");

        if let Some(stdout) = child.stdout.take() {
            drain_lines(stdout, pid, "stdout");
        }
        if let Some(stderr) = child.stderr.take() {
            drain_lines(stderr, pid, "stderr");
        }

        Ok(Self {
            program: program.to_path_buf(),
            child,
            pid,
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Wait until the process exits or `cancel` fires, whichever is first.
    ///
    /// On cancellation the process is killed and reaped before returning. If
    /// it had already exited by then, it is left alone.
    pub async fn wait(&mut self, cancel: &CancellationToken) -> Result<WaitOutcome> {
        tokio::select! {
            status = self.child.wait() => {
                let status = status.map_err(QualificationError::Wait)?;
                let code = ExitCode::from_status(status);
                info!(
                    pid = self.pid,
                    exit_code = %code,
                    success = code.is_success(),
                    "PK-Sim CLI process exited"
                );
                Ok(WaitOutcome::Exited(code))
            }

            _ = cancel.cancelled() => {
                self.terminate().await;
                Ok(WaitOutcome::Cancelled)
            }
        }
    }

    /// Kill the process if it is still running and reap it.
    pub async fn terminate(&mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    pid = self.pid,
                    exit_code = %ExitCode::from_status(status),
                    "process already exited; nothing to kill"
                );
            }
            Ok(None) => {
                info!(pid = self.pid, "killing PK-Sim CLI process");
                if let Err(e) = self.child.kill().await {
                    warn!(pid = self.pid, error = %e, "failed to kill PK-Sim CLI process");
                }
            }
            Err(e) => {
                warn!(pid = self.pid, error = %e, "could not query process state before kill");
                let _ = self.child.kill().await;
            }
        }
    }
}

fn drain_lines<R>(reader: R, pid: Option<u32>, stream: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(target: "pksim", pid, stream, "{}", line);
        }
    });
}
