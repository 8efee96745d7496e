use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use qualification_runner::errors::{QualificationError, Result};
use qualification_runner::exec::args::LOG_FILE_FLAG;
use qualification_runner::exec::{ProcessLauncher, RunningProcess, WaitOutcome};
use qualification_runner::types::ExitCode;
use tokio_util::sync::CancellationToken;

/// What a fake process does once launched.
#[derive(Debug, Clone)]
pub enum FakeBehaviour {
    /// Append `lines` to the log file given with `-l`, then exit with `code`
    /// after `delay`.
    Exit {
        code: i32,
        lines: Vec<String>,
        delay: Duration,
    },
    /// Never exit on its own; only cancellation ends the wait.
    Hang,
    /// Fail like a missing executable.
    NotFound,
}

impl FakeBehaviour {
    pub fn exit(code: i32) -> Self {
        FakeBehaviour::Exit {
            code,
            lines: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn exit_after_logging(code: i32, lines: &[&str]) -> Self {
        FakeBehaviour::Exit {
            code,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            delay: Duration::from_millis(150),
        }
    }
}

/// One recorded call to [`ProcessLauncher::launch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCall {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// A launcher that:
/// - records every program/argument list it is asked to start
/// - runs no real process, behaving as scripted by [`FakeBehaviour`]
/// - counts fake processes still alive, so tests can check release.
#[derive(Debug, Clone)]
pub struct FakeLauncher {
    behaviour: FakeBehaviour,
    calls: Arc<Mutex<Vec<LaunchCall>>>,
    alive: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(behaviour: FakeBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
            alive: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Vec<LaunchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_args(&self) -> Option<Vec<String>> {
        self.calls.lock().unwrap().last().map(|c| c.args.clone())
    }

    /// Fake processes launched and not yet dropped.
    pub fn alive(&self) -> usize {
        self.alive.load(Ordering::SeqCst)
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<Box<dyn RunningProcess>> {
        self.calls.lock().unwrap().push(LaunchCall {
            program: program.to_path_buf(),
            args: args.to_vec(),
        });

        if matches!(self.behaviour, FakeBehaviour::NotFound) {
            return Err(QualificationError::Launch {
                program: program.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let log_file = args
            .iter()
            .position(|a| a == LOG_FILE_FLAG)
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from);

        self.alive.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeProcess {
            behaviour: self.behaviour.clone(),
            log_file,
            alive: Arc::clone(&self.alive),
        }))
    }
}

struct FakeProcess {
    behaviour: FakeBehaviour,
    log_file: Option<PathBuf>,
    alive: Arc<AtomicUsize>,
}

impl Drop for FakeProcess {
    fn drop(&mut self) {
        self.alive.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeProcess {
    fn append_log(&self, lines: &[String]) {
        let Some(path) = &self.log_file else { return };
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("fake process could not open log file");
        for line in lines {
            writeln!(file, "{line}").expect("fake process could not write log line");
        }
    }
}

impl RunningProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        None
    }

    fn wait<'a>(
        &'a mut self,
        cancel: &'a CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<WaitOutcome>> + Send + 'a>>
    {
        Box::pin(async move {
            match self.behaviour.clone() {
                FakeBehaviour::Exit { code, lines, delay } => {
                    self.append_log(&lines);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => Ok(WaitOutcome::Cancelled),
                        _ = tokio::time::sleep(delay) => Ok(WaitOutcome::Exited(ExitCode(code))),
                    }
                }
                FakeBehaviour::Hang => {
                    cancel.cancelled().await;
                    Ok(WaitOutcome::Cancelled)
                }
                FakeBehaviour::NotFound => unreachable!("launch fails before a process exists"),
            }
        })
    }
}
