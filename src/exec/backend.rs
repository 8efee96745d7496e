// src/exec/backend.rs

//! Pluggable process launcher abstraction.
//!
//! The engine talks to a `ProcessLauncher` instead of spawning processes
//! directly. This makes it easy to swap in a fake launcher in tests while
//! keeping the production implementation in [`process`](super::process).
//!
//! - `TokioProcessLauncher` is the default implementation; it starts a real
//!   OS process through [`ProcessHandle`].
//! - Tests can provide their own launcher that, for example, records the
//!   argument list and reports a scripted exit code.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::errors::Result;

use super::process::{ProcessHandle, WaitOutcome};

/// A process that has been started and can be waited on.
pub trait RunningProcess: Send {
    /// OS process id, if the implementation has one.
    fn id(&self) -> Option<u32>;

    /// Wait for exit or cancellation. On cancellation the process must be
    /// terminated before the future resolves.
    fn wait<'a>(
        &'a mut self,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<WaitOutcome>> + Send + 'a>>;
}

/// Trait abstracting how the PK-Sim CLI is started.
pub trait ProcessLauncher: Send + Sync {
    /// Start `program` with `args`.
    ///
    /// Fails with [`QualificationError::Launch`](crate::errors::QualificationError::Launch)
    /// when the program cannot be started; no process exists in that case.
    fn launch(&self, program: &Path, args: &[String]) -> Result<Box<dyn RunningProcess>>;
}

impl RunningProcess for ProcessHandle {
    fn id(&self) -> Option<u32> {
        ProcessHandle::id(self)
    }

    fn wait<'a>(
        &'a mut self,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<WaitOutcome>> + Send + 'a>> {
        Box::pin(ProcessHandle::wait(self, cancel))
    }
}

/// Real launcher used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessLauncher;

impl ProcessLauncher for TokioProcessLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<Box<dyn RunningProcess>> {
        let handle = ProcessHandle::start(program, args)?;
        Ok(Box::new(handle))
    }
}
