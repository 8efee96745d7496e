// src/engine/core.rs

//! Pure lifecycle state machine of a single qualification invocation.
//!
//! No IO happens here; [`QualificationEngine`](super::QualificationEngine)
//! drives the transitions while it serializes, launches and waits.

use std::fmt;

use anyhow::anyhow;
use tracing::debug;

use crate::errors::{QualificationError, Result};

/// Where an invocation currently is.
///
/// ```text
/// Idle -> ConfiguringFiles -> ProcessRunning -> Completed
///   \            \                  \---------> Failed
///    \            \---------------------------> Failed | Cancelled
///     \---------------------------------------> Failed | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    Idle,
    ConfiguringFiles,
    ProcessRunning,
    Completed,
    Failed,
    Cancelled,
}

impl EngineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EngineState::Completed | EngineState::Failed | EngineState::Cancelled
        )
    }

    pub fn can_advance_to(self, next: EngineState) -> bool {
        use EngineState::*;
        match (self, next) {
            (Idle, ConfiguringFiles) => true,
            (ConfiguringFiles, ProcessRunning) => true,
            (ProcessRunning, Completed) => true,
            (from, Failed | Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineState::Idle => "idle",
            EngineState::ConfiguringFiles => "configuring-files",
            EngineState::ProcessRunning => "process-running",
            EngineState::Completed => "completed",
            EngineState::Failed => "failed",
            EngineState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Tracks the state of one invocation and rejects illegal transitions.
#[derive(Debug, Clone)]
pub struct RunTracker {
    state: EngineState,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn advance(&mut self, next: EngineState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(QualificationError::Other(anyhow!(
                "invalid engine transition {} -> {}",
                self.state,
                next
            )));
        }
        debug!(from = %self.state, to = %next, "engine state transition");
        self.state = next;
        Ok(())
    }

    /// Settle a non-terminal invocation after an error: `Cancelled` for a
    /// cancellation, `Failed` otherwise. A terminal state is left untouched.
    pub fn settle_error(&mut self, err: &QualificationError) {
        if self.state.is_terminal() {
            return;
        }
        let next = if err.is_cancelled() {
            EngineState::Cancelled
        } else {
            EngineState::Failed
        };
        debug!(from = %self.state, to = %next, error = %err, "engine state transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::EngineState::*;
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let mut t = RunTracker::new();
        t.advance(ConfiguringFiles).unwrap();
        t.advance(ProcessRunning).unwrap();
        t.advance(Completed).unwrap();
        assert!(t.state().is_terminal());
    }

    #[test]
    fn cannot_skip_configuring_files() {
        let mut t = RunTracker::new();
        assert!(t.advance(ProcessRunning).is_err());
        assert_eq!(t.state(), Idle);
    }

    #[test]
    fn completion_only_from_running() {
        assert!(!ConfiguringFiles.can_advance_to(Completed));
        assert!(!Idle.can_advance_to(Completed));
        assert!(ProcessRunning.can_advance_to(Completed));
    }

    #[test]
    fn any_live_state_can_fail_or_be_cancelled() {
        for s in [Idle, ConfiguringFiles, ProcessRunning] {
            assert!(s.can_advance_to(Failed), "{s} -> failed");
            assert!(s.can_advance_to(Cancelled), "{s} -> cancelled");
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for s in [Completed, Failed, Cancelled] {
            for next in [Idle, ConfiguringFiles, ProcessRunning, Completed, Failed, Cancelled] {
                assert!(!s.can_advance_to(next), "{s} -> {next} must be rejected");
            }
        }
    }

    #[test]
    fn settle_error_maps_cancellation() {
        let mut t = RunTracker::new();
        t.advance(ConfiguringFiles).unwrap();
        t.settle_error(&QualificationError::Cancelled);
        assert_eq!(t.state(), Cancelled);

        let mut t = RunTracker::new();
        t.settle_error(&QualificationError::Settings("x".into()));
        assert_eq!(t.state(), Failed);

        t.settle_error(&QualificationError::Cancelled);
        assert_eq!(t.state(), Failed, "terminal state must not change");
    }
}
