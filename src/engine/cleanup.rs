// src/engine/cleanup.rs

use std::path::Path;

use super::core::EngineState;

/// Hook run once at the end of every invocation, whatever its outcome.
///
/// Receives the invocation's temp folder and its terminal state.
pub trait CleanupStrategy: Send + Sync {
    fn cleanup(&self, temp_folder: &Path, state: EngineState);
}

impl<F> CleanupStrategy for F
where
    F: Fn(&Path, EngineState) + Send + Sync,
{
    fn cleanup(&self, temp_folder: &Path, state: EngineState) {
        self(temp_folder, state)
    }
}

/// Leaves the temp folder untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCleanup;

impl CleanupStrategy for NoCleanup {
    fn cleanup(&self, _temp_folder: &Path, _state: EngineState) {}
}
