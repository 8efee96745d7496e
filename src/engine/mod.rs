// src/engine/mod.rs

//! Qualification engine.
//!
//! This module ties together:
//! - the config serializer (`config.json` in the temp folder)
//! - the log watcher tailing `log.txt`
//! - the PK-Sim CLI process and its exit code
//!
//! The pure lifecycle state machine lives in [`core`]; the async/IO shell is
//! implemented in [`qualification`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::{LogLevel, RunMode};

pub mod cleanup;
pub mod core;
pub mod qualification;

pub use cleanup::{CleanupStrategy, NoCleanup};
pub use self::core::{EngineState, RunTracker};
pub use qualification::QualificationEngine;

pub const LOG_FILE_NAME: &str = "log.txt";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Per-invocation options supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Passed through to the CLI as `--logLevel`.
    pub log_level: LogLevel,
}

impl RunOptions {
    pub fn new(mode: RunMode, log_level: LogLevel) -> Self {
        Self { mode, log_level }
    }

    pub fn with_mode(self, mode: RunMode) -> Self {
        Self { mode, ..self }
    }
}

/// Files derived from the configuration's temp folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub config_file: PathBuf,
    pub log_file: PathBuf,
}

impl RunPaths {
    pub fn for_temp_folder(temp_folder: &Path) -> Self {
        Self {
            config_file: temp_folder.join(CONFIG_FILE_NAME),
            log_file: temp_folder.join(LOG_FILE_NAME),
        }
    }
}

/// What the caller gets back from a run that reached the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Log written by the CLI.
    pub log_file_full_path: PathBuf,
    /// Configuration handed to the CLI.
    pub config_file_full_path: PathBuf,
    /// True only when the CLI exited with code 0.
    pub success: bool,
    pub project_id: String,
    /// Raw exit code, kept for diagnostics.
    pub exit_code: Option<i32>,
}

impl RunResult {
    pub fn new(paths: &RunPaths, project_id: impl Into<String>) -> Self {
        Self {
            log_file_full_path: paths.log_file.clone(),
            config_file_full_path: paths.config_file.clone(),
            success: false,
            project_id: project_id.into(),
            exit_code: None,
        }
    }
}
