// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the PK-Sim CLI, using
//! `tokio::process::Command`, and reporting its exit code back to the
//! engine.
//!
//! - [`args`] builds the fixed command line of the CLI.
//! - [`process`] owns a single child process: start, wait with cancellation,
//!   terminate.
//! - [`backend`] provides the `ProcessLauncher` trait and the concrete
//!   `TokioProcessLauncher` the engine uses in production, and which tests
//!   can replace with a fake implementation.

pub mod args;
pub mod backend;
pub mod process;

pub use args::build_arguments;
pub use backend::{ProcessLauncher, RunningProcess, TokioProcessLauncher};
pub use process::{ProcessHandle, WaitOutcome};
