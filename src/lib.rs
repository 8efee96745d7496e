// src/lib.rs

//! Launch and supervise the PK-Sim CLI for qualification runs.
//!
//! A run goes through these steps:
//! - write the [`QualificationConfiguration`] to `<temp>/config.json`
//! - start tailing `<temp>/log.txt`
//! - start `PKSim.CLI qualification -f ... -l ... --logLevel ... [-v]`
//! - wait for exit or cancellation and map the exit code to a [`RunResult`]
//!
//! ```no_run
//! # async fn demo() -> qualification_runner::errors::Result<()> {
//! use qualification_runner::{
//!     QualificationConfiguration, QualificationEngine, RunOptions, RunnerSettings,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let settings = RunnerSettings::resolve(RunnerSettings::default(), None)?;
//! let engine = QualificationEngine::from_settings(settings);
//!
//! let config = QualificationConfiguration {
//!     project: "Midazolam".into(),
//!     temp_folder: "/tmp/midazolam".into(),
//!     ..Default::default()
//! };
//! let result = engine
//!     .run(&config, &RunOptions::default(), &CancellationToken::new())
//!     .await?;
//! println!("success: {}, log: {:?}", result.success, result.log_file_full_path);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod settings;
pub mod types;
pub mod watch;

pub use config::QualificationConfiguration;
pub use engine::{EngineState, QualificationEngine, RunOptions, RunResult};
pub use errors::{QualificationError, Result};
pub use settings::{CliLocator, FixedCliPath, InstallFolderLocator, RunnerSettings};
pub use types::{ExitCode, LogLevel, RunMode};
