// src/engine/qualification.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::{ConfigSerializer, JsonConfigSerializer, QualificationConfiguration};
use crate::errors::{QualificationError, Result};
use crate::exec::{ProcessLauncher, TokioProcessLauncher, WaitOutcome, build_arguments};
use crate::settings::{CliLocator, InstallFolderLocator, RunnerSettings};
use crate::types::{ExitCode, RunMode};
use crate::watch::{LogSink, LogWatcher, TracingLogSink};

use super::cleanup::{CleanupStrategy, NoCleanup};
use super::core::{EngineState, RunTracker};
use super::{RunOptions, RunPaths, RunResult};

/// Runs or validates a qualification with the PK-Sim CLI.
///
/// Every collaborator sits behind an `Arc`, so the engine is cheap to clone
/// and can be moved into a task with [`QualificationEngine::spawn`].
/// Invocations share no state; concurrent invocations must use distinct temp
/// folders.
#[derive(Clone)]
pub struct QualificationEngine {
    locator: Arc<dyn CliLocator>,
    launcher: Arc<dyn ProcessLauncher>,
    serializer: Arc<dyn ConfigSerializer>,
    log_watcher: LogWatcher,
    log_sink: Arc<dyn LogSink>,
    cleanup: Arc<dyn CleanupStrategy>,
    quote_paths: bool,
}

impl fmt::Debug for QualificationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualificationEngine")
            .field("log_watcher", &self.log_watcher)
            .field("quote_paths", &self.quote_paths)
            .finish_non_exhaustive()
    }
}

impl QualificationEngine {
    /// Engine with the production collaborators: real processes, JSON on
    /// disk, log lines re-emitted through `tracing`.
    pub fn new(locator: impl CliLocator + 'static) -> Self {
        Self {
            locator: Arc::new(locator),
            launcher: Arc::new(TokioProcessLauncher),
            serializer: Arc::new(JsonConfigSerializer::default()),
            log_watcher: LogWatcher::default(),
            log_sink: Arc::new(TracingLogSink),
            cleanup: Arc::new(NoCleanup),
            quote_paths: false,
        }
    }

    pub fn from_settings(settings: RunnerSettings) -> Self {
        Self::new(InstallFolderLocator::new(settings))
    }

    pub fn with_launcher(mut self, launcher: impl ProcessLauncher + 'static) -> Self {
        self.launcher = Arc::new(launcher);
        self
    }

    pub fn with_serializer(mut self, serializer: impl ConfigSerializer + 'static) -> Self {
        self.serializer = Arc::new(serializer);
        self
    }

    pub fn with_log_watcher(mut self, watcher: LogWatcher) -> Self {
        self.log_watcher = watcher;
        self
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn with_cleanup(mut self, cleanup: impl CleanupStrategy + 'static) -> Self {
        self.cleanup = Arc::new(cleanup);
        self
    }

    /// Quote config/log paths containing whitespace before passing them.
    pub fn with_quoted_paths(mut self, quote: bool) -> Self {
        self.quote_paths = quote;
        self
    }

    pub async fn run(
        &self,
        config: &QualificationConfiguration,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<RunResult> {
        self.execute(config, &options.with_mode(RunMode::Run), cancel)
            .await
    }

    pub async fn validate(
        &self,
        config: &QualificationConfiguration,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<RunResult> {
        self.execute(config, &options.with_mode(RunMode::Validate), cancel)
            .await
    }

    /// Run one invocation on its own Tokio task.
    pub fn spawn(
        &self,
        config: QualificationConfiguration,
        options: RunOptions,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<RunResult>> {
        let engine = self.clone();
        tokio::spawn(async move { engine.execute(&config, &options, &cancel).await })
    }

    /// Serialize the configuration, start the CLI and wait for it.
    ///
    /// - `Ok(result)` once the CLI exited; `result.success` reflects its exit
    ///   code and a non-zero exit is *not* an error.
    /// - `Err(Cancelled)` if `cancel` fired first; the process is killed and
    ///   no result is produced.
    /// - Any other `Err` means the configuration could not be written or the
    ///   CLI could not be started or waited on.
    ///
    /// The log watcher and the process are released before this returns, on
    /// every path.
    pub async fn execute(
        &self,
        config: &QualificationConfiguration,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<RunResult> {
        let span = info_span!(
            "qualification",
            project = %config.project_id(),
            mode = ?options.mode
        );

        async {
            let mut tracker = RunTracker::new();
            let outcome = self.execute_inner(config, options, cancel, &mut tracker).await;

            if let Err(err) = &outcome {
                tracker.settle_error(err);
                if err.is_cancelled() {
                    info!("qualification run cancelled");
                } else {
                    warn!(error = %err, "qualification run failed");
                }
            }

            self.cleanup.cleanup(&config.temp_folder, tracker.state());
            outcome
        }
        .instrument(span)
        .await
    }

    async fn execute_inner(
        &self,
        config: &QualificationConfiguration,
        options: &RunOptions,
        cancel: &CancellationToken,
        tracker: &mut RunTracker,
    ) -> Result<RunResult> {
        info!("starting qualification run");

        let paths = RunPaths::for_temp_folder(&config.temp_folder);
        let mut result = RunResult::new(&paths, config.project_id());

        tracker.advance(EngineState::ConfiguringFiles)?;
        ensure_not_cancelled(cancel)?;

        let program = self.locator.cli_path()?;
        self.write_config(config, &paths.config_file).await?;
        debug!(path = ?paths.config_file, "qualification configuration exported");

        let args = build_arguments(
            &paths.config_file,
            &paths.log_file,
            options.log_level,
            options.mode,
            self.quote_paths,
        );
        ensure_not_cancelled(cancel)?;

        // Watch before launching so the first lines of the CLI are not missed.
        let watcher = self
            .log_watcher
            .watch(&paths.log_file, Arc::clone(&self.log_sink));

        let waited = async {
            let mut process = self.launcher.launch(&program, &args)?;
            tracker.advance(EngineState::ProcessRunning)?;
            process.wait(cancel).await
        }
        .await;

        watcher.stop().await;

        match waited? {
            WaitOutcome::Exited(code) => {
                finish(&mut result, code, tracker)?;
                Ok(result)
            }
            WaitOutcome::Cancelled => Err(QualificationError::Cancelled),
        }
    }

    async fn write_config(&self, config: &QualificationConfiguration, dest: &Path) -> Result<()> {
        let serializer = Arc::clone(&self.serializer);
        let config = config.clone();
        let dest: PathBuf = dest.to_path_buf();

        tokio::task::spawn_blocking(move || serializer.serialize(&config, &dest))
            .await
            .map_err(anyhow::Error::from)?
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(QualificationError::Cancelled)
    } else {
        Ok(())
    }
}

fn finish(result: &mut RunResult, code: ExitCode, tracker: &mut RunTracker) -> Result<()> {
    result.success = code.is_success();
    result.exit_code = Some(code.0);

    if result.success {
        tracker.advance(EngineState::Completed)?;
        info!(exit_code = %code, "qualification run completed");
    } else {
        tracker.advance(EngineState::Failed)?;
        warn!(
            exit_code = %code,
            log = ?result.log_file_full_path,
            "PK-Sim CLI reported a failure; see log file"
        );
    }
    Ok(())
}
