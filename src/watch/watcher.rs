// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::sink::LogSink;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Tails a log file that another process appends to.
///
/// Reading is driven by two wake-up sources: `notify` events on the parent
/// directory and a fixed poll interval. Polling alone is enough for
/// correctness; `notify` only shortens latency. The file may not exist yet
/// when watching starts.
#[derive(Debug, Clone)]
pub struct LogWatcher {
    fs: Arc<dyn FileSystem>,
    poll_interval: Duration,
    use_notify: bool,
}

impl Default for LogWatcher {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl LogWatcher {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            poll_interval: DEFAULT_POLL_INTERVAL,
            use_notify: true,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Disable `notify` wake-ups and rely on polling only (used with
    /// in-memory filesystems).
    pub fn polling_only(mut self) -> Self {
        self.use_notify = false;
        self
    }

    /// Start tailing `path` from its current end, forwarding complete lines
    /// to `sink`.
    ///
    /// Content already in the file is skipped; a file created later is read
    /// from its first byte. If the writer truncates the file, reading
    /// restarts from the beginning.
    ///
    /// Must be called from within a Tokio runtime. Watching runs until the
    /// returned guard is stopped or dropped.
    pub fn watch(&self, path: impl Into<PathBuf>, sink: Arc<dyn LogSink>) -> LogWatcherGuard {
        let path = path.into();
        let stop = CancellationToken::new();
        let (wake_tx, wake_rx) = mpsc::unbounded_channel::<()>();

        let notify_watcher = if self.use_notify {
            spawn_notify(&path, wake_tx)
        } else {
            None
        };

        let offset = match self.fs.file_len(&path) {
            Ok(Some(len)) => len,
            Ok(None) => 0,
            Err(e) => {
                debug!(path = ?path, error = %e, "cannot size log file; tailing from start");
                0
            }
        };
        if offset > 0 {
            debug!(path = ?path, bytes = offset, "skipping existing log content");
        }

        let tail = Tail {
            fs: Arc::clone(&self.fs),
            path: path.clone(),
            offset,
            pending: Vec::new(),
            last_error: None,
            sink,
        };

        let task = tokio::spawn(
            run_tail_loop(tail, self.poll_interval, wake_rx, stop.clone()).in_current_span(),
        );

        info!(path = ?path, "log watcher started");

        LogWatcherGuard {
            path,
            stop,
            task: Some(task),
            _notify: notify_watcher,
        }
    }
}

/// Scoped handle for a running [`LogWatcher`].
///
/// `stop().await` performs a final read, flushes an unterminated last line
/// and waits for the background task. Dropping the guard only signals the
/// task to finish.
pub struct LogWatcherGuard {
    path: PathBuf,
    stop: CancellationToken,
    task: Option<JoinHandle<()>>,
    _notify: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for LogWatcherGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogWatcherGuard")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl LogWatcherGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn stop(mut self) {
        self.stop.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(path = ?self.path, error = %e, "log watcher task ended abnormally");
            }
        }
        debug!(path = ?self.path, "log watcher stopped");
    }
}

impl Drop for LogWatcherGuard {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

async fn run_tail_loop(
    mut tail: Tail,
    poll_interval: Duration,
    mut wake_rx: mpsc::UnboundedReceiver<()>,
    stop: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            _ = ticker.tick() => tail.poll(),
            Some(()) = wake_rx.recv() => tail.poll(),
        }
    }

    // Catch whatever was written between the last tick and the stop request.
    tail.poll();
    tail.flush();
    debug!(path = ?tail.path, bytes = tail.offset, "log watcher loop finished");
}

/// Watch the parent directory of `path` and wake the tail loop on any event
/// touching the file. Returns `None` when the directory cannot be watched;
/// polling still covers that case.
fn spawn_notify(path: &Path, wake_tx: mpsc::UnboundedSender<()>) -> Option<RecommendedWatcher> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().map(|n| n.to_os_string());

    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                let touches_file = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == file_name.as_deref());
                if touches_file {
                    let _ = wake_tx.send(());
                }
            }
        },
        Config::default(),
    );

    let mut watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            debug!(error = %e, "notify unavailable; log watcher will poll only");
            return None;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        debug!(dir = ?dir, error = %e, "cannot watch log directory; log watcher will poll only");
        return None;
    }

    Some(watcher)
}

/// Read position and partial-line buffer for one tailed file.
struct Tail {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    offset: u64,
    pending: Vec<u8>,
    /// Last read error reported at `warn!`; repeats are logged at `debug!`.
    last_error: Option<String>,
    sink: Arc<dyn LogSink>,
}

impl Tail {
    /// Read newly appended bytes and emit complete lines. Read errors are
    /// transient by contract: logged and retried on the next wake-up.
    fn poll(&mut self) {
        match self.fs.file_len(&self.path) {
            Ok(Some(len)) if len < self.offset => {
                info!(path = ?self.path, len, offset = self.offset, "log file shrank; reading from start");
                self.offset = 0;
                self.pending.clear();
            }
            Ok(_) => {}
            Err(e) => {
                self.report_read_error(&e);
                return;
            }
        }

        match self.fs.read_from(&self.path, self.offset) {
            Ok(bytes) => {
                if self.last_error.take().is_some() {
                    info!(path = ?self.path, "log file readable again");
                }
                if let Some(bytes) = bytes.filter(|b| !b.is_empty()) {
                    self.offset += bytes.len() as u64;
                    self.pending.extend_from_slice(&bytes);
                    self.emit_complete_lines();
                }
            }
            Err(e) => {
                self.report_read_error(&e);
            }
        }
    }

    /// Returns `true` when the error was reported at `warn!` level, i.e. it
    /// differs from the previous one.
    fn report_read_error(&mut self, err: &anyhow::Error) -> bool {
        let message = format!("{err:#}");
        if self.last_error.as_deref() == Some(message.as_str()) {
            debug!(path = ?self.path, error = %message, "log file still unreadable");
            false
        } else {
            warn!(path = ?self.path, error = %message, "log file unreadable; will retry");
            self.last_error = Some(message);
            true
        }
    }

    fn emit_complete_lines(&mut self) {
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&raw[..raw.len() - 1]);
        }
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            self.emit(&raw);
        }
    }

    fn emit(&self, raw: &[u8]) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        self.sink.on_line(&String::from_utf8_lossy(raw));
    }
}
