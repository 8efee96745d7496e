// src/watch/mod.rs

//! Log file tailing.
//!
//! The PK-Sim CLI writes its progress to `log.txt` in the run's temp folder.
//! This module follows that file while the process runs and hands each new
//! line to a [`LogSink`]. It does **not** know about processes or the engine;
//! it only turns appended bytes into lines.

pub mod sink;
pub mod watcher;

pub use sink::{ChannelLogSink, LogSink, TracingLogSink};
pub use watcher::{DEFAULT_POLL_INTERVAL, LogWatcher, LogWatcherGuard};
