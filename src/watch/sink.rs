// src/watch/sink.rs

//! Destinations for lines tailed from the CLI log file.

use tokio::sync::mpsc;
use tracing::info;

/// Receives complete log lines, in the order they were written.
pub trait LogSink: Send + Sync {
    fn on_line(&self, line: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_line(&self, line: &str) {
        self(line)
    }
}

/// Re-emit every line as a `tracing` event under the `pksim` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn on_line(&self, line: &str) {
        info!(target: "pksim", "{}", line);
    }
}

/// Forward lines into an unbounded channel.
///
/// Lines are silently dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelLogSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelLogSink {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Convenience constructor returning the sink and its receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl LogSink for ChannelLogSink {
    fn on_line(&self, line: &str) {
        let _ = self.tx.send(line.to_string());
    }
}
