//! Run callbacks: progress phases, status logging and cooperative
//! cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Severity of an import status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// Receives status lines as the run progresses. Row failures are reported
/// here as well as routed to the error sink.
pub trait ImportLogger {
    fn log(&mut self, level: LogLevel, message: &str);
}

/// Receives coarse progress: a phase start, percentage updates within stage
/// two, and a final phase end.
pub trait ProgressSink {
    fn start(&mut self, label: &str);
    fn message(&mut self, label: &str, percent: Option<i32>);
    fn end(&mut self, label: &str);
}

/// Discards progress updates.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn start(&mut self, _label: &str) {}
    fn message(&mut self, _label: &str, _percent: Option<i32>) {}
    fn end(&mut self, _label: &str) {}
}

/// Discards status lines.
#[derive(Debug, Default)]
pub struct NullLogger;

impl ImportLogger for NullLogger {
    fn log(&mut self, _level: LogLevel, _message: &str) {}
}

/// Routes status lines to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl ImportLogger for TracingLogger {
    fn log(&mut self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
        }
    }
}

/// Cooperative cancellation flag, polled once per row boundary.
///
/// Clones share the flag; hand a clone to whatever may request cancellation.
/// The row being processed when the flag is set still completes (commit or
/// rollback) before the loop exits.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_clones_share_the_flag() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
