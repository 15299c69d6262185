//! Message log shown in the terminal's message pane.
//!
//! The engine reports through the `log` facade. While the terminal is in raw mode
//! nothing may be printed, so the installed backend formats each record into a
//! bounded in-memory buffer that the UI drains into its message pane.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Debug)]
/// Shared, bounded buffer of formatted log messages.
pub struct MessageLog {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl MessageLog {
    #[must_use]
    /// Creates an empty log keeping at most `capacity` messages (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    /// Appends a message, discarding the oldest once full.
    pub fn push(&self, message: impl Into<String>) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(message.into());
    }

    #[must_use]
    /// The newest `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        let skip = lines.len().saturating_sub(count);
        lines.iter().skip(skip).cloned().collect()
    }

    #[must_use]
    /// Number of messages held.
    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    /// Whether no message has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers this buffer as the process-wide `log` backend.
    ///
    /// # Errors
    ///
    /// Returns an error if another logger was installed first.
    pub fn install(&self, level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(PaneLogger {
            sink: self.clone(),
            level,
        }))?;
        log::set_max_level(level);
        Ok(())
    }
}

#[must_use]
/// Parses a configured level name, falling back to `info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

struct PaneLogger {
    sink: MessageLog,
    level: LevelFilter,
}

impl Log for PaneLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = match record.level() {
            Level::Info => record.args().to_string(),
            level => format!("{level}: {}", record.args()),
        };
        self.sink.push(line);
    }

    fn flush(&self) {}
}

#[cfg(test)]
#[path = "tests/logging.rs"]
mod tests;
