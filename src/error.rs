//! Error taxonomy for the outline engine and its persistence layer.
//!
//! User actions that cannot apply (renaming with nothing selected, unfolding a leaf)
//! are not errors: they are logged and ignored. What remains here is what a caller
//! has to decide about: malformed files, filesystem failures, and internal
//! bookkeeping faults that mean the engine itself is wrong.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used by outline engine operations.
pub type OutlineResult<T> = Result<T, OutlineError>;

#[derive(Debug, Error)]
/// Failures surfaced by the engine, codec and storage.
pub enum OutlineError {
    /// A child position outside the addressed list.
    #[error("index {index} out of range for list of length {len}")]
    Index {
        /// Requested position.
        index: usize,
        /// Length of the list at the time of the call.
        len: usize,
    },
    /// A broken engine invariant, e.g. the current item missing from the current list.
    ///
    /// Never caused by user input. Callers should stop rather than keep mutating.
    #[error("internal error: {0}")]
    Internal(String),
    /// The outline file does not follow the record format.
    #[error("format error on line {line}: {reason}")]
    Format {
        /// 1-based line number of the offending line.
        line: usize,
        /// What was expected or found.
        reason: String,
    },
    /// Reading or writing the outline file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File the operation was acting on.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

impl OutlineError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    #[must_use]
    /// True for faults that indicate an engine bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    #[must_use]
    /// True when a file could not be found, as opposed to being unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
