//! Error types for ACL loading and runtime mutation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for runtime ACL operations.
pub type AclResult<T> = Result<T, AclError>;

/// Result type for ACL load attempts.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that abort an ACL load.
///
/// A load that fails with any of these never publishes a partially
/// populated store.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the ACL file.
    #[error("failed to read ACL file '{path}': {source}")]
    Io {
        /// Path to the ACL file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A line that is not valid UTF-8.
    #[error("ACL parse error on line {line}: invalid UTF-8")]
    InvalidUtf8 {
        /// 1-based line number.
        line: usize,
    },

    /// The line does not start with a known directive.
    #[error("unknown ACL command on line {line}: '{content}'")]
    UnknownDirective {
        /// 1-based line number.
        line: usize,
        /// The trimmed line content.
        content: String,
    },

    /// A directive with nothing after it.
    #[error("ACL parse error on line {line}: '{directive}' requires a value")]
    EmptyPayload {
        /// 1-based line number.
        line: usize,
        /// Directive keyword.
        directive: &'static str,
    },

    /// A user directive whose payload is only a `:secret` suffix.
    #[error("ACL parse error on line {line}: missing username")]
    MissingUsername {
        /// 1-based line number.
        line: usize,
    },

    /// Could not grow a collection while loading.
    #[error("ACL parse error on line {line}: out of memory")]
    Allocation {
        /// 1-based line number.
        line: usize,
    },
}

impl LoadError {
    /// Line number of the offending directive, if the error came from one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::InvalidUtf8 { line }
            | Self::UnknownDirective { line, .. }
            | Self::EmptyPayload { line, .. }
            | Self::MissingUsername { line }
            | Self::Allocation { line } => Some(*line),
        }
    }
}

/// Errors from runtime ACL mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    /// Could not grow a collection.
    #[error("ACL error: out of memory")]
    Allocation,

    /// Removing entries is not supported.
    #[error("unban is not supported for {collection}")]
    UnbanUnsupported {
        /// Collection the caller tried to remove from.
        collection: &'static str,
    },
}

impl From<std::collections::TryReserveError> for AclError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::Allocation
    }
}
