//! Error type shared by every traversal

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for traversal operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The filesystem boundary operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    ListEntries,
    Metadata,
    ReadFile,
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoOperation::ListEntries => "list entries of",
            IoOperation::Metadata => "stat",
            IoOperation::ReadFile => "read",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A host filesystem failure, tagged with the path that caused it.
    #[error("failed to {operation} '{}': {source}", .path.display())]
    Io {
        operation: IoOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),
    /// A spawned traversal task was cancelled or panicked.
    #[error("traversal task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn io(operation: IoOperation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Path the failing operation was applied to, if this is an I/O error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
