//! Error types for treeloclib

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole analysis run
#[derive(Error, Debug)]
pub enum TreelocError {
    /// Input root does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Input root exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to list the input root
    #[error("failed to read directory '{path}': {source}")]
    DirectoryRead { path: PathBuf, source: io::Error },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Invalid syntax configuration (empty markers and the like)
    #[error("invalid syntax configuration: {0}")]
    InvalidSyntax(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Why a single file could not be line-counted.
///
/// These never abort a run; they end up inside the file's record. Each kind
/// maps to a fixed negative sentinel for consumers that expect a plain
/// integer in place of the count.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCountError {
    /// The file exists but may not be read
    #[error("file is not accessible")]
    NotAccessible,

    /// The file vanished or was never there
    #[error("file not found")]
    NotFound,

    /// Opening succeeded but reading failed (I/O error, invalid UTF-8)
    #[error("failed to read file")]
    ReadFailure,
}

impl LineCountError {
    /// Sentinel for [`LineCountError::NotAccessible`].
    pub const NOT_ACCESSIBLE_SENTINEL: i64 = -42;
    /// Sentinel for [`LineCountError::NotFound`].
    pub const NOT_FOUND_SENTINEL: i64 = -37;
    /// Sentinel for [`LineCountError::ReadFailure`].
    pub const READ_FAILURE_SENTINEL: i64 = -73;

    /// The integer stand-in used at the output boundary.
    pub fn sentinel(self) -> i64 {
        match self {
            Self::NotAccessible => Self::NOT_ACCESSIBLE_SENTINEL,
            Self::NotFound => Self::NOT_FOUND_SENTINEL,
            Self::ReadFailure => Self::READ_FAILURE_SENTINEL,
        }
    }

    /// Inverse of [`sentinel`](Self::sentinel).
    pub fn from_sentinel(value: i64) -> Option<Self> {
        match value {
            Self::NOT_ACCESSIBLE_SENTINEL => Some(Self::NotAccessible),
            Self::NOT_FOUND_SENTINEL => Some(Self::NotFound),
            Self::READ_FAILURE_SENTINEL => Some(Self::ReadFailure),
            _ => None,
        }
    }

    /// Classify an I/O error raised while opening a file.
    pub fn from_open_error(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::NotAccessible,
            _ => Self::ReadFailure,
        }
    }
}
