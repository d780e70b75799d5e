/// This module defines the error types for wordhound and the policy for
/// which of them end a run.
///
/// # Recorded vs. fatal errors
///
/// A search touches many files, and most failures are local to one of
/// them: an unreadable file, a line past the buffering limit, a directory
/// that cannot be enumerated. Those are *recorded* — converted into a
/// `SearchError` value and carried in the outcome's error list while the
/// rest of the run continues:
///
/// ```rust,ignore
/// let outcome = search(&config)?;
/// for error in &outcome.errors {
///     eprintln!("skipped: {}", error);
/// }
/// ```
///
/// Only two situations are fatal and surface as the `Err` arm of
/// `search` itself: the root path cannot be resolved at all, or the
/// configuration is unusable before any work starts:
///
/// ```rust,ignore
/// match search(&config) {
///     Ok(outcome) => print_results(&outcome),
///     Err(SearchError::FileNotFound(path)) => eprintln!("no such path: {}", path.display()),
///     Err(e) => eprintln!("search failed: {}", e),
/// }
/// ```
///
/// Everything in between — a file deleted mid-run, a permission wall two
/// directories down — degrades to a record, never a panic and never a
/// lost sibling result.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Line too long in {path}: exceeds {limit} bytes")]
    LineTooLong { path: PathBuf, limit: usize },
    #[error("Traversal failed at {path}: {message}")]
    Traversal { path: PathBuf, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn line_too_long(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self::LineTooLong {
            path: path.into(),
            limit,
        }
    }

    pub fn traversal(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Traversal {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Maps an I/O failure on `path` onto the matching error kind
    pub fn from_io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::Io {
                path: path.into(),
                source: error,
            },
        }
    }

    /// The path the error is about, when it has one
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileNotFound(path)
            | Self::PermissionDenied(path)
            | Self::Io { path, .. }
            | Self::LineTooLong { path, .. }
            | Self::Traversal { path, .. } => Some(path),
            Self::Config(_) => None,
        }
    }
}
