//! Selection errors

use std::path::PathBuf;

/// Errors that abort a selection run.
///
/// Only traversal failures live here: a candidate that disappears before its
/// recency stat is dropped by the orderer, and an empty match set is a
/// normal (empty) selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("cannot list directory {}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SelectError {
    pub fn traversal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SelectError::Traversal {
            path: path.into(),
            source,
        }
    }

    /// Stable code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            SelectError::Traversal { .. } => "TRAVERSAL_FAILED",
        }
    }

    /// The path the error is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            SelectError::Traversal { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, SelectError>;
