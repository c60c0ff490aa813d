//! Errors raised by a synchronization pass.
//!
//! Every variant is fatal to the pass that produced it. "Nothing to update"
//! is not an error; it is [`SyncResult::NoChanges`](crate::SyncResult).

use std::io;
use std::path::{Path, PathBuf};

use source_sync_core::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("fingerprint store not found: {} (run `build` first)", path.display())]
    NotFound { path: PathBuf },

    #[error("fingerprint store {} has no entries; run `build` instead of `update`", path.display())]
    Empty { path: PathBuf },

    #[error("fingerprint store {} is not a valid path-to-digest map: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Precondition(String),

    #[error("index rejected document {document_id}: {source}")]
    Index {
        document_id: String,
        #[source]
        source: IndexError,
    },

    #[error("index unavailable: {0}")]
    IndexUnavailable(#[source] IndexError),

    #[error("index failed to persist the pass: {0}")]
    IndexFlush(#[source] IndexError),
}

impl SyncError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        SyncError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn index(document_id: impl Into<String>, source: IndexError) -> Self {
        SyncError::Index {
            document_id: document_id.into(),
            source,
        }
    }

    /// Whether this is an I/O failure caused by the path not existing.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, SyncError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl From<walkdir::Error> for SyncError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
        SyncError::Io { path, source }
    }
}
