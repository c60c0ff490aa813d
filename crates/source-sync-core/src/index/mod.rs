//! Document index abstraction.
//!
//! The [`DocumentIndex`] trait is the seam between the synchronizer and
//! whatever turns documents into something searchable (embedding, vector
//! storage). The synchronizer only needs to ingest, remove, ask whether the
//! index is empty, and flush once at the end of a pass.
//!
//! Calls are synchronous: a slow backend blocks the pass that calls it.

pub mod memory;

use thiserror::Error;

/// Errors raised by an index backend.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IndexError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        IndexError::Backend(err.into())
    }
}

/// Abstract document index fed by the synchronizer.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`ingest`](DocumentIndex::ingest) | Add a document under an identifier |
/// | [`remove_document`](DocumentIndex::remove_document) | Drop a document by identifier |
/// | [`is_empty`](DocumentIndex::is_empty) | Whether any document is stored |
/// | [`len`](DocumentIndex::len) | Number of stored documents |
/// | [`flush`](DocumentIndex::flush) | Persist buffered changes |
///
/// Document identifiers are normalized file paths.
pub trait DocumentIndex {
    /// Store `content` under `document_id`.
    ///
    /// Callers replace a document by removing it first; ingesting an id that
    /// is already present overwrites it.
    fn ingest(&mut self, document_id: &str, content: &str) -> Result<(), IndexError>;

    /// Remove the document stored under `document_id`.
    ///
    /// Returns `false` when no such document existed.
    fn remove_document(&mut self, document_id: &str) -> Result<bool, IndexError>;

    /// Number of stored documents.
    fn len(&self) -> Result<usize, IndexError>;

    fn is_empty(&self) -> Result<bool, IndexError> {
        Ok(self.len()? == 0)
    }

    /// Make every accepted change durable.
    ///
    /// Called once after the last ingest of a pass that changed the index,
    /// before the fingerprint baseline is saved. Backends that persist each
    /// call as it happens keep the default no-op.
    fn flush(&mut self) -> Result<(), IndexError> {
        Ok(())
    }
}

impl<T: DocumentIndex + ?Sized> DocumentIndex for &mut T {
    fn ingest(&mut self, document_id: &str, content: &str) -> Result<(), IndexError> {
        (**self).ingest(document_id, content)
    }

    fn remove_document(&mut self, document_id: &str) -> Result<bool, IndexError> {
        (**self).remove_document(document_id)
    }

    fn len(&self) -> Result<usize, IndexError> {
        (**self).len()
    }

    fn is_empty(&self) -> Result<bool, IndexError> {
        (**self).is_empty()
    }

    fn flush(&mut self) -> Result<(), IndexError> {
        (**self).flush()
    }
}
