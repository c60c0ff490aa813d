//! In-memory [`DocumentIndex`] implementation for testing and embedding.
//!
//! Documents live in a `BTreeMap` keyed by identifier. Every ingest and
//! removal is recorded in an operation log so tests can assert on exactly
//! what the synchronizer asked for.

use std::collections::BTreeMap;

use super::{DocumentIndex, IndexError};

/// A single call received by an [`InMemoryIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOp {
    Ingest(String),
    Remove(String),
}

/// In-memory document index.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    docs: BTreeMap<String, String>,
    ops: Vec<IndexOp>,
    flushes: usize,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index that already holds the given documents. The seed
    /// documents do not appear in the operation log.
    pub fn with_documents<I, K, V>(docs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            docs: docs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ops: Vec::new(),
            flushes: 0,
        }
    }

    pub fn get(&self, document_id: &str) -> Option<&str> {
        self.docs.get(document_id).map(String::as_str)
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.docs.keys().map(String::as_str)
    }

    /// Calls received since construction, in order.
    pub fn ops(&self) -> &[IndexOp] {
        &self.ops
    }

    /// Number of [`flush`](DocumentIndex::flush) calls received.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl DocumentIndex for InMemoryIndex {
    fn ingest(&mut self, document_id: &str, content: &str) -> Result<(), IndexError> {
        self.ops.push(IndexOp::Ingest(document_id.to_string()));
        self.docs
            .insert(document_id.to_string(), content.to_string());
        Ok(())
    }

    fn remove_document(&mut self, document_id: &str) -> Result<bool, IndexError> {
        self.ops.push(IndexOp::Remove(document_id.to_string()));
        Ok(self.docs.remove(document_id).is_some())
    }

    fn len(&self) -> Result<usize, IndexError> {
        Ok(self.docs.len())
    }

    fn flush(&mut self) -> Result<(), IndexError> {
        self.flushes += 1;
        Ok(())
    }
}
