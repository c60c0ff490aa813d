//! JSON-file [`DocumentIndex`] used by the CLI.
//!
//! Documents are kept in memory and written to a single JSON file on
//! [`flush`](DocumentIndex::flush), which the synchronizer calls once per
//! pass. A pass that fails before its flush leaves the file as it was.
//! Downstream tooling (embedding, vector storage) reads that file; this
//! crate never interprets document content.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use source_sync_core::{DocumentIndex, IndexError};
use tracing::debug;

use crate::hash_store::write_json_atomic;

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(default)]
    documents: BTreeMap<String, String>,
}

/// Document index persisted as `{"documents": {"<id>": "<content>", ...}}`.
#[derive(Debug)]
pub struct JsonFileIndex {
    path: PathBuf,
    file: IndexFile,
    dirty: bool,
}

impl JsonFileIndex {
    /// Open the index at `path`, starting empty when the file does not exist.
    /// Nothing is written until the first flush after a mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, IndexError> {
        let path = path.into();
        let file = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(IndexError::backend)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => IndexFile::default(),
            Err(e) => return Err(IndexError::Io(e)),
        };
        debug!(path = %path.display(), documents = file.documents.len(), "opened document index");
        Ok(Self {
            path,
            file,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, document_id: &str) -> Option<&str> {
        self.file.documents.get(document_id).map(String::as_str)
    }

}

impl DocumentIndex for JsonFileIndex {
    fn ingest(&mut self, document_id: &str, content: &str) -> Result<(), IndexError> {
        self.file
            .documents
            .insert(document_id.to_string(), content.to_string());
        self.dirty = true;
        Ok(())
    }

    fn remove_document(&mut self, document_id: &str) -> Result<bool, IndexError> {
        let removed = self.file.documents.remove(document_id).is_some();
        self.dirty |= removed;
        Ok(removed)
    }

    fn len(&self) -> Result<usize, IndexError> {
        Ok(self.file.documents.len())
    }

    fn flush(&mut self) -> Result<(), IndexError> {
        if !self.dirty {
            return Ok(());
        }
        write_json_atomic(&self.path, &self.file)?;
        self.dirty = false;
        debug!(
            path = %self.path.display(),
            documents = self.file.documents.len(),
            "flushed document index"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_is_empty_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        let index = JsonFileIndex::open(&path).unwrap();
        assert!(index.is_empty().unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_flush_persists_and_reopens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("index.json");

        let mut index = JsonFileIndex::open(&path).unwrap();
        assert_eq!(index.path(), path.as_path());
        index.ingest("proj/a.py", "print(1)").unwrap();
        index.ingest("proj/b.py", "print(2)").unwrap();
        assert!(index.remove_document("proj/b.py").unwrap());
        assert!(!path.exists(), "mutations must be buffered until flush");

        index.flush().unwrap();
        let reopened = JsonFileIndex::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        assert_eq!(reopened.get("proj/a.py"), Some("print(1)"));
        assert_eq!(reopened.get("proj/b.py"), None);
    }

    #[test]
    fn test_flush_without_changes_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        let mut index = JsonFileIndex::open(&path).unwrap();
        assert!(!index.remove_document("unknown").unwrap());
        index.flush().unwrap();
        assert!(!path.exists());

        index.ingest("a", "1").unwrap();
        index.flush().unwrap();
        fs::write(&path, "{\"documents\": {}}").unwrap();
        index.flush().unwrap();
        // Clean index: the hand-written file is left alone.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"documents\": {}}");
    }

    #[test]
    fn test_corrupt_file_is_backend_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        fs::write(&path, "{{{").unwrap();
        assert!(matches!(
            JsonFileIndex::open(&path),
            Err(IndexError::Backend(_))
        ));
    }
}
