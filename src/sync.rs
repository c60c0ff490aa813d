//! Synchronization pass orchestration.
//!
//! Coordinates the two modes of a pass:
//!
//! - **build**: crawl → ingest and fingerprint every file → flush index →
//!   save baseline.
//! - **update**: load baseline → re-fingerprint tracked files → replace
//!   changed documents → flush index → save merged baseline.
//!
//! Each ingested file is read once and its baseline fingerprint is taken
//! from the same bytes, so an edit racing the pass shows up as a change on
//! the next update.
//!
//! Everything runs sequentially on the calling thread. The baseline is only
//! written after the index has accepted and flushed every document of the
//! pass, so a failed pass never advances it.

use std::fs;
use std::path::PathBuf;

use source_sync_core::{
    DocumentIndex, ExclusionPolicy, FilePath, Fingerprint, FingerprintRecord, SyncResult,
    TrackingReport,
};
use tracing::{debug, info, warn};

use crate::crawler::crawl;
use crate::error::SyncError;
use crate::fingerprint::{fingerprint_bytes, fingerprint_file};
use crate::hash_store;
use crate::progress::{NoProgress, SyncProgressEvent, SyncProgressReporter};

/// Everything a pass needs to know, fixed at construction.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub root: PathBuf,
    pub hash_file: PathBuf,
    pub policy: ExclusionPolicy,
    pub follow_symlinks: bool,
    pub report_untracked: bool,
    pub path_header: bool,
}

impl SyncConfig {
    /// Config with an empty policy and defaults for every flag.
    pub fn new(root: impl Into<PathBuf>, hash_file: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            hash_file: hash_file.into(),
            policy: ExclusionPolicy::default(),
            follow_symlinks: false,
            report_untracked: false,
            path_header: true,
        }
    }

    pub fn with_policy(mut self, policy: ExclusionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

pub struct Synchronizer<I> {
    config: SyncConfig,
    index: I,
    progress: Box<dyn SyncProgressReporter>,
}

impl<I: DocumentIndex> Synchronizer<I> {
    pub fn new(config: SyncConfig, index: I) -> Self {
        Self {
            config,
            index,
            progress: Box::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn SyncProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn into_index(self) -> I {
        self.index
    }

    /// Index the whole tree into an empty index and write a fresh baseline.
    pub fn build(&mut self) -> Result<SyncResult, SyncError> {
        let existing = self.index.len().map_err(SyncError::IndexUnavailable)?;
        if existing > 0 {
            return Err(SyncError::Precondition(format!(
                "index already holds {} document(s); use `update` instead of `build`",
                existing
            )));
        }

        info!(root = %self.config.root.display(), "build: crawling");
        self.progress.report(SyncProgressEvent::Discovering {
            root: self.config.root.display().to_string(),
        });
        let files = crawl(
            &self.config.root,
            &self.config.policy,
            self.config.follow_symlinks,
        )?;

        info!(files = files.len(), "build: indexing");
        let total = files.len() as u64;
        let store_file = FilePath::from_path(&self.config.hash_file);
        let mut record = FingerprintRecord::new();
        for (i, file) in files.iter().enumerate() {
            debug!(file = %file, "ingesting");
            let (content, fingerprint) = self.read_document(file)?;
            self.index
                .ingest(file.as_str(), &content)
                .map_err(|e| SyncError::index(file.as_str(), e))?;
            if *file != store_file {
                record.insert(file.clone(), fingerprint);
            }
            self.progress.report(SyncProgressEvent::Ingesting {
                n: i as u64 + 1,
                total,
            });
        }

        self.index.flush().map_err(SyncError::IndexFlush)?;
        hash_store::save(&self.config.hash_file, &record)?;
        info!(
            indexed = files.len(),
            fingerprinted = record.len(),
            store = %self.config.hash_file.display(),
            "build complete"
        );

        Ok(SyncResult::Built { indexed: files })
    }

    /// Re-index tracked files whose content changed since the last baseline.
    ///
    /// Only paths already in the baseline are examined. Tracked files that
    /// vanished are reported as missing and keep their old fingerprint;
    /// untracked files are reported (when enabled) but never indexed.
    pub fn update(&mut self) -> Result<SyncResult, SyncError> {
        let hash_file = self.config.hash_file.clone();
        let old = hash_store::load(&hash_file)?;
        if old.is_empty() {
            return Err(SyncError::Empty { path: hash_file });
        }

        info!(tracked = old.len(), "update: diffing");
        let total = old.len() as u64;
        let mut merged = old.clone();
        let mut changed = Vec::new();
        let mut tracking = TrackingReport::default();

        for (i, (path, previous)) in old.iter().enumerate() {
            match fingerprint_file(path.as_path()) {
                Ok(current) => {
                    if current != *previous {
                        debug!(file = %path, "changed");
                        changed.push(path.clone());
                    }
                    merged.insert(path.clone(), current);
                }
                Err(e) if e.is_missing_file() => {
                    warn!(file = %path, "tracked file is missing; leaving its entry untouched");
                    tracking.missing.push(path.clone());
                }
                Err(e) => return Err(e),
            }
            self.progress.report(SyncProgressEvent::Fingerprinting {
                n: i as u64 + 1,
                total,
            });
        }

        if self.config.report_untracked {
            tracking.untracked = self.untracked_files(&old)?;
        }

        if changed.is_empty() {
            info!(
                missing = tracking.missing.len(),
                untracked = tracking.untracked.len(),
                "update: nothing to update"
            );
            return Ok(SyncResult::NoChanges { tracking });
        }

        info!(changed = changed.len(), "update: reconciling");
        let total = changed.len() as u64;
        for (i, file) in changed.iter().enumerate() {
            let (content, fingerprint) = self.read_document(file)?;
            let removed = self
                .index
                .remove_document(file.as_str())
                .map_err(|e| SyncError::index(file.as_str(), e))?;
            if !removed {
                warn!(file = %file, "changed file had no document in the index");
            }
            self.index
                .ingest(file.as_str(), &content)
                .map_err(|e| SyncError::index(file.as_str(), e))?;
            merged.insert(file.clone(), fingerprint);
            self.progress.report(SyncProgressEvent::Replacing {
                n: i as u64 + 1,
                total,
            });
        }

        self.index.flush().map_err(SyncError::IndexFlush)?;
        hash_store::save(&hash_file, &merged)?;
        info!(updated = changed.len(), "update complete");

        Ok(SyncResult::Updated { changed, tracking })
    }

    fn untracked_files(&self, record: &FingerprintRecord) -> Result<Vec<FilePath>, SyncError> {
        self.progress.report(SyncProgressEvent::Discovering {
            root: self.config.root.display().to_string(),
        });
        let store_file = FilePath::from_path(&self.config.hash_file);
        let files = crawl(
            &self.config.root,
            &self.config.policy,
            self.config.follow_symlinks,
        )?;
        Ok(files
            .into_iter()
            .filter(|f| *f != store_file && !record.contains(f.as_str()))
            .collect())
    }

    /// Read a file once, returning the document handed to the index and the
    /// fingerprint of exactly those bytes.
    ///
    /// Content is decoded as UTF-8 with invalid sequences replaced, so binary
    /// files that slip past the exclusion policy do not abort the pass.
    fn read_document(&self, file: &FilePath) -> Result<(String, Fingerprint), SyncError> {
        let bytes = fs::read(file.as_path()).map_err(|e| SyncError::io(file.as_path(), e))?;
        let fingerprint = fingerprint_bytes(&bytes);
        let text = String::from_utf8_lossy(&bytes);
        let content = if self.config.path_header {
            format!("File Path: {}\n\n{}", file, text)
        } else {
            text.into_owned()
        };
        Ok((content, fingerprint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_sync_core::index::memory::{IndexOp, InMemoryIndex};
    use tempfile::TempDir;

    fn setup() -> (TempDir, SyncConfig) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.py"), "print('a')\n").unwrap();
        fs::write(root.join("sub").join("c.py"), "print('c')\n").unwrap();
        let config = SyncConfig::new(&root, tmp.path().join("hashes.json"));
        (tmp, config)
    }

    fn doc_id(config: &SyncConfig, rel: &str) -> String {
        FilePath::from_path(&config.root.join(rel)).to_string()
    }

    #[test]
    fn test_build_ingests_with_path_header() {
        let (_tmp, config) = setup();
        let a = doc_id(&config, "a.py");
        let mut sync = Synchronizer::new(config, InMemoryIndex::new());

        let result = sync.build().unwrap();
        assert_eq!(result.files().len(), 2);

        let body = sync.index().get(&a).unwrap();
        assert_eq!(body, format!("File Path: {}\n\nprint('a')\n", a));
    }

    #[test]
    fn test_build_without_header() {
        let (_tmp, mut config) = setup();
        config.path_header = false;
        let a = doc_id(&config, "a.py");
        let mut sync = Synchronizer::new(config, InMemoryIndex::new());
        sync.build().unwrap();
        assert_eq!(sync.index().get(&a), Some("print('a')\n"));
    }

    #[test]
    fn test_build_refuses_non_empty_index() {
        let (_tmp, config) = setup();
        let hash_file = config.hash_file.clone();
        let mut sync =
            Synchronizer::new(config, InMemoryIndex::with_documents([("old", "doc")]));

        let err = sync.build().unwrap_err();
        assert!(matches!(err, SyncError::Precondition(_)));
        assert!(sync.index().ops().is_empty());
        assert!(!hash_file.exists());
    }

    #[test]
    fn test_update_replaces_changed_only() {
        let (_tmp, config) = setup();
        let a = doc_id(&config, "a.py");
        let a_path = config.root.join("a.py");
        let mut sync = Synchronizer::new(config, InMemoryIndex::new());
        sync.build().unwrap();

        fs::write(&a_path, "print('A')\n").unwrap();
        let before = sync.index().ops().len();
        let result = sync.update().unwrap();

        assert_eq!(result.files(), &[FilePath::new(&a)]);
        assert_eq!(
            &sync.index().ops()[before..],
            &[IndexOp::Remove(a.clone()), IndexOp::Ingest(a.clone())]
        );
        assert!(sync.index().get(&a).unwrap().ends_with("print('A')\n"));
    }

    #[test]
    fn test_flush_once_per_pass_that_changed_the_index() {
        let (_tmp, config) = setup();
        let a_path = config.root.join("a.py");
        let mut sync = Synchronizer::new(config, InMemoryIndex::new());

        sync.build().unwrap();
        assert_eq!(sync.index().flush_count(), 1);

        assert!(matches!(sync.update().unwrap(), SyncResult::NoChanges { .. }));
        assert_eq!(sync.index().flush_count(), 1);

        fs::write(&a_path, "print('A')\n").unwrap();
        sync.update().unwrap();
        assert_eq!(sync.index().flush_count(), 2);
    }

    #[test]
    fn test_update_baseline_matches_ingested_bytes() {
        let (_tmp, config) = setup();
        let a = doc_id(&config, "a.py");
        let a_path = config.root.join("a.py");
        let hash_file = config.hash_file.clone();
        let mut sync = Synchronizer::new(config, InMemoryIndex::new());
        sync.build().unwrap();

        fs::write(&a_path, "print('A')\n").unwrap();
        sync.update().unwrap();

        let record = hash_store::load(&hash_file).unwrap();
        assert_eq!(record.get(&a), Some(&fingerprint_bytes(b"print('A')\n")));
        assert!(sync.index().get(&a).unwrap().ends_with("print('A')\n"));
    }

    #[test]
    fn test_read_document_lossy() {
        let (_tmp, config) = setup();
        let bin = config.root.join("blob.bin");
        fs::write(&bin, [0x66, 0x6f, 0xff, 0x6f]).unwrap();
        let sync = Synchronizer::new(config, InMemoryIndex::new());
        let (text, fingerprint) = sync.read_document(&FilePath::from_path(&bin)).unwrap();
        assert!(text.ends_with("fo\u{FFFD}o"));
        assert_eq!(fingerprint, fingerprint_bytes(&[0x66, 0x6f, 0xff, 0x6f]));
    }
}
