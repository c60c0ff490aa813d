//! Data types that flow through a synchronization pass.

use std::borrow::Borrow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};

use crate::path;

/// A normalized, platform-independent file path.
///
/// Construction always normalizes, including when a path is read back from a
/// persisted record, so equality between crawl output, exclusion rules and
/// stored keys is plain string equality. The string doubles as the document
/// identifier handed to the index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub struct FilePath(String);

impl FilePath {
    pub fn new(raw: &str) -> Self {
        Self(path::normalize(raw))
    }

    /// Build from a [`Path`]. Non-UTF-8 components are replaced lossily, so
    /// the result only identifies such a path; it cannot reopen it.
    pub fn from_path(p: &Path) -> Self {
        Self(path::normalize_path(p))
    }

    /// Build from a [`Path`] that must round-trip for I/O. Returns `None`
    /// when the path is not valid UTF-8.
    pub fn try_from_path(p: &Path) -> Option<Self> {
        path::try_normalize_path(p).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Bare name of the last segment.
    pub fn file_name(&self) -> &str {
        path::file_name(&self.0)
    }
}

impl From<String> for FilePath {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for FilePath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl Borrow<str> for FilePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FilePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Lowercase hex content digest of a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last known state of the tree: one fingerprint per tracked path.
///
/// Ordered by path so the persisted snapshot diffs cleanly between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintRecord {
    entries: BTreeMap<FilePath, Fingerprint>,
}

impl FingerprintRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace the fingerprint of `path`, returning the previous one.
    pub fn insert(&mut self, path: FilePath, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.entries.insert(path, fingerprint)
    }

    pub fn get(&self, path: &str) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FilePath> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FilePath, Fingerprint> {
        self.entries.iter()
    }
}

impl FromIterator<(FilePath, Fingerprint)> for FingerprintRecord {
    fn from_iter<T: IntoIterator<Item = (FilePath, Fingerprint)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FingerprintRecord {
    type Item = (&'a FilePath, &'a Fingerprint);
    type IntoIter = btree_map::Iter<'a, FilePath, Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Files an update noticed but deliberately left alone.
///
/// Update mode only re-indexes paths that are already tracked. Files that
/// disappeared, or appeared since the last build, are listed here so the
/// caller can decide whether a fresh build is due.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingReport {
    /// Tracked paths that no longer exist on disk.
    pub missing: Vec<FilePath>,
    /// Eligible files under the root that the record does not track. Only
    /// populated when untracked reporting is enabled.
    pub untracked: Vec<FilePath>,
}

impl TrackingReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.untracked.is_empty()
    }
}

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    /// A build ingested every listed file and wrote a new baseline.
    Built { indexed: Vec<FilePath> },
    /// An update re-indexed the listed files and wrote a merged baseline.
    Updated {
        changed: Vec<FilePath>,
        tracking: TrackingReport,
    },
    /// An update found no changed content; store and index were not touched.
    NoChanges { tracking: TrackingReport },
}

impl SyncResult {
    /// Files handed to the indexer during the pass.
    pub fn files(&self) -> &[FilePath] {
        match self {
            SyncResult::Built { indexed } => indexed,
            SyncResult::Updated { changed, .. } => changed,
            SyncResult::NoChanges { .. } => &[],
        }
    }

    pub fn tracking(&self) -> Option<&TrackingReport> {
        match self {
            SyncResult::Built { .. } => None,
            SyncResult::Updated { tracking, .. } | SyncResult::NoChanges { tracking } => {
                Some(tracking)
            }
        }
    }
}
