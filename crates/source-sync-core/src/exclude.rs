//! Exclusion policy applied while crawling a source tree.
//!
//! Three independent rule sets decide whether a path takes part in
//! synchronization:
//!
//! | Rule | Matches | Scope |
//! |------|---------|-------|
//! | exact path | the full normalized path | that one location |
//! | name | the bare file or directory name | any depth |
//! | extension | the suffix after the last dot, case-sensitive | any depth, files only |
//!
//! A path matched by any rule is excluded. An excluded directory is pruned,
//! so nothing beneath it is ever visited.
//!
//! ```rust
//! use source_sync_core::{ExclusionPolicy, FilePath};
//!
//! let policy = ExclusionPolicy::default()
//!     .exclude_name(".git")
//!     .exclude_extension("txt");
//!
//! assert!(policy.excludes_dir(&FilePath::new("proj/.git")));
//! assert!(policy.excludes_file(&FilePath::new("proj/notes.txt")));
//! assert!(!policy.excludes_file(&FilePath::new("proj/main.py")));
//! ```

use std::collections::BTreeSet;

use crate::models::FilePath;
use crate::path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    paths: BTreeSet<String>,
    names: BTreeSet<String>,
    extensions: BTreeSet<String>,
}

impl ExclusionPolicy {
    pub fn new<P, N, E>(paths: P, names: N, extensions: E) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let mut policy = Self::default();
        for p in paths {
            policy.add_path(p.as_ref());
        }
        for n in names {
            policy.add_name(n.as_ref());
        }
        for e in extensions {
            policy.add_extension(e.as_ref());
        }
        policy
    }

    pub fn exclude_path(mut self, raw: &str) -> Self {
        self.add_path(raw);
        self
    }

    pub fn exclude_name(mut self, name: &str) -> Self {
        self.add_name(name);
        self
    }

    pub fn exclude_extension(mut self, ext: &str) -> Self {
        self.add_extension(ext);
        self
    }

    /// Exclude one location. The path is normalized so it compares equal to
    /// crawl output; a path that does not exist simply never matches.
    pub fn add_path(&mut self, raw: &str) {
        self.paths.insert(path::normalize(raw));
    }

    pub fn add_name(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    /// Exclude an extension. A single leading dot is accepted and dropped.
    pub fn add_extension(&mut self, ext: &str) {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        self.extensions.insert(ext.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.names.is_empty() && self.extensions.is_empty()
    }

    /// Directory-level check, made before descending.
    pub fn excludes_dir(&self, dir: &FilePath) -> bool {
        self.paths.contains(dir.as_str()) || self.names.contains(dir.file_name())
    }

    /// File-level check.
    pub fn excludes_file(&self, file: &FilePath) -> bool {
        let name = file.file_name();
        if self.paths.contains(file.as_str()) || self.names.contains(name) {
            return true;
        }
        path::extension(name).is_some_and(|ext| self.extensions.contains(ext))
    }
}
