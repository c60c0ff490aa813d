use std::path::Path;

use source_sync_core::{ExclusionPolicy, FilePath};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::SyncError;

/// Walk `root` and return every eligible file as a normalized path.
///
/// Directories matched by the policy are pruned before they are entered.
/// Entries whose path is not valid UTF-8 cannot be named by a [`FilePath`]
/// and are skipped with a warning.
/// The root itself is never tested against the policy. Paths are rooted the
/// way `root` was spelled (`proj` yields `proj/a.py`), which keeps them valid
/// relative to the working directory and usable as document identifiers.
pub fn crawl(
    root: &Path,
    policy: &ExclusionPolicy,
    follow_symlinks: bool,
) -> Result<Vec<FilePath>, SyncError> {
    if !root.is_dir() {
        let kind = if root.exists() {
            std::io::ErrorKind::InvalidInput
        } else {
            std::io::ErrorKind::NotFound
        };
        return Err(SyncError::io(
            root,
            std::io::Error::new(kind, "crawl root is not a directory"),
        ));
    }

    let mut files = Vec::new();
    let mut skipped = 0usize;

    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, policy));

    for entry in walker {
        let entry = entry?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let path = match FilePath::try_from_path(entry.path()) {
            Some(path) => path,
            None => {
                warn!(
                    path = %entry.path().display(),
                    reason = "file name is not valid UTF-8",
                    "skipping entry"
                );
                skipped += 1;
                continue;
            }
        };
        if !file_type.is_file() {
            let reason = if file_type.is_symlink() {
                "symbolic link (follow_symlinks is off)"
            } else {
                "not a regular file"
            };
            debug!(path = %path, reason, "skipping entry");
            skipped += 1;
            continue;
        }

        if policy.excludes_file(&path) {
            debug!(path = %path, "excluded");
            continue;
        }

        files.push(path);
    }

    files.sort();

    info!(
        root = %root.display(),
        files = files.len(),
        skipped,
        "crawl complete"
    );

    Ok(files)
}

fn is_pruned(entry: &DirEntry, policy: &ExclusionPolicy) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let Some(dir) = FilePath::try_from_path(entry.path()) else {
        warn!(
            dir = %entry.path().display(),
            reason = "directory name is not valid UTF-8",
            "skipping subtree"
        );
        return true;
    };
    let pruned = policy.excludes_dir(&dir);
    if pruned {
        debug!(dir = %dir, "pruned excluded directory");
    }
    pruned
}
