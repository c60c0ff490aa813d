//! Fingerprint store: the on-disk baseline of a synchronization.
//!
//! The store is a flat, pretty-printed JSON object mapping normalized paths
//! to hex digests, sorted by path:
//!
//! ```json
//! {
//!   "proj/a.py": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
//!   "proj/sub/c.py": "60303ae22b998861bce3b28f33eec1be758a213c86c93c076dbe9f558c11c752"
//! }
//! ```
//!
//! There is no schema version; changing the format is a breaking change.
//! Writes replace the whole file through a temporary sibling and a rename, so
//! a crash mid-write leaves the previous snapshot intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use source_sync_core::FingerprintRecord;
use tracing::debug;

use crate::error::SyncError;

/// Load the record stored at `path`.
///
/// A missing file is [`SyncError::NotFound`]; content that is not a flat
/// string-to-string JSON object, including content that is not UTF-8, is
/// [`SyncError::Format`]. An empty object is
/// a valid, empty record.
pub fn load(path: &Path) -> Result<FingerprintRecord, SyncError> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SyncError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(SyncError::io(path, e)),
    };

    let record: FingerprintRecord =
        serde_json::from_slice(&content).map_err(|source| SyncError::Format {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), entries = record.len(), "loaded fingerprint store");
    Ok(record)
}

/// Overwrite the store at `path` with `record`.
pub fn save(path: &Path, record: &FingerprintRecord) -> Result<(), SyncError> {
    write_json_atomic(path, record).map_err(|e| SyncError::io(path, e))?;
    debug!(path = %path.display(), entries = record.len(), "saved fingerprint store");
    Ok(())
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// Parent directories are created when missing.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
