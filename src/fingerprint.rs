//! Content fingerprints.
//!
//! A fingerprint is the lowercase hex SHA-256 of a file's raw bytes. No text
//! decoding or newline handling happens, and metadata (timestamps,
//! permissions) is ignored, so the same bytes produce the same fingerprint on
//! every platform.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};
use source_sync_core::Fingerprint;

use crate::error::SyncError;

/// Fingerprint the file at `path`, streaming its content through the hasher.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, SyncError> {
    let file = File::open(path).map_err(|e| SyncError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).map_err(|e| SyncError::io(path, e))?;
    Ok(Fingerprint::from_hex(format!("{:x}", hasher.finalize())))
}

/// Fingerprint an in-memory buffer.
pub fn fingerprint_bytes(data: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Fingerprint::from_hex(format!("{:x}", hasher.finalize()))
}
