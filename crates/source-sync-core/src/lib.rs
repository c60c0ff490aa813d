//! # Source Sync Core
//!
//! Pure logic shared by the source-sync engine: path normalization, the
//! exclusion policy, the fingerprint record model, and the document index
//! abstraction.
//!
//! This crate performs no filesystem I/O. Walking trees, hashing files and
//! persisting records live in the `source-sync` crate.

pub mod exclude;
pub mod index;
pub mod models;
pub mod path;

pub use exclude::ExclusionPolicy;
pub use index::{DocumentIndex, IndexError};
pub use models::{FilePath, Fingerprint, FingerprintRecord, SyncResult, TrackingReport};
