//! # Source Sync
//!
//! Incremental source-tree synchronization for document indexers.
//!
//! A **build** walks a project under an exclusion policy, hands every file to
//! a [`DocumentIndex`], and records a SHA-256 fingerprint per file. An
//! **update** re-fingerprints the tracked files and replaces only the
//! documents whose content changed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────────┐
//! │ Crawler  │──▶│ Synchronizer │──▶│ DocumentIndex │
//! │ +Exclude │   │ build/update │   │  (external)   │
//! └──────────┘   └──────┬───────┘   └───────────────┘
//!                       │
//!                       ▼
//!               ┌────────────────┐
//!               │ Fingerprint    │
//!               │ store (JSON)   │
//!               └────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! srcsync --src ./myproject build --exclude-all .git --exclude-ext lock
//! # ...edit files...
//! srcsync --src ./myproject update
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`crawler`] | Exclusion-aware tree walk |
//! | [`fingerprint`] | SHA-256 content fingerprints |
//! | [`hash_store`] | Fingerprint store load/save |
//! | [`json_index`] | JSON-file document index |
//! | [`sync`] | Build and update passes |
//! | [`progress`] | Progress reporting on stderr |
//! | [`error`] | Pass error type |

pub mod config;
pub mod crawler;
pub mod error;
pub mod fingerprint;
pub mod hash_store;
pub mod json_index;
pub mod logging;
pub mod progress;
pub mod sync;

pub use error::SyncError;
pub use source_sync_core::index::memory::InMemoryIndex;
pub use source_sync_core::{
    DocumentIndex, ExclusionPolicy, FilePath, Fingerprint, FingerprintRecord, IndexError,
    SyncResult, TrackingReport,
};
pub use sync::{SyncConfig, Synchronizer};
