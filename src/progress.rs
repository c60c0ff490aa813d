//! Sync progress reporting.
//!
//! Reports observable progress during `srcsync build` and `srcsync update` so
//! users see which phase a pass is in and how much is left. Progress is
//! emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

use anyhow::{bail, Result};

/// A single progress event for a synchronization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncProgressEvent {
    /// Walking the source tree. Total unknown.
    Discovering { root: String },
    /// Build: n of total files handed to the index.
    Ingesting { n: u64, total: u64 },
    /// n of total files fingerprinted.
    Fingerprinting { n: u64, total: u64 },
    /// Update: n of total changed files replaced in the index.
    Replacing { n: u64, total: u64 },
}

impl SyncProgressEvent {
    fn phase(&self) -> &'static str {
        match self {
            SyncProgressEvent::Discovering { .. } => "discovering",
            SyncProgressEvent::Ingesting { .. } => "ingesting",
            SyncProgressEvent::Fingerprinting { .. } => "fingerprinting",
            SyncProgressEvent::Replacing { .. } => "replacing",
        }
    }

    fn counts(&self) -> Option<(u64, u64)> {
        match *self {
            SyncProgressEvent::Discovering { .. } => None,
            SyncProgressEvent::Ingesting { n, total }
            | SyncProgressEvent::Fingerprinting { n, total }
            | SyncProgressEvent::Replacing { n, total } => Some((n, total)),
        }
    }
}

/// Reports sync progress. Implementations write to stderr (human or JSON).
pub trait SyncProgressReporter {
    /// Emit a progress event. Called from the synchronizer.
    fn report(&self, event: SyncProgressEvent);
}

/// Human-friendly progress on stderr: "sync  fingerprinting  1,234 / 5,000 files".
pub struct StderrProgress;

impl SyncProgressReporter for StderrProgress {
    fn report(&self, event: SyncProgressEvent) {
        let line = match (&event, event.counts()) {
            (SyncProgressEvent::Discovering { root }, _) => {
                format!("sync {}  discovering...\n", root)
            }
            (_, Some((n, total))) => format!(
                "sync  {}  {} / {} files\n",
                event.phase(),
                format_number(n),
                format_number(total)
            ),
            (_, None) => format!("sync  {}\n", event.phase()),
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl SyncProgressReporter for JsonProgress {
    fn report(&self, event: SyncProgressEvent) {
        let obj = match (&event, event.counts()) {
            (SyncProgressEvent::Discovering { root }, _) => serde_json::json!({
                "event": "progress",
                "phase": event.phase(),
                "root": root
            }),
            (_, counts) => {
                let (n, total) = counts.unwrap_or_default();
                serde_json::json!({
                    "event": "progress",
                    "phase": event.phase(),
                    "n": n,
                    "total": total
                })
            }
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl SyncProgressReporter for NoProgress {
    fn report(&self, _event: SyncProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse a `--progress` value: `auto`, `human`, `json`, or `off`.
    pub fn parse(value: &str) -> Result<Self> {
        Ok(match value {
            "auto" => Self::default_for_tty(),
            "human" => ProgressMode::Human,
            "json" => ProgressMode::Json,
            "off" => ProgressMode::Off,
            other => bail!(
                "Unknown progress mode: '{}'. Must be auto, human, json, or off.",
                other
            ),
        })
    }

    /// Build a reporter for this mode. Caller passes it to the synchronizer.
    pub fn reporter(&self) -> Box<dyn SyncProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
