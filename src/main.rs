//! # Source Sync CLI (`srcsync`)
//!
//! Keeps a document index in step with a source tree.
//!
//! ## Usage
//!
//! ```bash
//! srcsync [--config ./srcsync.toml] [--src <dir>] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `srcsync build` | Index every eligible file into an empty index and write the fingerprint store |
//! | `srcsync update` | Re-index tracked files whose content changed since the last build or update |
//!
//! ## Examples
//!
//! ```bash
//! # First synchronization, skipping VCS data, lock files and one vendored dir
//! srcsync --src ./proj build --exclude-all .git --exclude-ext lock -e ./proj/vendor
//!
//! # Later: pick up edits
//! srcsync --src ./proj update
//!
//! # Also list files added since the last build
//! srcsync --src ./proj update --report-untracked
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use source_sync::config::{self, Config};
use source_sync::json_index::JsonFileIndex;
use source_sync::logging;
use source_sync::progress::ProgressMode;
use source_sync::{SyncConfig, SyncResult, Synchronizer, TrackingReport};

/// Source Sync CLI: incremental source-tree synchronization for document
/// indexers.
#[derive(Parser)]
#[command(
    name = "srcsync",
    about = "Source Sync: keep a document index in step with a source tree",
    version,
    long_about = "Source Sync walks a project tree under an exclusion policy, feeds every \
    eligible file to a document index, and fingerprints each file so later updates only \
    re-index what changed."
)]
struct Cli {
    /// Path to a configuration file (TOML). Optional; every setting has a default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project source directory to crawl. Overrides `[project].root`.
    #[arg(short, long, global = true)]
    src: Option<PathBuf>,

    /// Document index file. Overrides `[index].path`.
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    /// Progress on stderr: `auto` (human when stderr is a TTY), `human`, `json`, or `off`.
    #[arg(long, global = true, default_value = "auto")]
    progress: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Index the whole tree and write a fresh fingerprint store.
    ///
    /// Refuses to run when the index already holds documents; use `update`
    /// for an existing index.
    Build {
        /// Fingerprint store file. Overrides `[store].hash_file`.
        #[arg(short = 'f', long)]
        hash_file: Option<PathBuf>,

        /// Exclude one file or directory at exactly this path. Repeatable.
        #[arg(short = 'e', long = "exclude", value_name = "PATH")]
        exclude: Vec<String>,

        /// Exclude a file or directory name wherever it occurs. Repeatable.
        #[arg(long = "exclude-all", value_name = "NAME")]
        exclude_all: Vec<String>,

        /// Exclude a file extension (without the dot) everywhere. Repeatable.
        #[arg(long = "exclude-ext", value_name = "EXT")]
        exclude_ext: Vec<String>,
    },

    /// Re-index tracked files whose content changed.
    ///
    /// Only files recorded in the fingerprint store are examined. Missing
    /// files are reported; new files are reported with `--report-untracked`.
    Update {
        /// Fingerprint store file. Overrides `[store].hash_file`.
        #[arg(short = 'f', long)]
        hash_file: Option<PathBuf>,

        /// Also list eligible files that the store does not track.
        #[arg(long)]
        report_untracked: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::minimal(),
    };
    if let Some(src) = cli.src {
        cfg.project.root = src;
    }
    if let Some(index) = cli.index {
        cfg.index.path = index;
    }
    let progress = ProgressMode::parse(&cli.progress)?.reporter();

    match cli.command {
        Commands::Build {
            hash_file,
            exclude,
            exclude_all,
            exclude_ext,
        } => {
            if let Some(hash_file) = hash_file {
                cfg.store.hash_file = hash_file;
            }
            cfg.exclude.paths.extend(exclude);
            cfg.exclude.names.extend(exclude_all);
            cfg.exclude.extensions.extend(exclude_ext);
            cfg.validate()?;

            let mut sync = open_synchronizer(&cfg)?.with_progress(progress);
            let result = sync.build().context("build failed")?;
            print_result("build", sync.config(), sync.index().path(), &result);
        }
        Commands::Update {
            hash_file,
            report_untracked,
        } => {
            if let Some(hash_file) = hash_file {
                cfg.store.hash_file = hash_file;
            }
            cfg.sync.report_untracked |= report_untracked;
            cfg.validate()?;

            let mut sync = open_synchronizer(&cfg)?.with_progress(progress);
            let result = sync.update().context("update failed")?;
            print_result("update", sync.config(), sync.index().path(), &result);
        }
    }

    Ok(())
}

fn open_synchronizer(cfg: &Config) -> anyhow::Result<Synchronizer<JsonFileIndex>> {
    let index = JsonFileIndex::open(&cfg.index.path)
        .with_context(|| format!("Failed to open index: {}", cfg.index.path.display()))?;
    Ok(Synchronizer::new(cfg.sync_config(), index))
}

fn print_result(mode: &str, config: &SyncConfig, index_path: &Path, result: &SyncResult) {
    println!("{} {}", mode, config.root.display());
    match result {
        SyncResult::Built { indexed } => {
            println!("  indexed files: {}", indexed.len());
            println!("  document index: {}", index_path.display());
            println!("  fingerprint store: {}", config.hash_file.display());
        }
        SyncResult::Updated { changed, tracking } => {
            println!("  updated files: {}", changed.len());
            for file in changed {
                println!("    {}", file);
            }
            print_tracking(config, tracking);
            println!("  document index: {}", index_path.display());
            println!("  fingerprint store: {}", config.hash_file.display());
        }
        SyncResult::NoChanges { tracking } => {
            println!("  nothing to update");
            print_tracking(config, tracking);
        }
    }
    println!("ok");
}

fn print_tracking(config: &SyncConfig, tracking: &TrackingReport) {
    println!("  missing files: {}", tracking.missing.len());
    for file in &tracking.missing {
        println!("    {}", file);
    }
    if config.report_untracked {
        println!("  untracked files: {}", tracking.untracked.len());
        for file in &tracking.untracked {
            println!("    {}", file);
        }
    }
}
