use anyhow::{Context, Result};
use serde::Deserialize;
use source_sync_core::ExclusionPolicy;
use std::path::{Path, PathBuf};

use crate::sync::SyncConfig;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub exclude: ExcludeConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_hash_file")]
    pub hash_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            hash_file: default_hash_file(),
        }
    }
}

fn default_hash_file() -> PathBuf {
    PathBuf::from("project_hashes.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_index_path")]
    pub path: PathBuf,
    /// Prefix each document with a `File Path: <id>` header line.
    #[serde(default = "default_path_header")]
    pub path_header: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            path_header: default_path_header(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from(".srcsync/index.json")
}
fn default_path_header() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExcludeConfig {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CrawlConfig {
    #[serde(default)]
    pub follow_symlinks: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncSection {
    #[serde(default)]
    pub report_untracked: bool,
}

impl Config {
    /// Configuration used when no file is given: every value at its default.
    pub fn minimal() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.project.root.as_os_str().is_empty() {
            anyhow::bail!("project.root must not be empty");
        }
        if self.store.hash_file.as_os_str().is_empty() {
            anyhow::bail!("store.hash_file must not be empty");
        }
        if self.index.path.as_os_str().is_empty() {
            anyhow::bail!("index.path must not be empty");
        }

        let lists = [
            ("exclude.paths", &self.exclude.paths),
            ("exclude.names", &self.exclude.names),
            ("exclude.extensions", &self.exclude.extensions),
        ];
        for (field, values) in lists {
            if values.iter().any(|v| v.trim().is_empty()) {
                anyhow::bail!("{} must not contain empty entries", field);
            }
        }
        let has_separator = |n: &String| n.chars().any(std::path::is_separator);
        if self.exclude.names.iter().any(has_separator) {
            anyhow::bail!("exclude.names takes bare names; use exclude.paths for paths");
        }
        if self.exclude.extensions.iter().any(|e| e == ".") {
            anyhow::bail!("exclude.extensions must not contain a bare '.'");
        }

        Ok(())
    }

    /// Build the value handed to the synchronizer.
    ///
    /// The index file is always excluded from crawls so the index never
    /// ingests itself.
    pub fn sync_config(&self) -> SyncConfig {
        let mut policy = ExclusionPolicy::new(
            &self.exclude.paths,
            &self.exclude.names,
            &self.exclude.extensions,
        );
        policy.add_path(&self.index.path.to_string_lossy());

        SyncConfig {
            root: self.project.root.clone(),
            hash_file: self.store.hash_file.clone(),
            policy,
            follow_symlinks: self.crawl.follow_symlinks,
            report_untracked: self.sync.report_untracked,
            path_header: self.index.path_header,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_sync_core::FilePath;

    #[test]
    fn test_minimal_defaults() {
        let cfg = Config::minimal();
        assert_eq!(cfg.project.root, PathBuf::from("."));
        assert_eq!(cfg.store.hash_file, PathBuf::from("project_hashes.json"));
        assert!(cfg.index.path_header);
        assert!(!cfg.crawl.follow_symlinks);
        assert!(!cfg.sync.report_untracked);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_parse_full_file() {
        let cfg: Config = toml::from_str(
            r#"
[project]
root = "proj"

[store]
hash_file = "proj/hashes.json"

[index]
path = "out/index.json"
path_header = false

[exclude]
paths = ["proj/vendor"]
names = [".git", "__pycache__"]
extensions = ["txt", ".lock"]

[crawl]
follow_symlinks = true

[sync]
report_untracked = true
"#,
        )
        .unwrap();
        cfg.validate().unwrap();

        let sync = cfg.sync_config();
        assert_eq!(sync.root, PathBuf::from("proj"));
        assert!(sync.follow_symlinks);
        assert!(sync.report_untracked);
        assert!(!sync.path_header);
        assert!(sync.policy.excludes_dir(&FilePath::new("proj/vendor")));
        assert!(sync.policy.excludes_dir(&FilePath::new("proj/x/.git")));
        assert!(sync.policy.excludes_file(&FilePath::new("proj/Cargo.lock")));
        assert!(sync.policy.excludes_file(&FilePath::new("out/index.json")));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg: Config = toml::from_str("[exclude]\nnames = [\"target\"]\n").unwrap();
        assert_eq!(cfg.store.hash_file, PathBuf::from("project_hashes.json"));
        assert_eq!(cfg.exclude.names, vec!["target".to_string()]);
    }

    #[test]
    fn test_validation_rejects_bad_entries() {
        let mut cfg = Config::minimal();
        cfg.exclude.extensions.push(String::new());
        assert!(cfg.validate().is_err());

        let mut cfg = Config::minimal();
        cfg.exclude.names.push("a/b".to_string());
        assert!(cfg.validate().is_err());

        let mut cfg = Config::minimal();
        cfg.store.hash_file = PathBuf::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
