//! On-disk repository handle.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dagstat_core::ScanError;

use crate::blockstore::FlatfsBlockstore;

/// Name of the repository config file.
pub const CONFIG_FILE: &str = "config";

/// Repository configuration stored as JSON in `<repo>/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoConfig {
    #[serde(default)]
    pub datastore: DatastoreConfig,
}

/// Flat-file datastore layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatastoreConfig {
    /// Block directory, relative to the repository root.
    #[serde(default = "default_blocks_path")]
    pub path: PathBuf,

    /// Characters of the key name used for the shard directory.
    #[serde(default = "default_shard_length")]
    pub shard_length: usize,
}

fn default_blocks_path() -> PathBuf {
    PathBuf::from("blocks")
}

fn default_shard_length() -> usize {
    2
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            path: default_blocks_path(),
            shard_length: default_shard_length(),
        }
    }
}

/// An opened repository.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    config: RepoConfig,
}

impl Repository {
    /// Open an existing repository.
    ///
    /// Fails when `path` is not a directory, has no readable config, or
    /// its block directory is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ScanError::NotARepository {
                path: root,
                reason: "not a directory".to_string(),
            });
        }

        let config_path = root.join(CONFIG_FILE);
        let raw = match fs::read_to_string(&config_path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScanError::NotARepository {
                    path: root,
                    reason: format!("no {CONFIG_FILE} file"),
                });
            }
            Err(err) => return Err(ScanError::io(config_path, err)),
        };
        let config: RepoConfig = serde_json::from_str(&raw).map_err(|source| {
            ScanError::InvalidRepoConfig {
                path: config_path.clone(),
                source,
            }
        })?;

        let repo = Self { root, config };
        let blocks = repo.blocks_dir();
        if !blocks.is_dir() {
            return Err(ScanError::NotARepository {
                path: repo.root,
                reason: format!("missing block directory {}", blocks.display()),
            });
        }

        tracing::debug!(root = %repo.root.display(), "opened repository");
        Ok(repo)
    }

    /// Create an empty repository with the default layout.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        Self::init_with_config(path, RepoConfig::default())
    }

    /// Create an empty repository with the given layout.
    pub fn init_with_config(path: impl AsRef<Path>, config: RepoConfig) -> Result<Self, ScanError> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| ScanError::io(&root, e))?;

        let config_path = root.join(CONFIG_FILE);
        let raw = serde_json::to_string_pretty(&config).map_err(|source| {
            ScanError::InvalidRepoConfig {
                path: config_path.clone(),
                source,
            }
        })?;
        fs::write(&config_path, raw).map_err(|e| ScanError::io(&config_path, e))?;

        let repo = Self { root, config };
        let blocks = repo.blocks_dir();
        fs::create_dir_all(&blocks).map_err(|e| ScanError::io(&blocks, e))?;
        Ok(repo)
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parsed repository configuration.
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Absolute path of the block directory.
    pub fn blocks_dir(&self) -> PathBuf {
        self.root.join(&self.config.datastore.path)
    }

    /// Block store view over this repository's datastore.
    pub fn blockstore(&self) -> FlatfsBlockstore {
        FlatfsBlockstore::new(self.blocks_dir(), self.config.datastore.shard_length)
    }
}
