//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for a block store scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Repository path to open.
    pub repo: PathBuf,

    /// Number of ranked directory entries to report.
    #[builder(default = "10")]
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Emit a progress update every this many processed blocks.
    #[builder(default = "1000")]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_top_n() -> usize {
    10
}

fn default_progress_interval() -> u64 {
    1000
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref repo) = self.repo {
            if repo.as_os_str().is_empty() {
                return Err("Repository path cannot be empty".to_string());
            }
        } else {
            return Err("Repository path is required".to_string());
        }
        if self.progress_interval == Some(0) {
            return Err("Progress interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a default config for scanning a repository.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            top_n: default_top_n(),
            progress_interval: default_progress_interval(),
        }
    }

    /// Check whether `processed` blocks lands on a progress tick.
    pub fn is_progress_tick(&self, processed: u64) -> bool {
        self.progress_interval > 0 && processed % self.progress_interval == 0
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .repo("/var/repo")
            .top_n(25usize)
            .progress_interval(500u64)
            .build()
            .unwrap();

        assert_eq!(config.repo, PathBuf::from("/var/repo"));
        assert_eq!(config.top_n, 25);
        assert_eq!(config.progress_interval, 500);
    }

    #[test]
    fn test_config_defaults() {
        let config = ScanConfig::builder().repo("/var/repo").build().unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.progress_interval, 1000);
    }

    #[test]
    fn test_config_requires_repo() {
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().repo("").build().is_err());
    }

    #[test]
    fn test_config_rejects_zero_interval() {
        let result = ScanConfig::builder()
            .repo("/var/repo")
            .progress_interval(0u64)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_progress_tick() {
        let config = ScanConfig::new("/var/repo");
        assert!(!config.is_progress_tick(999));
        assert!(config.is_progress_tick(1000));
        assert!(config.is_progress_tick(2000));
    }
}
