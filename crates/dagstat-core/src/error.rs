//! Error types for scanning operations.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::ContentKey;

/// Fatal errors that abort a scan.
///
/// These mean the store itself is inaccessible or corrupt; a scan never
/// continues past one of them.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Path is not an initialized repository.
    #[error("Not a repository: {path} ({reason})")]
    NotARepository { path: PathBuf, reason: String },

    /// Repository config file could not be parsed.
    #[error("Invalid repository config at {path}: {source}")]
    InvalidRepoConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Key enumeration failed.
    #[error("Key enumeration failed under {path}: {message}")]
    Enumerate { path: PathBuf, message: String },

    /// A key was enumerated but its block is gone.
    #[error("Block not found: {key}")]
    BlockNotFound { key: ContentKey },

    /// Reading a block failed.
    #[error("Failed to fetch block {key}: {source}")]
    Fetch {
        key: ContentKey,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a fetch error, mapping a missing file to `BlockNotFound`.
    pub fn fetch(key: ContentKey, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::BlockNotFound { key },
            _ => Self::Fetch { key, source },
        }
    }
}

/// Classified, recoverable decode failure of a single block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodeFailure {
    /// The generic graph-node decode failed.
    NotGraphNode,
    /// The payload is valid protobuf but not a file-system node.
    NotFilesystemNode,
    /// Any other typed decode error, keyed by its literal message.
    Other(String),
}

impl DecodeFailure {
    pub const NOT_GRAPH_NODE: &'static str = "not-a-graph-node";
    pub const NOT_FILESYSTEM_NODE: &'static str = "not-a-filesystem-node";

    /// Histogram key for this failure.
    ///
    /// `Other` messages are used verbatim so distinct errors never merge.
    pub fn as_key(&self) -> &str {
        match self {
            DecodeFailure::NotGraphNode => Self::NOT_GRAPH_NODE,
            DecodeFailure::NotFilesystemNode => Self::NOT_FILESYSTEM_NODE,
            DecodeFailure::Other(message) => message,
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}
