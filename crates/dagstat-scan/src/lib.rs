//! Block store scanning engine for dagstat.
//!
//! This crate opens a repository, enumerates its blocks and folds every
//! block into [`BlockStats`].
//!
//! # Overview
//!
//! - **Repository access** via [`Repository`] and the [`Blockstore`] trait
//! - **Two-stage decoding**: generic graph node, then file-system node
//! - **Failure classification** instead of errors for undecodable blocks
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use dagstat_scan::{BlockScanner, Repository, ScanConfig};
//!
//! let repo = Repository::open("/path/to/repo").unwrap();
//! let scanner = BlockScanner::new(ScanConfig::new(repo.root()));
//! let report = scanner.scan(&repo.blockstore()).unwrap();
//!
//! println!("Blocks: {}", report.blocks_processed());
//! println!("Types: {:?}", report.stats.type_counts);
//! ```
//!
//! # Fatal versus classified errors
//!
//! Opening the repository, starting the key enumeration and fetching any
//! block return [`ScanError`] and abort the pass. Blocks that fail to
//! decode are counted in [`BlockStats::error_counts`] instead:
//!
//! - `not-a-graph-node` when the generic decode fails
//! - `not-a-filesystem-node` when the payload is not a file-system message
//! - the literal error message for anything else

pub mod blockstore;
pub mod codec;
mod decoder;
mod progress;
mod repo;
mod scanner;

pub use blockstore::{Blockstore, FlatfsBlockstore, KeyIter};
pub use decoder::decode_block;
pub use progress::ScanProgress;
pub use repo::{DatastoreConfig, RepoConfig, Repository};
pub use scanner::BlockScanner;

// Re-export core types for convenience
pub use dagstat_core::{
    BlockStats, ContentKey, DagNode, DecodeFailure, DecodeOutcome, DirEntry, FsNode, Link,
    NodeType, ScanConfig, ScanError, ScanReport,
};
