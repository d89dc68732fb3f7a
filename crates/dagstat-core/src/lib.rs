//! Core types and aggregates for dagstat.
//!
//! This crate provides the fundamental data structures shared by the
//! dagstat crates: content keys, decoded node models, the fatal error
//! taxonomy, scan configuration, and the running block statistics that a
//! scan folds every decoded block into.

mod config;
mod error;
mod key;
mod node;
mod report;
mod stats;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{DecodeFailure, ScanError};
pub use key::ContentKey;
pub use node::{DagNode, DirEntry, DirEntryKey, FsNode, Link, NodeType};
pub use report::ScanReport;
pub use stats::{BlockStats, DecodeOutcome};
