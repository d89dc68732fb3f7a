//! Ranking and reporting for dagstat scans.
//!
//! This crate turns the aggregates of a finished scan into output:
//!
//! - **Entry ranking** - the directory entries that recur most often
//! - **Summaries** - histograms flattened into ordered rows, plus totals
//!
//! ```rust,ignore
//! use dagstat_analyze::{EntryRanker, RankConfig, ScanSummary};
//! use dagstat_scan::{BlockScanner, Repository, ScanConfig};
//!
//! let repo = Repository::open("/path/to/repo").unwrap();
//! let report = BlockScanner::new(ScanConfig::new(repo.root()))
//!     .scan(&repo.blockstore())
//!     .unwrap();
//!
//! let ranked = EntryRanker::with_config(RankConfig { top_n: 10 }).rank(&report.stats);
//! for entry in &ranked.entries {
//!     println!("{} {} {}", entry.name, entry.target, entry.count);
//! }
//!
//! let summary = ScanSummary::new(&report, ranked);
//! println!("{} block types", summary.types.len());
//! ```

mod ranking;
mod summary;

pub use ranking::{EntryRanker, RankConfig, RankConfigBuilder, RankedEntries};
pub use summary::{HistogramRow, ScanSummary, histogram_rows};

// Re-export core types
pub use dagstat_core::{BlockStats, DirEntry, ScanReport};
