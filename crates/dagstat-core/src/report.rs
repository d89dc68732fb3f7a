//! Completed scan container.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stats::BlockStats;

/// Fully built aggregates of one finished scan pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Aggregates folded from every block.
    pub stats: BlockStats,

    /// When the scan started.
    pub started_at: DateTime<Utc>,

    /// Duration of the scan.
    pub duration: Duration,
}

impl ScanReport {
    /// Create a new scan report.
    pub fn new(stats: BlockStats, started_at: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            stats,
            started_at,
            duration,
        }
    }

    /// Number of blocks processed.
    pub fn blocks_processed(&self) -> u64 {
        self.stats.blocks_processed
    }

    /// Check if the scanned store held no blocks.
    pub fn is_empty(&self) -> bool {
        self.stats.blocks_processed == 0
    }
}
