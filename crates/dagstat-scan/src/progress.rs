//! Scan progress reporting.

use std::time::Duration;

use dagstat_core::BlockStats;

/// Liveness snapshot emitted while a scan runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    /// Number of blocks processed so far.
    pub blocks_processed: u64,
    /// Raw bytes fetched so far.
    pub bytes_read: u64,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            blocks_processed: 0,
            bytes_read: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Snapshot the counters of running stats.
    pub fn from_stats(stats: &BlockStats, elapsed: Duration) -> Self {
        Self {
            blocks_processed: stats.blocks_processed,
            bytes_read: stats.bytes_read,
            elapsed,
        }
    }

    /// Calculate scan rate in blocks per second.
    pub fn blocks_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.blocks_processed as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}
