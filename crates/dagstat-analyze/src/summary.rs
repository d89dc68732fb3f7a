//! Renderable summary of a finished scan.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;

use dagstat_core::{DirEntry, ScanReport};

use crate::ranking::RankedEntries;

/// One histogram bucket with its share of the histogram total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramRow {
    pub key: String,
    pub count: u64,
    /// Percentage of the histogram total, 0.0 to 100.0.
    pub percent: f64,
}

/// Everything a caller renders after a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// When the scan started.
    pub started_at: DateTime<Utc>,
    /// Scan duration in seconds.
    pub duration_secs: f64,
    /// Blocks processed.
    pub blocks_processed: u64,
    /// Raw bytes fetched.
    pub bytes_read: u64,
    /// Blocks that decoded as file-system nodes.
    pub typed_blocks: u64,
    /// Blocks that failed to decode.
    pub failed_blocks: u64,
    /// Distinct directory entries seen.
    pub distinct_entries: usize,
    /// Most frequent directory entries, in rank order.
    pub top_entries: Vec<DirEntry>,
    /// Node type histogram, most frequent first.
    pub types: Vec<HistogramRow>,
    /// Decode failure histogram, most frequent first.
    pub errors: Vec<HistogramRow>,
}

impl ScanSummary {
    /// Build a summary from a finished scan and its ranked entries.
    pub fn new(report: &ScanReport, ranked: RankedEntries) -> Self {
        let stats = &report.stats;
        Self {
            started_at: report.started_at,
            duration_secs: report.duration.as_secs_f64(),
            blocks_processed: stats.blocks_processed,
            bytes_read: stats.bytes_read,
            typed_blocks: stats.typed_total(),
            failed_blocks: stats.failed_total(),
            distinct_entries: stats.distinct_entries(),
            top_entries: ranked.entries,
            types: histogram_rows(&stats.type_counts),
            errors: histogram_rows(&stats.error_counts),
        }
    }

    /// Blocks processed per second.
    pub fn blocks_per_second(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.blocks_processed as f64 / self.duration_secs
        } else {
            0.0
        }
    }
}

/// Flatten a histogram into rows, most frequent first, then by key.
pub fn histogram_rows(histogram: &BTreeMap<String, u64>) -> Vec<HistogramRow> {
    let total: u64 = histogram.values().sum();
    histogram
        .iter()
        .sorted_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)))
        .map(|(key, &count)| HistogramRow {
            key: key.clone(),
            count,
            percent: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_rows_order() {
        let mut histogram = BTreeMap::new();
        histogram.insert("File".to_string(), 3);
        histogram.insert("Directory".to_string(), 1);
        histogram.insert("Raw".to_string(), 3);

        let rows = histogram_rows(&histogram);
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["File", "Raw", "Directory"]);
        assert!((rows[0].percent - 42.857).abs() < 0.01);
    }

    #[test]
    fn test_histogram_rows_empty() {
        assert!(histogram_rows(&BTreeMap::new()).is_empty());
    }
}
