//! Top-N ranking of recurring directory entries.
//!
//! Entries are ordered by occurrence count, highest first. Equal counts
//! are broken by name and then by target key bytes, so the output does
//! not depend on the aggregate's iteration order.

use std::cmp::Ordering;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use dagstat_core::{BlockStats, DirEntry};

/// Configuration for entry ranking.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct RankConfig {
    /// Maximum number of entries to return.
    #[builder(default = "10")]
    pub top_n: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl RankConfig {
    /// Create a new config builder.
    pub fn builder() -> RankConfigBuilder {
        RankConfigBuilder::default()
    }
}

/// Ranked directory entries.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntries {
    /// Entries in rank order.
    pub entries: Vec<DirEntry>,

    /// Number of entries asked for.
    pub requested: usize,

    /// Distinct entries available in the aggregate.
    pub distinct: usize,
}

impl RankedEntries {
    /// Whether as many entries as requested were available.
    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.requested
    }

    /// Check if no entries were ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of ranked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Selects the most frequent directory entries from scan stats.
pub struct EntryRanker {
    config: RankConfig,
}

impl EntryRanker {
    /// Create a new ranker with default config.
    pub fn new() -> Self {
        Self {
            config: RankConfig::default(),
        }
    }

    /// Create a new ranker with custom config.
    pub fn with_config(config: RankConfig) -> Self {
        Self { config }
    }

    /// Rank the directory entries of `stats`.
    ///
    /// Returns fewer than `top_n` entries only when fewer distinct entries
    /// exist; nothing is padded.
    pub fn rank(&self, stats: &BlockStats) -> RankedEntries {
        self.rank_entries(stats.entries().collect())
    }

    /// Rank an arbitrary set of entry records.
    pub fn rank_entries(&self, mut entries: Vec<DirEntry>) -> RankedEntries {
        let distinct = entries.len();
        let keep = self.config.top_n.min(distinct);

        if keep == 0 {
            entries.clear();
        } else if keep < distinct {
            // Partition so the first `keep` entries are the winners; only
            // those need a full sort.
            entries.select_nth_unstable_by(keep - 1, rank_order);
            entries.truncate(keep);
        }
        entries.sort_unstable_by(rank_order);

        if keep < self.config.top_n {
            tracing::debug!(
                requested = self.config.top_n,
                available = distinct,
                "fewer distinct entries than requested"
            );
        }

        RankedEntries {
            entries,
            requested: self.config.top_n,
            distinct,
        }
    }
}

impl Default for EntryRanker {
    fn default() -> Self {
        Self::new()
    }
}

/// Count descending, then name, then target key.
fn rank_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.target.cmp(&b.target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagstat_core::ContentKey;

    fn entry(name: &str, seed: &[u8], count: u64) -> DirEntry {
        DirEntry {
            name: name.into(),
            target: ContentKey::for_block(seed),
            count,
        }
    }

    #[test]
    fn test_rank_order_ties() {
        let ranker = EntryRanker::with_config(RankConfig { top_n: 3 });
        let ranked = ranker.rank_entries(vec![
            entry("b", b"1", 5),
            entry("a", b"2", 5),
            entry("c", b"3", 9),
        ]);

        let names: Vec<_> = ranked.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_same_name_tie_uses_key() {
        let first = entry("x", b"1", 2);
        let second = entry("x", b"2", 2);
        let (lo, hi) = if first.target < second.target {
            (first.clone(), second.clone())
        } else {
            (second.clone(), first.clone())
        };

        let ranked = EntryRanker::new().rank_entries(vec![hi.clone(), lo.clone()]);
        assert_eq!(ranked.entries, vec![lo, hi]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let ranker = EntryRanker::with_config(RankConfig { top_n: 2 });
        let ranked = ranker.rank_entries(vec![
            entry("a", b"a", 1),
            entry("b", b"b", 4),
            entry("c", b"c", 3),
            entry("d", b"d", 2),
        ]);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked.entries[0].name.as_str(), "b");
        assert_eq!(ranked.entries[1].name.as_str(), "c");
        assert!(ranked.is_complete());
        assert_eq!(ranked.distinct, 4);
    }

    #[test]
    fn test_zero_requested_returns_nothing() {
        let ranker = EntryRanker::with_config(RankConfig { top_n: 0 });
        let ranked = ranker.rank_entries(vec![entry("a", b"a", 3), entry("b", b"b", 1)]);

        assert!(ranked.is_empty());
        assert!(ranked.is_complete());
        assert_eq!(ranked.distinct, 2);
    }

    #[test]
    fn test_insufficient_entries() {
        let ranked = EntryRanker::new().rank_entries(vec![entry("only", b"o", 1)]);
        assert_eq!(ranked.len(), 1);
        assert!(!ranked.is_complete());
    }
}
