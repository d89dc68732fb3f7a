//! Sequential block store scanner.

use std::time::Instant;

use chrono::Utc;
use tokio::sync::broadcast;

use dagstat_core::{BlockStats, ContentKey, DecodeOutcome, ScanConfig, ScanError, ScanReport};

use crate::blockstore::Blockstore;
use crate::decoder::decode_block;
use crate::progress::ScanProgress;

/// Drives one full pass over a block store.
///
/// Keys are consumed strictly one at a time: the next key is only pulled
/// once the current block has been fetched, decoded and folded.
pub struct BlockScanner {
    config: ScanConfig,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl BlockScanner {
    /// Create a new scanner.
    pub fn new(config: ScanConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            progress_tx,
        }
    }

    /// Scan configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Enumerate every key in `store` and scan it.
    pub fn scan<S>(&self, store: &S) -> Result<ScanReport, ScanError>
    where
        S: Blockstore + ?Sized,
    {
        let keys = store.all_keys()?;
        self.scan_keys(store, keys)
    }

    /// Scan an already opened key enumeration.
    ///
    /// Any enumeration or fetch error aborts the pass immediately; decode
    /// failures are tallied and never abort.
    pub fn scan_keys<S, I>(&self, store: &S, keys: I) -> Result<ScanReport, ScanError>
    where
        S: Blockstore + ?Sized,
        I: IntoIterator<Item = Result<ContentKey, ScanError>>,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut stats = BlockStats::new();

        for key in keys {
            let key = key?;
            let block = store.get(&key)?;
            stats.record_block(block.len());

            let outcome = decode_block(&block);
            if let DecodeOutcome::Failed(failure) = &outcome {
                tracing::trace!(%key, %failure, "block failed to decode");
            }
            stats.record_outcome(&outcome);

            if self.config.is_progress_tick(stats.blocks_processed) {
                let progress = ScanProgress::from_stats(&stats, start.elapsed());
                tracing::debug!(
                    blocks = progress.blocks_processed,
                    rate = progress.blocks_per_second(),
                    "scan progress"
                );
                // No subscribers is fine.
                let _ = self.progress_tx.send(progress);
            }
        }

        let duration = start.elapsed();
        tracing::info!(
            blocks = stats.blocks_processed,
            typed = stats.typed_total(),
            failed = stats.failed_total(),
            entries = stats.distinct_entries(),
            ?duration,
            "scan complete"
        );

        Ok(ScanReport::new(stats, started_at, duration))
    }
}

impl Default for BlockScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockstore::FlatfsBlockstore;
    use crate::codec::encode_block;
    use dagstat_core::{FsNode, Link};
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FlatfsBlockstore) {
        let temp = TempDir::new().unwrap();
        let store = FlatfsBlockstore::new(temp.path(), 2);

        let file = store.put(&encode_block(&FsNode::file("hi"), Vec::new())).unwrap();
        store
            .put(&encode_block(&FsNode::directory(), vec![Link::new("hi.txt", file, 8)]))
            .unwrap();
        store.put(&[0x0a, 0x40, 0x01]).unwrap();

        (temp, store)
    }

    #[test]
    fn test_basic_scan() {
        let (_temp, store) = create_test_store();
        let scanner = BlockScanner::default();

        let report = scanner.scan(&store).unwrap();
        let stats = &report.stats;

        assert_eq!(stats.blocks_processed, 3);
        assert_eq!(stats.type_counts["File"], 1);
        assert_eq!(stats.type_counts["Directory"], 1);
        assert_eq!(stats.error_counts["not-a-graph-node"], 1);
        assert_eq!(stats.distinct_entries(), 1);
    }

    #[test]
    fn test_progress_ticks() {
        let (_temp, store) = create_test_store();
        let config = ScanConfig::builder()
            .repo("/unused")
            .progress_interval(1u64)
            .build()
            .unwrap();
        let scanner = BlockScanner::new(config);
        let mut rx = scanner.subscribe();

        scanner.scan(&store).unwrap();

        let mut seen = Vec::new();
        while let Ok(progress) = rx.try_recv() {
            seen.push(progress.blocks_processed);
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
