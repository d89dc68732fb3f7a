//! Running block statistics folded during a scan.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::DecodeFailure;
use crate::key::ContentKey;
use crate::node::{DirEntry, DirEntryKey, FsNode, Link};

/// Result of running the decoder chain over one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Both decode stages succeeded.
    Typed { node: FsNode, links: Vec<Link> },
    /// One of the decode stages failed.
    Failed(DecodeFailure),
}

/// Aggregates built over one scan pass.
///
/// Counts only ever grow: nothing is decremented or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockStats {
    /// Type tag -> number of blocks that decoded as that type.
    pub type_counts: BTreeMap<String, u64>,
    /// Failure classification -> number of blocks that failed that way.
    pub error_counts: BTreeMap<String, u64>,
    /// Directory entry -> occurrences across all directory nodes.
    #[serde(skip)]
    entries: HashMap<DirEntryKey, u64>,
    /// Blocks processed so far, whatever their outcome.
    pub blocks_processed: u64,
    /// Raw bytes fetched so far.
    pub bytes_read: u64,
}

impl BlockStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one fetched block before it is decoded.
    pub fn record_block(&mut self, size: usize) {
        self.blocks_processed += 1;
        self.bytes_read += size as u64;
    }

    /// Fold a decoder chain outcome.
    pub fn record_outcome(&mut self, outcome: &DecodeOutcome) {
        match outcome {
            DecodeOutcome::Typed { node, links } => self.record_node(node, links),
            DecodeOutcome::Failed(failure) => self.record_failure(failure),
        }
    }

    /// Fold a successfully decoded node.
    ///
    /// Directory links are counted with multiplicity, including repeats
    /// within the same node.
    pub fn record_node(&mut self, node: &FsNode, links: &[Link]) {
        *self
            .type_counts
            .entry(node.node_type.to_string())
            .or_insert(0) += 1;

        if node.node_type.is_dir() {
            for link in links {
                *self.entries.entry(link.entry_key()).or_insert(0) += 1;
            }
        }
    }

    /// Fold a classified decode failure.
    pub fn record_failure(&mut self, failure: &DecodeFailure) {
        // Avoid allocating for the common repeated keys.
        if let Some(count) = self.error_counts.get_mut(failure.as_key()) {
            *count += 1;
        } else {
            self.error_counts.insert(failure.as_key().to_string(), 1);
        }
    }

    /// Number of blocks that passed both decode stages.
    pub fn typed_total(&self) -> u64 {
        self.type_counts.values().sum()
    }

    /// Number of blocks that failed either decode stage.
    pub fn failed_total(&self) -> u64 {
        self.error_counts.values().sum()
    }

    /// Occurrence count of one `(name, target)` entry (0 if never seen).
    pub fn entry_count(&self, name: &str, target: ContentKey) -> u64 {
        self.entries
            .get(&DirEntryKey::new(name, target))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct directory entries seen.
    pub fn distinct_entries(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over all directory entry records, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = DirEntry> + '_ {
        self.entries.iter().map(|(key, &count)| DirEntry {
            name: key.name.clone(),
            target: key.target,
            count,
        })
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.blocks_processed == 0
            && self.type_counts.is_empty()
            && self.error_counts.is_empty()
            && self.entries.is_empty()
    }
}
