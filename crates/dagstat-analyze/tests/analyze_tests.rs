use std::time::Duration;

use chrono::Utc;
use dagstat_analyze::{EntryRanker, RankConfig, ScanSummary};
use dagstat_core::{BlockStats, ContentKey, DecodeFailure, FsNode, Link, NodeType, ScanReport};

fn key(seed: &str) -> ContentKey {
    ContentKey::for_block(seed.as_bytes())
}

/// Stats where entry `eN` occurs N times.
fn graded_stats(max: u64) -> BlockStats {
    let mut stats = BlockStats::new();
    for n in 1..=max {
        for _ in 0..n {
            stats.record_node(
                &FsNode::directory(),
                &[Link::new(format!("e{n}"), key(&format!("e{n}")), 0)],
            );
        }
    }
    stats
}

#[test]
fn test_rank_config_builder() {
    let config = RankConfig::builder().top_n(25usize).build().unwrap();
    assert_eq!(config.top_n, 25);

    let default_config = RankConfig::builder().build().unwrap();
    assert_eq!(default_config.top_n, 10);
}

#[test]
fn test_rank_is_non_increasing() {
    let stats = graded_stats(20);
    let ranked = EntryRanker::new().rank(&stats);

    assert_eq!(ranked.len(), 10);
    assert_eq!(ranked.distinct, 20);
    assert!(ranked.is_complete());
    for pair in ranked.entries.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
    assert_eq!(ranked.entries[0].name.as_str(), "e20");
    assert_eq!(ranked.entries[0].count, 20);
    assert_eq!(ranked.entries[9].count, 11);
}

#[test]
fn test_rank_matches_full_sort() {
    let stats = graded_stats(30);
    let top = EntryRanker::with_config(RankConfig { top_n: 7 }).rank(&stats);
    let all = EntryRanker::with_config(RankConfig { top_n: 30 }).rank(&stats);

    assert_eq!(all.len(), 30);
    assert_eq!(top.entries[..], all.entries[..7]);
}

#[test]
fn test_rank_never_pads() {
    let stats = graded_stats(3);
    let ranked = EntryRanker::new().rank(&stats);

    assert_eq!(ranked.len(), 3);
    assert!(!ranked.is_complete());
}

#[test]
fn test_rank_zero_returns_no_entries() {
    let stats = graded_stats(5);
    let ranked = EntryRanker::with_config(RankConfig { top_n: 0 }).rank(&stats);

    assert!(ranked.is_empty());
    assert_eq!(ranked.distinct, 5);
}

#[test]
fn test_rank_empty_stats() {
    let ranked = EntryRanker::new().rank(&BlockStats::new());
    assert!(ranked.is_empty());
    assert_eq!(ranked.distinct, 0);
}

#[test]
fn test_rank_is_deterministic_for_ties() {
    let mut stats = BlockStats::new();
    let links: Vec<_> = ["delta", "alpha", "charlie", "bravo"]
        .iter()
        .map(|name| Link::new(*name, key(name), 0))
        .collect();
    stats.record_node(&FsNode::directory(), &links);

    let ranked = EntryRanker::with_config(RankConfig { top_n: 3 }).rank(&stats);
    let names: Vec<_> = ranked.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
}

#[test]
fn test_summary_totals() {
    let mut stats = graded_stats(2);
    stats.record_node(&FsNode::new(NodeType::File), &[]);
    stats.record_failure(&DecodeFailure::NotGraphNode);
    for _ in 0..5 {
        stats.record_block(10);
    }

    let report = ScanReport::new(stats, Utc::now(), Duration::from_secs(2));
    let ranked = EntryRanker::new().rank(&report.stats);
    let summary = ScanSummary::new(&report, ranked);

    assert_eq!(summary.blocks_processed, 5);
    assert_eq!(summary.bytes_read, 50);
    assert_eq!(summary.typed_blocks, 4);
    assert_eq!(summary.failed_blocks, 1);
    assert_eq!(summary.types[0].key, "Directory");
    assert_eq!(summary.types[0].count, 3);
    assert_eq!(summary.errors[0].key, "not-a-graph-node");
    assert_eq!(summary.top_entries.len(), 2);
    assert_eq!(summary.blocks_per_second(), 2.5);
}

#[test]
fn test_summary_serializes() {
    let mut stats = BlockStats::new();
    let target = key("shared");
    stats.record_node(&FsNode::directory(), &[Link::new("shared", target, 0)]);

    let report = ScanReport::new(stats, Utc::now(), Duration::ZERO);
    let summary = ScanSummary::new(&report, EntryRanker::new().rank(&report.stats));
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["top_entries"][0]["name"], "shared");
    assert_eq!(json["top_entries"][0]["target"], target.to_string());
    assert_eq!(json["top_entries"][0]["count"], 1);
    assert_eq!(json["types"][0]["key"], "Directory");
}
