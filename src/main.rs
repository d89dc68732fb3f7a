//! dagstat - block store census.
//!
//! Usage:
//!   dagstat <REPO>                 Scan a repository and print the report
//!   dagstat <REPO> -n 25           Show the 25 most frequent directory entries
//!   dagstat <REPO> --format json   Emit the report as JSON
//!   dagstat --help                 Show help

use std::path::PathBuf;
use std::thread;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

use dagstat_analyze::{EntryRanker, HistogramRow, RankConfig, RankedEntries, ScanSummary};
use dagstat_core::{ScanConfig, ScanReport};
use dagstat_scan::{BlockScanner, Blockstore, Repository, ScanProgress};

#[derive(Parser)]
#[command(
    name = "dagstat",
    version,
    about = "Node type, decode failure and directory entry statistics for a block store",
    long_about = "dagstat reads every block of a repository, classifies it as a \
                  file-system node or a decode failure, and reports which directory \
                  entries (name + target key) recur most often across the store."
)]
struct Cli {
    /// Repository to scan
    repo: PathBuf,

    /// Number of top directory entries to show
    #[arg(short = 'n', long, default_value = "10")]
    top: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();
    run(cli)
}

/// Install a stderr subscriber filtered by `RUST_LOG` (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Open the repository, scan it and print the report.
fn run(cli: Cli) -> Result<()> {
    let config = ScanConfig::builder()
        .repo(cli.repo.clone())
        .top_n(cli.top)
        .build()
        .context("Invalid arguments")?;

    // Status lines go to stdout for text output and stderr for JSON, so
    // that JSON output stays machine readable.
    let json = cli.format == OutputFormat::Json;
    let status = move |line: String| {
        if json {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    };

    status(format!("opening repo at {}", config.repo.display()));
    let repo = Repository::open(&config.repo).context("Failed to open repository")?;

    status("repo opened, starting key enumeration".to_string());
    let store = repo.blockstore();
    let keys = store.all_keys().context("Failed to start key enumeration")?;

    status("key enumeration started, beginning processing".to_string());
    let scanner = BlockScanner::new(config.clone());
    let progress_rx = scanner.subscribe();
    let printer = thread::spawn(move || print_progress(progress_rx, status));

    let result = scanner.scan_keys(&store, keys);
    // Dropping the scanner closes the progress channel.
    drop(scanner);
    let skipped = printer
        .join()
        .map_err(|_| eyre!("progress printer panicked"))?;
    if skipped > 0 {
        tracing::warn!(skipped, "progress output fell behind, some ticks were not printed");
    }
    let report: ScanReport = result.context("Scan failed")?;
    tracing::debug!(blocks = report.blocks_processed(), "scan finished, rendering report");

    let ranked = EntryRanker::with_config(RankConfig { top_n: config.top_n }).rank(&report.stats);

    match cli.format {
        OutputFormat::Text => print_text(&ranked, &ScanSummary::new(&report, ranked.clone())),
        OutputFormat::Json => {
            let summary = ScanSummary::new(&report, ranked);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Print a "processed: N" line per progress tick until the channel closes.
///
/// Returns the number of ticks dropped because the printer fell behind.
fn print_progress(
    mut rx: broadcast::Receiver<ScanProgress>,
    status: impl Fn(String),
) -> u64 {
    let mut skipped = 0;
    loop {
        match rx.blocking_recv() {
            Ok(progress) => status(format!("processed: {}", progress.blocks_processed)),
            Err(RecvError::Lagged(n)) => {
                tracing::debug!(missed = n, "progress receiver lagged");
                skipped += n;
            }
            Err(RecvError::Closed) => break,
        }
    }
    skipped
}

/// Print the ranked entries and both histograms.
fn print_text(ranked: &RankedEntries, summary: &ScanSummary) {
    println!();
    println!("{}", "─".repeat(70));
    println!(
        " {} blocks, {} read in {:.2}s ({:.0} blocks/s)",
        summary.blocks_processed,
        format_size(summary.bytes_read),
        summary.duration_secs,
        summary.blocks_per_second()
    );
    println!(
        " {} file-system nodes, {} decode failures, {} distinct directory entries",
        summary.typed_blocks, summary.failed_blocks, summary.distinct_entries
    );
    println!("{}", "─".repeat(70));
    println!();

    println!(" Top Directory Entries:");
    if ranked.is_empty() {
        println!("   (no directory entries)");
    }
    for entry in &ranked.entries {
        println!("{} {} {}", entry.name, entry.target, entry.count);
    }
    if !ranked.is_complete() {
        println!(
            "   only {} distinct entries available ({} requested)",
            ranked.distinct, ranked.requested
        );
    }
    println!();

    println!(" Node Types:");
    print_histogram(&summary.types);
    println!();

    println!(" Decode Failures:");
    print_histogram(&summary.errors);
}

fn print_histogram(rows: &[HistogramRow]) {
    if rows.is_empty() {
        println!("   (none)");
        return;
    }
    let width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
    for row in rows {
        println!(
            "   {:<width$} {:>10} {:>6.1}%",
            row.key,
            row.count,
            row.percent,
            width = width
        );
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    fn tick(blocks_processed: u64) -> ScanProgress {
        ScanProgress {
            blocks_processed,
            bytes_read: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_print_progress_in_order() {
        let (tx, rx) = broadcast::channel(8);
        for n in [1000, 2000, 3000] {
            tx.send(tick(n)).unwrap();
        }
        drop(tx);

        let lines = RefCell::new(Vec::new());
        let skipped = print_progress(rx, |line| lines.borrow_mut().push(line));

        assert_eq!(skipped, 0);
        assert_eq!(
            lines.into_inner(),
            vec!["processed: 1000", "processed: 2000", "processed: 3000"]
        );
    }

    #[test]
    fn test_print_progress_counts_lagged_ticks() {
        let (tx, rx) = broadcast::channel(2);
        for n in 1..=5u64 {
            tx.send(tick(n * 1000)).unwrap();
        }
        drop(tx);

        let lines = RefCell::new(Vec::new());
        let skipped = print_progress(rx, |line| lines.borrow_mut().push(line));

        assert_eq!(skipped, 3);
        assert_eq!(lines.into_inner(), vec!["processed: 4000", "processed: 5000"]);
    }
}
