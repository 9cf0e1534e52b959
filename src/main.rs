//! bytehist - concurrent byte-frequency histogram for directory trees.
//!
//! Usage:
//!   bh [PATH]                 Scan and print the histogram
//!   bh -j 8 [PATH]            Scan with 8 tally workers
//!   bh --format json [PATH]   Emit the full report as JSON
//!   bh --help                 Show help

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use bytehist_core::{ErrorPolicy, HistogramConfig, HistogramReport};
use bytehist_scan::HistogramScanner;

#[derive(Parser)]
#[command(
    name = "bytehist",
    version,
    about = "Byte-frequency histogram for directory trees",
    long_about = "bytehist scans every regular file under a directory with a \
                  bounded pool of workers and reports how often each byte \
                  value (0-255) occurs."
)]
struct Cli {
    /// Path to scan (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Number of tally workers (0 = one per CPU)
    #[arg(short, long, default_value = "0")]
    jobs: usize,

    /// File read chunk size in bytes
    #[arg(long, default_value = "1024")]
    chunk_size: usize,

    /// How per-file errors affect the scan
    #[arg(short = 'e', long, default_value = "skip")]
    error_policy: PolicyArg,

    /// Maximum directory depth below the root
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Include byte values that never occurred
    #[arg(short, long)]
    all: bool,

    /// Abort the scan after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum PolicyArg {
    /// Log per-file errors and keep scanning
    #[default]
    Skip,
    /// Abort the scan on the first per-file error
    FailFast,
}

impl From<PolicyArg> for ErrorPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Skip => ErrorPolicy::SkipAndLog,
            PolicyArg::FailFast => ErrorPolicy::FailFast,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = HistogramConfig::builder()
        .root(cli.path.clone())
        .jobs(cli.jobs)
        .chunk_size(cli.chunk_size)
        .error_policy(ErrorPolicy::from(cli.error_policy))
        .max_depth(cli.max_depth)
        .build()
        .context("Invalid configuration")?;

    let scanner = Arc::new(HistogramScanner::new());

    if let Some(secs) = cli.timeout {
        let scanner = Arc::clone(&scanner);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            scanner.cancel();
        });
    }

    eprintln!("Scanning {}...", cli.path.display());
    let report = scanner.scan(&config).await.context("Scan failed")?;

    match cli.format {
        OutputFormat::Text => print_report(&report, cli.all),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Print the report as a summary plus a count table.
fn print_report(report: &HistogramReport, show_all: bool) {
    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} - {}",
        report.root_path.display(),
        format_size(report.stats.bytes_tallied)
    );
    println!(
        " {} files tallied, {} skipped",
        report.stats.files_tallied, report.stats.files_skipped
    );
    println!(" Scanned in {:.2}s", report.scan_duration.as_secs_f64());
    println!("{}", "─".repeat(60));
    println!();

    let max_count = report.histogram.max_count().max(1);
    for (byte, count) in report.histogram.entries() {
        if count == 0 && !show_all {
            continue;
        }
        let bar_len = ((count as f64 / max_count as f64) * 30.0) as usize;
        println!(
            " 0x{:02x} {}  {:>12}  {}",
            byte,
            printable(byte),
            count,
            "█".repeat(bar_len)
        );
    }

    if !report.warnings.is_empty() {
        println!();
        println!(" {} file(s) skipped during scan", report.warnings.len());
    }
}

/// Printable rendering of a byte value for the table.
fn printable(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else if byte == b' ' {
        "' '".to_string()
    } else {
        "   ".to_string()
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
