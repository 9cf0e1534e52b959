//! Concurrent scanning pipeline for bytehist.
//!
//! This crate implements the byte-histogram pipeline: a lazy directory
//! walker, a bounded pool of tally workers, and an aggregator that merges
//! per-file tallies into one [`ByteHistogram`].
//!
//! # Overview
//!
//! A scan runs as a fan-out/fan-in pipeline:
//!
//! - the **walker** enumerates regular files under the root in
//!   deterministic lexical order and streams their paths;
//! - **N workers** pull paths, read each file in fixed-size chunks, and
//!   tally byte frequencies per file;
//! - the **aggregator** merges per-file tallies into the final histogram,
//!   applying the configured error policy.
//!
//! All stages observe one cancellation token per invocation, so a fatal
//! error (or a caller abort) stops in-flight work promptly and no stage
//! outlives the scan.
//!
//! # Example
//!
//! ```rust,no_run
//! use bytehist_scan::{HistogramConfig, HistogramScanner};
//!
//! # async fn run() -> Result<(), bytehist_scan::ScanError> {
//! let config = HistogramConfig::new("/path/to/scan");
//! let scanner = HistogramScanner::new();
//! let report = scanner.scan(&config).await?;
//!
//! println!("Total bytes: {}", report.histogram.total());
//! println!("Newlines: {}", report.histogram.count(b'\n'));
//! # Ok(())
//! # }
//! ```
//!
//! # Progress Monitoring
//!
//! Subscribe to periodic progress updates:
//!
//! ```rust,no_run
//! use bytehist_scan::HistogramScanner;
//!
//! let scanner = HistogramScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("Tallied {} files", progress.files_tallied);
//!     }
//! });
//! ```

mod pool;
mod progress;
mod reader;
mod scanner;
mod walker;

pub use progress::ScanProgress;
pub use reader::ChunkReader;
pub use scanner::HistogramScanner;

/// Buffer size of the walker-to-pool path channel.
pub const PATH_CHANNEL_SIZE: usize = 64;

/// Buffer size of the pool-to-aggregator tally channel.
pub const TALLY_CHANNEL_SIZE: usize = 100;

// Re-export core types for convenience
pub use bytehist_core::{
    ByteHistogram, ErrorPolicy, HistogramConfig, HistogramReport, ScanError, ScanStats,
    ScanWarning, WarningKind,
};
