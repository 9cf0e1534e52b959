//! Pipeline scanner: fan-out, aggregation and cancellation lifecycle.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use bytehist_core::{
    ByteHistogram, ErrorPolicy, HistogramConfig, HistogramReport, ScanError, ScanStats,
    ScanWarning, WarningKind,
};

use crate::pool::{self, FileTally};
use crate::progress::ScanProgress;
use crate::walker;
use crate::{PATH_CHANNEL_SIZE, TALLY_CHANNEL_SIZE};

/// Number of tallied files between progress broadcasts.
const PROGRESS_INTERVAL: u64 = 1000;

/// Concurrent byte-histogram scanner.
///
/// One scanner can run any number of scans. Each [`scan`](Self::scan)
/// call is an independent invocation with its own cancellation scope;
/// [`cancel`](Self::cancel) aborts every in-flight invocation.
pub struct HistogramScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
    cancel: CancellationToken,
}

impl HistogramScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            progress_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Abort every in-flight scan on this scanner.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run the pipeline over `config.root` and merge one histogram.
    ///
    /// Spawns the walker and `config.effective_jobs()` workers, merges
    /// their tallies on the calling task, and joins every spawned task
    /// before returning, on success and on every error path.
    pub async fn scan(&self, config: &HistogramConfig) -> Result<HistogramReport, ScanError> {
        let start = Instant::now();

        if config.chunk_size == 0 {
            return Err(ScanError::InvalidConfig {
                message: "Chunk size must be at least 1".to_string(),
            });
        }
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::walk(&config.root, e))?;
        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        let jobs = config.effective_jobs();
        let cancel = self.cancel.child_token();

        let (paths_tx, paths_rx) = mpsc::channel(PATH_CHANNEL_SIZE);
        let (tally_tx, tally_rx) = mpsc::channel(TALLY_CHANNEL_SIZE);

        let walker = walker::spawn(root_path.clone(), config.max_depth, cancel.clone(), paths_tx);

        let paths_rx = Arc::new(Mutex::new(paths_rx));
        let mut workers: Vec<JoinHandle<()>> = Vec::with_capacity(jobs);
        for _ in 0..jobs {
            workers.push(pool::spawn_worker(
                config.chunk_size,
                Arc::clone(&paths_rx),
                cancel.clone(),
                tally_tx.clone(),
            ));
        }
        // Each worker owns one sender clone, so the tally channel closes
        // exactly when the last worker terminates.
        drop(tally_tx);
        drop(paths_rx);

        let merged = self
            .aggregate(tally_rx, config.error_policy, &cancel, start)
            .await;
        // A caller abort can drain the stream cleanly before the walker
        // reports; it must still surface as Cancelled, never as success.
        let externally_cancelled = merged.is_ok() && cancel.is_cancelled();

        // Unblock any stragglers, then reap every stage before returning.
        cancel.cancel();
        for worker in workers {
            let _ = worker.await;
        }
        let walked = walker.await;

        let (histogram, stats, warnings) = merged?;
        match walked {
            Ok(result) => result?,
            Err(join_err) => {
                return Err(ScanError::walk(
                    root_path.as_path(),
                    std::io::Error::other(join_err),
                ));
            }
        }
        if externally_cancelled {
            return Err(ScanError::Cancelled);
        }

        Ok(HistogramReport::new(
            histogram,
            root_path,
            config.clone(),
            stats,
            start.elapsed(),
            warnings,
        ))
    }

    /// Merge the tally stream into one histogram.
    ///
    /// Consumes the stream to exhaustion, or returns early under
    /// `FailFast` after setting the cancellation token; the partial
    /// histogram is discarded in that case.
    async fn aggregate(
        &self,
        mut tally_rx: mpsc::Receiver<FileTally>,
        policy: ErrorPolicy,
        cancel: &CancellationToken,
        start: Instant,
    ) -> Result<(ByteHistogram, ScanStats, Vec<ScanWarning>), ScanError> {
        let mut histogram = ByteHistogram::new();
        let mut stats = ScanStats::new();
        let mut warnings = Vec::new();

        while let Some(tally) = tally_rx.recv().await {
            match tally {
                FileTally::Counted {
                    path,
                    histogram: partial,
                } => {
                    stats.record_file(partial.total());
                    histogram.merge(&partial);

                    if (stats.files_tallied - 1) % PROGRESS_INTERVAL == 0 {
                        let _ = self.progress_tx.send(ScanProgress {
                            files_tallied: stats.files_tallied,
                            files_skipped: stats.files_skipped,
                            bytes_tallied: stats.bytes_tallied,
                            current_path: path,
                            elapsed: start.elapsed(),
                        });
                    }
                }
                FileTally::Failed { path, error } => match policy {
                    ErrorPolicy::FailFast => {
                        cancel.cancel();
                        return Err(error);
                    }
                    ErrorPolicy::SkipAndLog => {
                        tracing::warn!(
                            target: "bytehist_scan",
                            path = %path.display(),
                            error = %error,
                            "skipping unreadable file"
                        );
                        warnings.push(warning_for(&path, &error));
                        stats.record_skip();
                    }
                },
            }
        }

        Ok((histogram, stats, warnings))
    }
}

impl Default for HistogramScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the warning recorded for a skipped file.
fn warning_for(path: &Path, error: &ScanError) -> ScanWarning {
    match error {
        ScanError::Open { source, .. } => ScanWarning::open_failed(path, source),
        ScanError::Read { source, .. } => ScanWarning::read_failed(path, source),
        other => ScanWarning::new(path, other.to_string(), WarningKind::Read),
    }
}
