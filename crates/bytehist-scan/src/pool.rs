//! Tally workers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use bytehist_core::{ByteHistogram, ScanError};

use crate::reader::ChunkReader;

/// Per-file result produced by one worker.
///
/// Owned exclusively by the producing worker until it is handed to the
/// aggregator; never mutated after being sent.
#[derive(Debug)]
pub(crate) enum FileTally {
    /// The file was read completely.
    Counted {
        path: PathBuf,
        histogram: ByteHistogram,
    },
    /// The file could not be opened or read.
    Failed { path: PathBuf, error: ScanError },
}

/// Spawn one tally worker.
///
/// The worker takes paths from the shared receiver until it is exhausted,
/// tallies each file on the blocking pool, and emits one [`FileTally`]
/// per path. Every suspension point observes the cancellation token, so
/// the worker terminates promptly even when the aggregator has already
/// stopped consuming.
pub(crate) fn spawn_worker(
    chunk_size: usize,
    paths_rx: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
    cancel: CancellationToken,
    tally_tx: mpsc::Sender<FileTally>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let path = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                path = next_path(&paths_rx) => match path {
                    Some(path) => path,
                    None => break,
                },
            };

            let tally = {
                let cancel = cancel.clone();
                let path = path.clone();
                tokio::task::spawn_blocking(move || tally_file(&path, chunk_size, &cancel)).await
            };
            let tally = match tally {
                Ok(Some(tally)) => tally,
                // Cancelled mid-read, or the blocking task was torn down.
                Ok(None) | Err(_) => break,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                sent = tally_tx.send(tally) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Receive the next path from the shared walker stream.
async fn next_path(paths_rx: &Mutex<mpsc::Receiver<PathBuf>>) -> Option<PathBuf> {
    paths_rx.lock().await.recv().await
}

/// Read one file in chunks and count its byte values.
///
/// Returns `None` if cancellation was observed mid-read; the file's
/// partial counts are discarded.
pub(crate) fn tally_file(
    path: &Path,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Option<FileTally> {
    let reader = match ChunkReader::open(path, chunk_size) {
        Ok(reader) => reader,
        Err(error) => {
            return Some(FileTally::Failed {
                path: path.to_path_buf(),
                error,
            });
        }
    };

    let mut histogram = ByteHistogram::new();
    for chunk in reader {
        if cancel.is_cancelled() {
            return None;
        }
        match chunk {
            Ok(bytes) => histogram.record_all(&bytes),
            Err(source) => {
                return Some(FileTally::Failed {
                    path: path.to_path_buf(),
                    error: ScanError::read(path, source),
                });
            }
        }
    }

    Some(FileTally::Counted {
        path: path.to_path_buf(),
        histogram,
    })
}
