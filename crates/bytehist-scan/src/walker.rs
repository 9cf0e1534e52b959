//! Deterministic directory traversal.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use bytehist_core::ScanError;

/// Spawn the walker task for `root`.
///
/// The walker recursively visits the tree depth-first, in lexical order
/// per directory, and sends one path per regular file over `paths_tx`.
/// Directories, symlinks, sockets, devices and other non-regular entries
/// are skipped silently. The join handle resolves to the traversal's
/// single terminal result.
pub(crate) fn spawn(
    root: PathBuf,
    max_depth: Option<u32>,
    cancel: CancellationToken,
    paths_tx: mpsc::Sender<PathBuf>,
) -> JoinHandle<Result<(), ScanError>> {
    tokio::task::spawn_blocking(move || walk_dir(&root, 0, max_depth, &cancel, &paths_tx))
}

/// Visit one directory level, recursing depth-first.
fn walk_dir(
    dir: &Path,
    depth: u32,
    max_depth: Option<u32>,
    cancel: &CancellationToken,
    paths_tx: &mpsc::Sender<PathBuf>,
) -> Result<(), ScanError> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(|e| ScanError::walk(dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| ScanError::walk(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let path = entry.path();
        // DirEntry::file_type does not follow symlinks, so a link to a
        // regular file still reports as a symlink and is skipped.
        let file_type = entry.file_type().map_err(|e| ScanError::walk(&path, e))?;

        if file_type.is_dir() {
            if max_depth.is_none_or(|limit| depth < limit) {
                walk_dir(&path, depth + 1, max_depth, cancel, paths_tx)?;
            }
        } else if file_type.is_file() {
            // A closed path channel means the pool has already stopped
            // consuming, which only happens once cancellation is under way.
            if paths_tx.blocking_send(path).is_err() {
                return Err(ScanError::Cancelled);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    async fn collect_walk(
        root: PathBuf,
        max_depth: Option<u32>,
        cancel: CancellationToken,
    ) -> (Vec<PathBuf>, Result<(), ScanError>) {
        let (tx, mut rx) = mpsc::channel(16);
        let handle = spawn(root, max_depth, cancel, tx);

        let mut paths = Vec::new();
        while let Some(path) = rx.recv().await {
            paths.push(path);
        }
        (paths, handle.await.unwrap())
    }

    #[tokio::test]
    async fn test_walk_emits_only_regular_files() {
        let temp = create_test_tree();
        let (paths, result) =
            collect_walk(temp.path().to_path_buf(), None, CancellationToken::new()).await;

        result.unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|p| p.is_file()));
    }

    #[tokio::test]
    async fn test_walk_order_is_deterministic_lexical() {
        let temp = create_test_tree();
        let root = temp.path().to_path_buf();
        let (paths, _) = collect_walk(root.clone(), None, CancellationToken::new()).await;

        let expected: Vec<PathBuf> = [
            "dir1/file2.txt",
            "dir1/subdir/file3.txt",
            "dir2/file4.txt",
            "file1.txt",
        ]
        .iter()
        .map(|rel| root.join(rel))
        .collect();
        assert_eq!(paths, expected);

        let (again, _) = collect_walk(root, None, CancellationToken::new()).await;
        assert_eq!(paths, again);
    }

    #[tokio::test]
    async fn test_walk_respects_max_depth() {
        let temp = create_test_tree();
        let root = temp.path().to_path_buf();

        let (paths, result) = collect_walk(root.clone(), Some(0), CancellationToken::new()).await;
        result.unwrap();
        assert_eq!(paths, vec![root.join("file1.txt")]);

        let (paths, result) = collect_walk(root, Some(1), CancellationToken::new()).await;
        result.unwrap();
        assert_eq!(paths.len(), 3);
    }

    #[tokio::test]
    async fn test_walk_missing_root_is_walk_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let (paths, result) = collect_walk(missing, None, CancellationToken::new()).await;

        assert!(paths.is_empty());
        assert!(matches!(result, Err(ScanError::Walk { .. })));
    }

    #[tokio::test]
    async fn test_walk_aborts_on_cancellation() {
        let temp = create_test_tree();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (paths, result) = collect_walk(temp.path().to_path_buf(), None, cancel).await;
        assert!(paths.is_empty());
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }

    #[tokio::test]
    async fn test_walk_aborts_when_receiver_drops() {
        let temp = create_test_tree();
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let handle = spawn(
            temp.path().to_path_buf(),
            None,
            CancellationToken::new(),
            tx,
        );
        assert!(matches!(handle.await.unwrap(), Err(ScanError::Cancelled)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_walk_skips_symlinks() {
        let temp = create_test_tree();
        let root = temp.path();
        std::os::unix::fs::symlink(root.join("file1.txt"), root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("missing"), root.join("broken.txt")).unwrap();

        let (paths, result) =
            collect_walk(root.to_path_buf(), None, CancellationToken::new()).await;
        result.unwrap();
        assert_eq!(paths.len(), 4);
        assert!(!paths.iter().any(|p| p.ends_with("link.txt")));
        assert!(!paths.iter().any(|p| p.ends_with("broken.txt")));
    }
}
