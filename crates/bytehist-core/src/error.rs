//! Error types for histogram scans.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can terminate a histogram scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A file could not be opened.
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file read failed before end-of-stream.
    #[error("Read error at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("Traversal failed at {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan was cancelled.
    #[error("Scan cancelled")]
    Cancelled,

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Open failure with path context.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Mid-read failure with path context.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Traversal failure with path context.
    pub fn walk(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }

    /// Whether this error terminates the scan under every error policy.
    ///
    /// `Open` and `Read` are per-file errors whose effect depends on the
    /// configured [`ErrorPolicy`](crate::ErrorPolicy); everything else is
    /// unconditionally fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Open { .. } | Self::Read { .. })
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A file could not be opened.
    Open,
    /// A file read failed mid-stream.
    Read,
}

/// Non-fatal per-file failure recorded under the skip-and-log policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path of the file that was skipped.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create an open-failure warning.
    pub fn open_failed(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(path, format!("Cannot open: {error}"), WarningKind::Open)
    }

    /// Create a read-failure warning.
    pub fn read_failed(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(path, format!("Read error: {error}"), WarningKind::Read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_error_constructors_attach_path() {
        let err = ScanError::open(
            "/test/path",
            std::io::Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        match err {
            ScanError::Open { path, .. } => assert_eq!(path, PathBuf::from("/test/path")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_per_file_errors_are_not_fatal() {
        let io = |kind| std::io::Error::new(kind, "boom");
        assert!(!ScanError::open("/f", io(ErrorKind::PermissionDenied)).is_fatal());
        assert!(!ScanError::read("/f", io(ErrorKind::UnexpectedEof)).is_fatal());
        assert!(ScanError::walk("/d", io(ErrorKind::NotFound)).is_fatal());
        assert!(ScanError::Cancelled.is_fatal());
    }

    #[test]
    fn test_scan_warning_creation() {
        let io = std::io::Error::new(ErrorKind::PermissionDenied, "denied");
        let warning = ScanWarning::open_failed("/test/path", &io);
        assert_eq!(warning.kind, WarningKind::Open);
        assert!(warning.message.contains("Cannot open"));

        let warning = ScanWarning::read_failed("/test/path", &io);
        assert_eq!(warning.kind, WarningKind::Read);
    }

    #[test]
    fn test_cancelled_display_is_distinct() {
        let cancelled = ScanError::Cancelled.to_string();
        let walk = ScanError::walk(
            "/d",
            std::io::Error::new(ErrorKind::PermissionDenied, "denied"),
        )
        .to_string();
        assert_ne!(cancelled, walk);
        assert!(cancelled.contains("cancelled"));
    }
}
