//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files tallied so far.
    pub files_tallied: u64,
    /// Number of files skipped so far.
    pub files_skipped: u64,
    /// Total bytes tallied so far.
    pub bytes_tallied: u64,
    /// Most recently merged file.
    pub current_path: PathBuf,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_tallied: 0,
            files_skipped: 0,
            bytes_tallied: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_tallied as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate scan rate in bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.bytes_tallied as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_are_zero_without_elapsed_time() {
        let progress = ScanProgress::new();
        assert_eq!(progress.files_per_second(), 0.0);
        assert_eq!(progress.bytes_per_second(), 0.0);
    }

    #[test]
    fn test_rates() {
        let progress = ScanProgress {
            files_tallied: 100,
            files_skipped: 0,
            bytes_tallied: 4096,
            current_path: PathBuf::from("/x"),
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(progress.files_per_second(), 50.0);
        assert_eq!(progress.bytes_per_second(), 2048.0);
    }
}
