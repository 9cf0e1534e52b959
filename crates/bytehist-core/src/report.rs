//! Scan statistics and the final report.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::HistogramConfig;
use crate::error::ScanWarning;
use crate::histogram::ByteHistogram;

/// Summary statistics for a completed scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Files whose bytes are included in the histogram.
    pub files_tallied: u64,
    /// Files excluded because of per-file errors.
    pub files_skipped: u64,
    /// Total bytes included in the histogram.
    pub bytes_tallied: u64,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully tallied file.
    pub fn record_file(&mut self, bytes: u64) {
        self.files_tallied += 1;
        self.bytes_tallied += bytes;
    }

    /// Record one skipped file.
    pub fn record_skip(&mut self) {
        self.files_skipped += 1;
    }
}

/// Complete result of a histogram scan.
///
/// Only produced on full success; a fatal error yields no partial report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramReport {
    /// The merged histogram, all 256 keys present.
    pub histogram: ByteHistogram,

    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: HistogramConfig,

    /// Summary statistics.
    pub stats: ScanStats,

    /// Per-file warnings collected under the skip-and-log policy.
    pub warnings: Vec<ScanWarning>,
}

impl HistogramReport {
    /// Create a new report.
    pub fn new(
        histogram: ByteHistogram,
        root_path: PathBuf,
        config: HistogramConfig,
        stats: ScanStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            histogram,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record() {
        let mut stats = ScanStats::new();
        stats.record_file(100);
        stats.record_file(24);
        stats.record_skip();

        assert_eq!(stats.files_tallied, 2);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.bytes_tallied, 124);
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let mut histogram = ByteHistogram::new();
        histogram.record_all(b"report");
        let mut stats = ScanStats::new();
        stats.record_file(6);

        let report = HistogramReport::new(
            histogram.clone(),
            PathBuf::from("/data"),
            HistogramConfig::new("/data"),
            stats,
            Duration::from_millis(12),
            Vec::new(),
        );

        let json = serde_json::to_string(&report).unwrap();
        let restored: HistogramReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.histogram, histogram);
        assert_eq!(restored.stats.bytes_tallied, 6);
        assert_eq!(restored.root_path, PathBuf::from("/data"));
    }
}
