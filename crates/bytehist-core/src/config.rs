//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default size of file read chunks, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// How per-file errors affect the scan.
///
/// Traversal errors are always fatal regardless of policy; this only
/// governs files that fail to open or read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// The first per-file error aborts the whole scan.
    FailFast,
    /// Per-file errors are logged and their files excluded from the result.
    #[default]
    SkipAndLog,
}

/// Configuration for histogram scans.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct HistogramConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Number of tally workers (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub jobs: usize,

    /// Size of file read chunks in bytes.
    #[builder(default = "DEFAULT_CHUNK_SIZE")]
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// How per-file errors affect the scan.
    #[builder(default)]
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Maximum directory depth below the root (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl HistogramConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.chunk_size == Some(0) {
            return Err("Chunk size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl HistogramConfig {
    /// Create a new config builder.
    pub fn builder() -> HistogramConfigBuilder {
        HistogramConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            jobs: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            error_policy: ErrorPolicy::default(),
            max_depth: None,
        }
    }

    /// Worker count after auto-detection, always at least 1.
    pub fn effective_jobs(&self) -> usize {
        match self.jobs {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HistogramConfig::builder()
            .root("/home/user")
            .jobs(4usize)
            .error_policy(ErrorPolicy::FailFast)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.jobs, 4);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.error_policy, ErrorPolicy::FailFast);
    }

    #[test]
    fn test_config_simple() {
        let config = HistogramConfig::new("/home/user");
        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.jobs, 0);
        assert_eq!(config.error_policy, ErrorPolicy::SkipAndLog);
        assert!(config.max_depth.is_none());
    }

    #[test]
    fn test_builder_rejects_empty_root() {
        assert!(HistogramConfig::builder().root("").build().is_err());
        assert!(HistogramConfig::builder().build().is_err());
    }

    #[test]
    fn test_builder_rejects_zero_chunk_size() {
        let result = HistogramConfig::builder()
            .root("/test")
            .chunk_size(0usize)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_effective_jobs() {
        let mut config = HistogramConfig::new("/test");
        assert!(config.effective_jobs() >= 1);

        config.jobs = 7;
        assert_eq!(config.effective_jobs(), 7);
    }
}
