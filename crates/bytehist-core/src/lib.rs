//! Core types for bytehist.
//!
//! This crate provides the fundamental data structures used throughout
//! the bytehist pipeline: scan configuration, the error taxonomy, the
//! byte-frequency histogram itself, and the final scan report.

mod config;
mod error;
mod histogram;
mod report;

pub use config::{ErrorPolicy, HistogramConfig, HistogramConfigBuilder, DEFAULT_CHUNK_SIZE};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use histogram::{ByteHistogram, BYTE_VALUES};
pub use report::{HistogramReport, ScanStats};
