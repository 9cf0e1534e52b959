//! The byte-frequency histogram.

use std::fmt;
use std::ops::Index;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of distinct byte values tracked.
pub const BYTE_VALUES: usize = 256;

/// Frequency histogram over byte values 0-255.
///
/// Every key is always present; a fresh histogram has all counts at zero.
/// The sum of all counts equals the number of bytes recorded.
///
/// Merging partial histograms is per-key addition, so merge order never
/// affects the combined result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteHistogram {
    counts: Box<[u64; BYTE_VALUES]>,
}

impl ByteHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self {
            counts: Box::new([0; BYTE_VALUES]),
        }
    }

    /// Count one occurrence of `byte`.
    pub fn record(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
    }

    /// Count every byte in `bytes`.
    pub fn record_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.counts[byte as usize] += 1;
        }
    }

    /// Occurrences of `byte`.
    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Total number of bytes recorded.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Merge `other` into `self` by per-key addition.
    pub fn merge(&mut self, other: &ByteHistogram) {
        for (dst, src) in self.counts.iter_mut().zip(other.counts.iter()) {
            *dst += src;
        }
    }

    /// Iterate over all `(byte value, count)` pairs in byte order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(value, &count)| (value as u8, count))
    }

    /// Iterate over the `(byte value, count)` pairs with a nonzero count.
    pub fn nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.entries().filter(|&(_, count)| count > 0)
    }

    /// Largest single count in the histogram.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

impl Default for ByteHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u8> for ByteHistogram {
    type Output = u64;

    fn index(&self, byte: u8) -> &u64 {
        &self.counts[byte as usize]
    }
}

// serde cannot derive for arrays this long, so the histogram serializes
// as a plain 256-element sequence of counts.

impl Serialize for ByteHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(BYTE_VALUES))?;
        for count in self.counts.iter() {
            seq.serialize_element(count)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ByteHistogram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = ByteHistogram;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a sequence of {BYTE_VALUES} byte counts")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut histogram = ByteHistogram::new();
                for slot in histogram.counts.iter_mut() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(BYTE_VALUES, &self))?;
                }
                if seq.next_element::<u64>()?.is_some() {
                    return Err(serde::de::Error::invalid_length(BYTE_VALUES + 1, &self));
                }
                Ok(histogram)
            }
        }

        deserializer.deserialize_seq(CountsVisitor)
    }
}
