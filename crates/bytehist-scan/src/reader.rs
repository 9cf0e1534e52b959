//! Fixed-size chunked file reading.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use bytehist_core::ScanError;

/// Iterator over fixed-size chunks of a byte source.
///
/// Yields `chunk_size`-byte chunks in order; the final chunk may be
/// shorter. The source is read until end-of-stream or the first error,
/// whichever comes first, and the underlying handle is released when the
/// reader is dropped, including on early abandonment.
///
/// The reader is generic over [`Read`] so it can be exercised on
/// in-memory streams:
///
/// ```
/// use std::io::Cursor;
/// use bytehist_scan::ChunkReader;
///
/// let chunks: Vec<Vec<u8>> = ChunkReader::new(Cursor::new(b"hello".to_vec()), 2)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(chunks, vec![b"he".to_vec(), b"ll".to_vec(), b"o".to_vec()]);
/// ```
#[derive(Debug)]
pub struct ChunkReader<R> {
    inner: R,
    chunk_size: usize,
    done: bool,
}

impl ChunkReader<File> {
    /// Open `path` read-only for chunked reading.
    pub fn open(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ScanError::open(path, e))?;
        Ok(Self::new(file, chunk_size))
    }
}

impl<R: Read> ChunkReader<R> {
    /// Wrap an existing byte source.
    pub fn new(inner: R, chunk_size: usize) -> Self {
        debug_assert!(chunk_size > 0);
        Self {
            inner,
            chunk_size,
            done: false,
        }
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        if filled == 0 {
            self.done = true;
            return None;
        }
        if filled < self.chunk_size {
            // A short fill means end-of-stream was reached.
            self.done = true;
            buf.truncate(filled);
        }
        Some(Ok(buf))
    }
}
