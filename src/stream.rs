// src/stream.rs

//! Windowed access to a source file.
//!
//! Every tool in the suite reads the same way: open a file, optionally
//! restrict to an `(address, length)` range, then drain it through `Read`.
//! `ByteWindow` centralizes the range clamping so a request past the end of
//! the file degrades to an empty or shortened window instead of an error.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// A clamped `[start, start + len)` view over a seekable byte source.
///
/// Also implements [`Read`], bounded to the window, so it can feed any
/// reader-based consumer directly.
pub struct ByteWindow<R> {
    source: R,
    start: u64,
    len: u64,
    remaining: u64,
}

/// The usual case: a window over an opened file.
pub type FileWindow = ByteWindow<File>;

impl FileWindow {
    /// Opens `path` and positions a window over it. `range` is an optional
    /// `(address, length)` pair; both ends are clamped against the file
    /// size.
    pub fn open(path: &Path, range: Option<(u64, u64)>) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let size = file
            .metadata()
            .with_context(|| format!("reading metadata for {}", path.display()))?
            .len();
        Self::over(file, size, range)
    }
}

impl<R: Read + Seek> ByteWindow<R> {
    /// Builds a window over any seekable source of known `size`.
    pub fn over(mut source: R, size: u64, range: Option<(u64, u64)>) -> Result<Self> {
        let (start, len) = match range {
            Some((addr, len)) => {
                let start = addr.min(size);
                (start, len.min(size - start))
            }
            None => (0, size),
        };
        source
            .seek(SeekFrom::Start(start))
            .context("seeking to window start")?;
        Ok(Self {
            source,
            start,
            len,
            remaining: len,
        })
    }

    /// Absolute offset of the first byte in the window.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Window length in bytes after clamping.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<R: Read> Read for ByteWindow<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let want = buf.len().min(self.remaining.min(usize::MAX as u64) as usize);
        let n = self.source.read(&mut buf[..want])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}
