// src/map/builder.rs

//! Incremental tile construction from a byte stream.
//!
//! The builder keeps an `(x, y)` cursor inside the current tile; each byte
//! lands at the cursor, `x` advances, rows wrap, and a filled tile is moved
//! to the output before a fresh one is started. Because the cursor is the
//! only state, feeding the same stream in different chunk sizes produces
//! identical tiles.

use super::ByteTile;
use anyhow::{Context, Result};
use log::debug;
use std::io::Read;

/// Chunk size used when draining a reader, matching the 1 KiB reads the
/// text tools use.
const READ_CHUNK: usize = 1024;

pub struct TileBuilder {
    cell: u32,
    cursor_x: u32,
    cursor_y: u32,
    current: ByteTile,
    tiles: Vec<ByteTile>,
}

impl TileBuilder {
    /// `cell` must already be validated as a positive tile edge length by
    /// the configuration layer.
    pub fn new(cell: u32) -> Self {
        debug_assert!(cell > 0, "cell size is validated by the caller");
        Self {
            cell,
            cursor_x: 0,
            cursor_y: 0,
            current: ByteTile::new(cell),
            tiles: Vec::new(),
        }
    }

    pub fn cell(&self) -> u32 {
        self.cell
    }

    /// Consumes one chunk of the stream. Chunk boundaries carry no meaning;
    /// only the running cursor does.
    pub fn push_chunk(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.current.write(self.cursor_x, self.cursor_y, b);
            self.cursor_x += 1;
            if self.cursor_x == self.cell {
                self.cursor_x = 0;
                self.cursor_y += 1;
                if self.cursor_y == self.cell {
                    self.cursor_y = 0;
                    let full = std::mem::replace(&mut self.current, ByteTile::new(self.cell));
                    self.tiles.push(full);
                }
            }
        }
    }

    /// Finalizes the sequence. A partially filled tile is emitted as-is with
    /// sentinel padding; an untouched tile is dropped, so an empty stream
    /// yields an empty sequence rather than an error.
    pub fn finish(mut self) -> Vec<ByteTile> {
        if self.current.populated() > 0 {
            self.tiles.push(self.current);
        }
        debug!(
            "tile build complete: {} tiles of {}x{}",
            self.tiles.len(),
            self.cell,
            self.cell
        );
        self.tiles
    }

    /// Drains a reader to exhaustion in fixed-size chunks.
    pub fn build_from_reader<R: Read>(cell: u32, reader: &mut R) -> Result<Vec<ByteTile>> {
        let mut builder = TileBuilder::new(cell);
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = reader
                .read(&mut buf)
                .context("reading byte stream for tile build")?;
            if n == 0 {
                break;
            }
            builder.push_chunk(&buf[..n]);
        }
        Ok(builder.finish())
    }
}
