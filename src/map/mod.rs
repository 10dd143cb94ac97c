// src/map/mod.rs

//! The pixel-map core: turning a linear byte stream into a square tile
//! atlas, and mapping rendered pixels back to byte offsets.
//!
//! One source byte becomes one pixel. Bytes fill a `cell`-by-`cell` tile
//! row-major, top-down; full tiles are appended in file order and laid out
//! into a near-square super-grid by the atlas. `resolve` inverts the whole
//! pipeline: a screen coordinate comes back as a tile plus intra-tile pixel,
//! and from there an absolute file offset.

pub mod atlas;
pub mod builder;
pub mod resolve;

pub use atlas::{AtlasGeometry, TileAtlas};
pub use builder::TileBuilder;
pub use resolve::{resolve, TileHit};

use crate::geom::WorldRect;

/// One square pixel buffer covering a contiguous run of source bytes.
///
/// `data` always holds `cell * cell` bytes; only the first `populated` of
/// them came from the stream, the rest stay at the zero sentinel. Every tile
/// except possibly the last is fully populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteTile {
    cell: u32,
    grid_x: u32,
    grid_y: u32,
    data: Vec<u8>,
    populated: usize,
}

impl ByteTile {
    pub(crate) fn new(cell: u32) -> Self {
        Self {
            cell,
            grid_x: 0,
            grid_y: 0,
            data: vec![0u8; (cell as usize) * (cell as usize)],
            populated: 0,
        }
    }

    pub fn cell(&self) -> u32 {
        self.cell
    }

    /// Super-grid position, assigned when the tile is attached to an atlas.
    pub fn grid_pos(&self) -> (u32, u32) {
        (self.grid_x, self.grid_y)
    }

    pub(crate) fn set_grid_pos(&mut self, x: u32, y: u32) {
        self.grid_x = x;
        self.grid_y = y;
    }

    /// Number of bytes actually written from the stream.
    pub fn populated(&self) -> usize {
        self.populated
    }

    pub fn is_full(&self) -> bool {
        self.populated == self.data.len()
    }

    /// Raw pixel bytes, including sentinel padding in a short final tile.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// The bytes that came from the stream, padding excluded.
    pub fn stream_bytes(&self) -> &[u8] {
        &self.data[..self.populated]
    }

    /// Bounds-checked pixel read; out-of-range coordinates read as the zero
    /// sentinel rather than failing.
    pub fn byte(&self, x: u32, y: u32) -> u8 {
        if x >= self.cell || y >= self.cell {
            return 0;
        }
        self.data[(y * self.cell + x) as usize]
    }

    pub(crate) fn write(&mut self, x: u32, y: u32, value: u8) {
        debug_assert!(x < self.cell && y < self.cell);
        self.data[(y * self.cell + x) as usize] = value;
        self.populated += 1;
    }

    /// World-space placement rectangle, derived purely from the super-grid
    /// position and the cell size. Tiles pack edge to edge.
    pub fn world_rect(&self) -> WorldRect {
        let c = self.cell as f32;
        WorldRect::new(self.grid_x as f32 * c, self.grid_y as f32 * c, c, c)
    }
}
