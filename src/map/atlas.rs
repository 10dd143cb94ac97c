// src/map/atlas.rs

//! Tile ownership and super-grid layout.
//!
//! The atlas takes the builder's tiles in file order, arranges them into a
//! near-square super-grid (`tiles_per_row = ceil(sqrt(count))`, row-major:
//! tile `i` sits at `(i % tiles_per_row, i / tiles_per_row)`), and owns both
//! the tile data and the render surfaces derived from it. Dropping the atlas
//! releases everything.

use super::ByteTile;
use crate::geom::WorldRect;
use log::{debug, warn};

/// Straight (non-premultiplied) RGBA pixels for one tile, ready to blit.
///
/// Byte value maps to a grey intensity with `alpha = byte * 2` saturating,
/// following the original tool's rendering; the mapping is cosmetic and has
/// no bearing on `byte_at`.
#[derive(Debug, Clone)]
pub struct TileSurface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TileSurface {
    fn build(tile: &ByteTile) -> Option<Self> {
        let edge = tile.cell() as usize;
        let len = edge.checked_mul(edge)?.checked_mul(4)?;
        let mut rgba = Vec::with_capacity(len);
        for &b in tile.bytes() {
            rgba.extend_from_slice(&[b, b, b, b.saturating_mul(2)]);
        }
        Some(Self {
            width: tile.cell(),
            height: tile.cell(),
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

/// The shape of an attached atlas, enough for placement and inverse lookup
/// without borrowing the tiles themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGeometry {
    pub cell: u32,
    pub tiles_per_row: u32,
    pub rows: u32,
    pub tile_count: usize,
}

impl AtlasGeometry {
    /// Row-major tile index for a super-grid position, if it addresses an
    /// existing tile.
    pub fn tile_index(&self, grid_x: u32, grid_y: u32) -> Option<usize> {
        if grid_x >= self.tiles_per_row || grid_y >= self.rows {
            return None;
        }
        let idx = (grid_y as usize) * (self.tiles_per_row as usize) + grid_x as usize;
        (idx < self.tile_count).then_some(idx)
    }

    /// Total world-space extent of the super-grid (square, in world units).
    pub fn world_extent(&self) -> f32 {
        (self.tiles_per_row * self.cell) as f32
    }
}

pub struct TileAtlas {
    tiles: Vec<ByteTile>,
    surfaces: Vec<Option<TileSurface>>,
    geometry: AtlasGeometry,
}

impl TileAtlas {
    /// Takes ownership of the built tiles, assigns super-grid coordinates,
    /// and derives a render surface per tile. A tile whose surface cannot be
    /// created stays in the atlas as data but is skipped at render time.
    pub fn attach(mut tiles: Vec<ByteTile>, cell: u32) -> Self {
        let count = tiles.len();
        let tiles_per_row = (count as f64).sqrt().ceil() as u32;
        let rows = if tiles_per_row == 0 {
            0
        } else {
            (count as u32).div_ceil(tiles_per_row)
        };

        let mut surfaces = Vec::with_capacity(count);
        for (i, tile) in tiles.iter_mut().enumerate() {
            let x = (i as u32) % tiles_per_row.max(1);
            let y = (i as u32) / tiles_per_row.max(1);
            tile.set_grid_pos(x, y);
            let surface = TileSurface::build(tile);
            if surface.is_none() {
                warn!("no render surface for tile {i}; it will not be drawn");
            }
            surfaces.push(surface);
        }

        debug!("atlas attached: {count} tiles, {tiles_per_row} per row");
        Self {
            tiles,
            surfaces,
            geometry: AtlasGeometry {
                cell,
                tiles_per_row,
                rows,
                tile_count: count,
            },
        }
    }

    pub fn geometry(&self) -> AtlasGeometry {
        self.geometry
    }

    pub fn cell(&self) -> u32 {
        self.geometry.cell
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[ByteTile] {
        &self.tiles
    }

    /// World-space placement rectangle for a tile index.
    pub fn placement_of(&self, index: usize) -> Option<WorldRect> {
        self.tiles.get(index).map(ByteTile::world_rect)
    }

    /// Render surface for a tile, `None` when the tile has no surface (it
    /// is then simply not drawn).
    pub fn surface(&self, index: usize) -> Option<&TileSurface> {
        self.surfaces.get(index).and_then(Option::as_ref)
    }

    /// Bounds-checked byte read through the atlas. A bad tile index or an
    /// out-of-range pixel reads as 0, the same sentinel the tiles use.
    pub fn byte_at(&self, index: usize, x: u32, y: u32) -> u8 {
        self.tiles.get(index).map_or(0, |t| t.byte(x, y))
    }
}
