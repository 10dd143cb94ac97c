// src/map/resolve.rs

//! Inverse lookup: from a screen coordinate back to the byte it renders.
//!
//! Resolution walks the pipeline backwards. The screen point is unprojected
//! into world space, world space is divided by the cell size to find the
//! super-grid slot, and the remainder is the pixel inside that tile. The two
//! axes stand or fall together: a point past the grid on either axis resolves
//! to nothing, never to a clamped half-answer.

use super::AtlasGeometry;
use crate::geom::ScreenPoint;
use crate::view::ViewTransform;

/// A successful screen-to-byte resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHit {
    /// Super-grid column of the tile under the cursor.
    pub tile_x: u32,
    /// Super-grid row of the tile under the cursor.
    pub tile_y: u32,
    /// Pixel column inside the tile.
    pub intra_x: u32,
    /// Pixel row inside the tile.
    pub intra_y: u32,
    /// Row-major index of the tile in its atlas.
    pub tile_index: usize,
}

impl TileHit {
    /// Absolute offset of the resolved byte in the source stream.
    ///
    /// Inside the final, partially populated tile this can name a padding
    /// pixel past the end of the stream; `TileAtlas::byte_at` reads those as
    /// the zero sentinel.
    pub fn byte_offset(&self, cell: u32) -> u64 {
        let per_tile = u64::from(cell) * u64::from(cell);
        self.tile_index as u64 * per_tile
            + u64::from(self.intra_y) * u64::from(cell)
            + u64::from(self.intra_x)
    }
}

/// Resolves a screen coordinate to the tile pixel it renders, or `None` when
/// the point lies outside the populated super-grid.
pub fn resolve(
    screen: ScreenPoint,
    view: &ViewTransform,
    geometry: &AtlasGeometry,
) -> Option<TileHit> {
    if geometry.tile_count == 0 || geometry.cell == 0 {
        return None;
    }

    let world = view.view_point(screen);
    if world.x < 0.0 || world.y < 0.0 {
        return None;
    }

    let cell = geometry.cell as f32;
    let tile_x = (world.x / cell).floor();
    let tile_y = (world.y / cell).floor();
    if tile_x >= geometry.tiles_per_row as f32 || tile_y >= geometry.rows as f32 {
        return None;
    }

    let (tile_x, tile_y) = (tile_x as u32, tile_y as u32);
    let tile_index = geometry.tile_index(tile_x, tile_y)?;

    let intra_x = (world.x - tile_x as f32 * cell).floor() as u32;
    let intra_y = (world.y - tile_y as f32 * cell).floor() as u32;
    // Float remainders can graze the next pixel at high magnification.
    let intra_x = intra_x.min(geometry.cell - 1);
    let intra_y = intra_y.min(geometry.cell - 1);

    Some(TileHit {
        tile_x,
        tile_y,
        intra_x,
        intra_y,
        tile_index,
    })
}
