// src/rasterizer.rs

//! Render command compiler.
//!
//! Transforms the renderer's high-level `RenderCommand`s into pixels in the
//! driver's framebuffer plus a short list of `DriverCommand`s:
//!
//! ```text
//! RenderCommand[]  →  [SoftwareRasterizer]  →  framebuffer + DriverCommand[]
//!   (high-level)                                 (pixels + metadata)
//!   BlitTile                                     Present
//!   DrawLine
//!   etc.
//! ```
//!
//! Tile blits use nearest-neighbor sampling so individual byte pixels stay
//! sharp blocks at high magnification. All drawing honors the active clip
//! rectangle; a `BlitTile` whose tile has no render surface is skipped.

use crate::backends::{DriverCommand, RenderCommand};
use crate::color::Rgba;
use crate::font;
use crate::geom::ScreenRect;
use crate::map::TileAtlas;
use log::trace;

/// Integer clip rectangle, clamped to the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl PixelRect {
    fn full(width: usize, height: usize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width as i32,
            y1: height as i32,
        }
    }

    fn from_screen(rect: &ScreenRect, width: usize, height: usize) -> Self {
        let full = Self::full(width, height);
        Self {
            x0: (rect.x.floor() as i32).clamp(full.x0, full.x1),
            y0: (rect.y.floor() as i32).clamp(full.y0, full.y1),
            x1: (rect.right().ceil() as i32).clamp(full.x0, full.x1),
            y1: (rect.bottom().ceil() as i32).clamp(full.y0, full.y1),
        }
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

pub struct SoftwareRasterizer {
    clip: Option<PixelRect>,
}

impl SoftwareRasterizer {
    pub fn new() -> Self {
        Self { clip: None }
    }

    /// Executes `commands` against `framebuffer` (RGBA, row-major,
    /// `width * height * 4` bytes) and returns the driver commands that
    /// must follow.
    pub fn compile_into_buffer(
        &mut self,
        commands: Vec<RenderCommand>,
        atlas: &TileAtlas,
        framebuffer: &mut [u8],
        width: usize,
        height: usize,
    ) -> Vec<DriverCommand> {
        debug_assert!(framebuffer.len() >= width * height * 4);
        let mut driver_commands = Vec::new();
        self.clip = None;

        for command in commands {
            match command {
                RenderCommand::ClearAll { color } => {
                    for px in framebuffer.chunks_exact_mut(4) {
                        px.copy_from_slice(&color.to_array());
                    }
                }
                RenderCommand::SetClip { rect } => {
                    self.clip = rect.map(|r| PixelRect::from_screen(&r, width, height));
                }
                RenderCommand::BlitTile {
                    tile_index,
                    dst,
                    tint,
                } => {
                    self.blit_tile(atlas, tile_index, &dst, tint, framebuffer, width, height);
                }
                RenderCommand::FillRect { rect, color } => {
                    self.fill_rect(&rect, color, framebuffer, width, height);
                }
                RenderCommand::StrokeRect { rect, color } => {
                    self.stroke_rect(&rect, color, framebuffer, width, height);
                }
                RenderCommand::DrawLine {
                    x0,
                    y0,
                    x1,
                    y1,
                    color,
                } => {
                    self.draw_line(x0, y0, x1, y1, color, framebuffer, width, height);
                }
                RenderCommand::DrawText { x, y, text, color } => {
                    self.draw_text(x, y, &text, color, framebuffer, width, height);
                }
                RenderCommand::Present => driver_commands.push(DriverCommand::Present),
            }
        }
        driver_commands
    }

    fn put_pixel(
        &self,
        x: i32,
        y: i32,
        color: Rgba,
        framebuffer: &mut [u8],
        width: usize,
        height: usize,
    ) {
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            return;
        }
        if let Some(clip) = &self.clip {
            if !clip.contains(x, y) {
                return;
            }
        }
        let idx = (y as usize * width + x as usize) * 4;
        let dst = Rgba::new(
            framebuffer[idx],
            framebuffer[idx + 1],
            framebuffer[idx + 2],
            255,
        );
        let out = color.over(dst);
        framebuffer[idx..idx + 4].copy_from_slice(&out.to_array());
    }

    #[allow(clippy::too_many_arguments)]
    fn blit_tile(
        &self,
        atlas: &TileAtlas,
        tile_index: usize,
        dst: &ScreenRect,
        tint: Rgba,
        framebuffer: &mut [u8],
        width: usize,
        height: usize,
    ) {
        let Some(surface) = atlas.surface(tile_index) else {
            trace!("tile {tile_index} has no surface; skipping blit");
            return;
        };
        if dst.width <= 0.0 || dst.height <= 0.0 {
            return;
        }

        let bounds = PixelRect::from_screen(dst, width, height);
        let src_w = surface.width() as f32;
        let src_h = surface.height() as f32;
        let rgba = surface.rgba();

        for py in bounds.y0..bounds.y1 {
            // Nearest-neighbor: sample the source pixel whose span covers
            // the center of this destination pixel.
            let v = ((py as f32 + 0.5 - dst.y) / dst.height * src_h)
                .floor()
                .clamp(0.0, src_h - 1.0) as usize;
            for px in bounds.x0..bounds.x1 {
                let u = ((px as f32 + 0.5 - dst.x) / dst.width * src_w)
                    .floor()
                    .clamp(0.0, src_w - 1.0) as usize;
                let s = (v * surface.width() as usize + u) * 4;
                let color = Rgba::new(
                    mul_channel(rgba[s], tint.r),
                    mul_channel(rgba[s + 1], tint.g),
                    mul_channel(rgba[s + 2], tint.b),
                    mul_channel(rgba[s + 3], tint.a),
                );
                self.put_pixel(px, py, color, framebuffer, width, height);
            }
        }
    }

    fn fill_rect(
        &self,
        rect: &ScreenRect,
        color: Rgba,
        framebuffer: &mut [u8],
        width: usize,
        height: usize,
    ) {
        let bounds = PixelRect::from_screen(rect, width, height);
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                self.put_pixel(x, y, color, framebuffer, width, height);
            }
        }
    }

    fn stroke_rect(
        &self,
        rect: &ScreenRect,
        color: Rgba,
        framebuffer: &mut [u8],
        width: usize,
        height: usize,
    ) {
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.right() - 1.0, rect.bottom() - 1.0);
        self.draw_line(x0, y0, x1, y0, color, framebuffer, width, height);
        self.draw_line(x0, y1, x1, y1, color, framebuffer, width, height);
        self.draw_line(x0, y0, x0, y1, color, framebuffer, width, height);
        self.draw_line(x1, y0, x1, y1, color, framebuffer, width, height);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        color: Rgba,
        framebuffer: &mut [u8],
        width: usize,
        height: usize,
    ) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        let (sx, sy) = (dx / steps, dy / steps);
        let (mut x, mut y) = (x0, y0);
        for _ in 0..=steps as u32 {
            self.put_pixel(
                x.round() as i32,
                y.round() as i32,
                color,
                framebuffer,
                width,
                height,
            );
            x += sx;
            y += sy;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        x: f32,
        y: f32,
        text: &str,
        color: Rgba,
        framebuffer: &mut [u8],
        width: usize,
        height: usize,
    ) {
        let (ox, oy) = (x.round() as i32, y.round() as i32);
        font::for_each_pixel(text, |gx, gy| {
            self.put_pixel(
                ox + gx as i32,
                oy + gy as i32,
                color,
                framebuffer,
                width,
                height,
            );
        });
    }
}

impl Default for SoftwareRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn mul_channel(a: u8, b: u8) -> u8 {
    ((u32::from(a) * u32::from(b) + 127) / 255) as u8
}
