// src/renderer.rs

//! Scene composition for the pixel-map viewer.
//!
//! The renderer owns no pixels and no window; each frame it walks the
//! atlas through the view transform and emits `RenderCommand`s: clear,
//! clipped tile blits and grid lines, then the frame decoration and text
//! readouts. Tiles whose projected rectangle misses the viewport are
//! culled before a blit is emitted.

use crate::backends::RenderCommand;
use crate::config::Theme;
use crate::geom::{ScreenRect, WorldRect};
use crate::map::{TileAtlas, TileHit};
use crate::view::ViewTransform;

/// Screen step below which grid lines would shade the whole viewport, in
/// pixels.
const MIN_GRID_STEP_PX: f32 = 4.0;
/// Gap between the viewport frame and the text readouts, in pixels.
const READOUT_PAD_PX: f32 = 5.0;

pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Composes one frame. `hover` is the resolved byte under the cursor,
    /// if any; it drives the highlight and the address readout.
    pub fn build_frame(
        &self,
        atlas: &TileAtlas,
        view: &ViewTransform,
        show_grid: bool,
        hover: Option<TileHit>,
    ) -> Vec<RenderCommand> {
        let vp = view.viewport();
        let mut commands = vec![
            RenderCommand::ClearAll {
                color: self.theme.clear,
            },
            RenderCommand::FillRect {
                rect: vp,
                color: self.theme.background,
            },
            RenderCommand::SetClip { rect: Some(vp) },
        ];

        self.push_tiles(&mut commands, atlas, view);
        if show_grid {
            self.push_grid(&mut commands, atlas, view);
        }
        if let Some(hit) = hover {
            self.push_highlight(&mut commands, hit, atlas.cell(), view);
        }

        commands.push(RenderCommand::SetClip { rect: None });
        commands.push(RenderCommand::StrokeRect {
            rect: vp,
            color: self.theme.accent,
        });
        self.push_readouts(&mut commands, atlas, view, hover);
        commands.push(RenderCommand::Present);
        commands
    }

    /// Translates a viewport-local rectangle into window coordinates.
    fn to_window(&self, view: &ViewTransform, local: ScreenRect) -> ScreenRect {
        let vp = view.viewport();
        ScreenRect::new(vp.x + local.x, vp.y + local.y, local.width, local.height)
    }

    fn push_tiles(&self, commands: &mut Vec<RenderCommand>, atlas: &TileAtlas, view: &ViewTransform) {
        for index in 0..atlas.tile_count() {
            let Some(world) = atlas.placement_of(index) else {
                continue;
            };
            let local = view.screen_rect(world);
            if !view.is_in_viewport(&local) {
                continue;
            }
            commands.push(RenderCommand::BlitTile {
                tile_index: index,
                dst: self.to_window(view, local),
                tint: self.theme.tile,
            });
        }
    }

    /// Grid lines at tile boundaries, stepped in screen space. The first
    /// line is phase-locked to the world origin so lines stay glued to the
    /// tiles while panning.
    fn push_grid(&self, commands: &mut Vec<RenderCommand>, atlas: &TileAtlas, view: &ViewTransform) {
        let step = atlas.cell() as f32 * view.zoom();
        if step < MIN_GRID_STEP_PX {
            return;
        }
        let vp = view.viewport();

        let mut x = view.screen_x(0.0).rem_euclid(step);
        while x < vp.width {
            commands.push(RenderCommand::DrawLine {
                x0: vp.x + x,
                y0: vp.y,
                x1: vp.x + x,
                y1: vp.bottom() - 1.0,
                color: self.theme.accent,
            });
            x += step;
        }

        let mut y = view.screen_y(0.0).rem_euclid(step);
        while y < vp.height {
            commands.push(RenderCommand::DrawLine {
                x0: vp.x,
                y0: vp.y + y,
                x1: vp.right() - 1.0,
                y1: vp.y + y,
                color: self.theme.accent,
            });
            y += step;
        }
    }

    fn push_highlight(
        &self,
        commands: &mut Vec<RenderCommand>,
        hit: TileHit,
        cell: u32,
        view: &ViewTransform,
    ) {
        // One byte pixel is one world unit.
        let world = WorldRect::new(
            (hit.tile_x * cell + hit.intra_x) as f32,
            (hit.tile_y * cell + hit.intra_y) as f32,
            1.0,
            1.0,
        );
        let local = view.screen_rect(world);
        commands.push(RenderCommand::StrokeRect {
            rect: self.to_window(view, local),
            color: self.theme.highlight,
        });
    }

    fn push_readouts(
        &self,
        commands: &mut Vec<RenderCommand>,
        atlas: &TileAtlas,
        view: &ViewTransform,
        hover: Option<TileHit>,
    ) {
        let vp = view.viewport();
        let y = vp.bottom() + READOUT_PAD_PX;

        // Readouts sit on a panel strip spanning the viewport width.
        commands.push(RenderCommand::FillRect {
            rect: ScreenRect::new(
                vp.x,
                y - 1.0,
                vp.width,
                crate::font::GLYPH_HEIGHT as f32 + 2.0,
            ),
            color: self.theme.panel,
        });

        let left = match hover {
            Some(hit) => {
                let offset = hit.byte_offset(atlas.cell());
                let value = atlas.byte_at(hit.tile_index, hit.intra_x, hit.intra_y);
                format!("0x{offset:08X} (0x{value:02X})")
            }
            None => String::new(),
        };
        if !left.is_empty() {
            commands.push(RenderCommand::DrawText {
                x: vp.x,
                y,
                text: left,
                color: self.theme.text,
            });
        }

        let zoom_text = format!("x{:.2}", view.zoom());
        let (w, _) = crate::font::measure(&zoom_text);
        commands.push(RenderCommand::DrawText {
            x: vp.right() - w as f32,
            y,
            text: zoom_text,
            color: self.theme.text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileBuilder;

    fn atlas(len: usize, cell: u32) -> TileAtlas {
        let data: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
        let mut b = TileBuilder::new(cell);
        b.push_chunk(&data);
        TileAtlas::attach(b.finish(), cell)
    }

    fn view() -> ViewTransform {
        let mut vt = ViewTransform::new();
        vt.set_viewport(ScreenRect::new(20.0, 20.0, 400.0, 400.0));
        vt.set_scale_limit(1.0, 32.0).unwrap();
        vt
    }

    #[test]
    fn frame_opens_with_clear_and_ends_with_present() {
        let r = Renderer::new(Theme::default());
        let commands = r.build_frame(&atlas(2560, 16), &view(), false, None);
        assert!(matches!(commands[0], RenderCommand::ClearAll { .. }));
        assert_eq!(commands.last(), Some(&RenderCommand::Present));
    }

    #[test]
    fn visible_tiles_are_blitted_offscreen_tiles_are_culled() {
        let r = Renderer::new(Theme::default());
        let a = atlas(2560, 16); // 10 tiles
        let mut vt = view();

        let blits = |commands: &[RenderCommand]| {
            commands
                .iter()
                .filter(|c| matches!(c, RenderCommand::BlitTile { .. }))
                .count()
        };

        // Identity framing: the whole 64x48-world map fits easily.
        assert_eq!(blits(&r.build_frame(&a, &vt, false, None)), 10);

        // Pan the content far off screen; everything culls.
        vt.pan(100_000.0, 0.0);
        assert_eq!(blits(&r.build_frame(&a, &vt, false, None)), 0);
    }

    #[test]
    fn grid_toggle_adds_lines_only_when_step_is_visible() {
        let r = Renderer::new(Theme::default());
        let a = atlas(2560, 16);
        let vt = view();

        let lines = |commands: &[RenderCommand]| {
            commands
                .iter()
                .filter(|c| matches!(c, RenderCommand::DrawLine { .. }))
                .count()
        };

        assert_eq!(lines(&r.build_frame(&a, &vt, false, None)), 0);
        assert!(lines(&r.build_frame(&a, &vt, true, None)) > 0);
    }

    #[test]
    fn readouts_sit_on_a_panel_strip_below_the_viewport() {
        let theme = Theme::default();
        let r = Renderer::new(theme.clone());
        let vt = view();
        let commands = r.build_frame(&atlas(256, 16), &vt, false, None);

        let strip = commands
            .iter()
            .find_map(|c| match c {
                RenderCommand::FillRect { rect, color } if *color == theme.panel => Some(*rect),
                _ => None,
            })
            .expect("panel strip fill");
        assert!(strip.y >= vt.viewport().bottom());
        assert_eq!(strip.width, vt.viewport().width);
    }

    #[test]
    fn hover_produces_an_address_readout() {
        let r = Renderer::new(Theme::default());
        let a = atlas(256, 16);
        let vt = view();
        let hit = TileHit {
            tile_x: 0,
            tile_y: 0,
            intra_x: 5,
            intra_y: 5,
            tile_index: 0,
        };

        let commands = r.build_frame(&a, &vt, false, Some(hit));
        let texts: Vec<&String> = commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        // Offset 85 = 0x55, byte value 85.
        assert!(texts.iter().any(|t| t.contains("0x00000055")));
        assert!(texts.iter().any(|t| t.contains("(0x55)")));
    }
}
