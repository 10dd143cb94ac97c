// src/controller.rs

//! The interaction controller: owns the viewer state and the redraw loop.
//!
//! The controller consumes `BackendEvent`s, mutates the view transform,
//! and marks the frame dirty; `render_if_needed` then runs the renderer
//! and rasterizer against the driver's framebuffer. Keeping the controller
//! free of any window-system types means the whole input grammar is
//! testable against a mock driver.
//!
//! Input grammar:
//!   wheel            zoom in/out by the configured step
//!   left drag        pan
//!   ctrl+left drag   zoom by vertical drag distance
//!   g                toggle the tile grid
//!   c / Home         reset to the home framing
//!   q / Escape       quit
//!
//! While the button is held the gesture follows the modifier state of each
//! motion event, so pressing or releasing ctrl mid-drag switches between
//! panning and scaling without re-pressing the button.

use crate::backends::{BackendEvent, Driver, KeySymbol, Modifiers, MouseButton};
use crate::config::Config;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::map::{resolve, TileAtlas, TileHit};
use crate::rasterizer::SoftwareRasterizer;
use crate::renderer::Renderer;
use crate::view::ViewTransform;
use anyhow::Result;
use log::{debug, info};
use std::time::Duration;

/// Screen pixels of vertical drag equal to one wheel notch when scaling
/// with ctrl+drag.
const DRAG_SCALE_DIVISOR: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Quit,
}

/// Mouse gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    Panning,
    Scaling,
}

pub struct ViewerController {
    atlas: TileAtlas,
    view: ViewTransform,
    renderer: Renderer,
    rasterizer: SoftwareRasterizer,
    zoom_step: f32,
    zoom_max: f32,
    border: f32,
    show_grid: bool,
    gesture: Gesture,
    last_mouse: ScreenPoint,
    hover: Option<TileHit>,
    dirty: bool,
}

impl ViewerController {
    pub fn new(atlas: TileAtlas, config: &Config, surface: (u32, u32)) -> Result<Self> {
        let mut controller = Self {
            atlas,
            view: ViewTransform::new(),
            renderer: Renderer::new(config.theme.clone()),
            rasterizer: SoftwareRasterizer::new(),
            zoom_step: config.viewer.zoom_step,
            zoom_max: config.viewer.zoom_max,
            border: config.window.border_pixels as f32,
            show_grid: config.viewer.show_grid,
            gesture: Gesture::Idle,
            last_mouse: ScreenPoint::default(),
            hover: None,
            dirty: true,
        };
        controller.fit_to_surface(surface.0, surface.1)?;
        Ok(controller)
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn hover(&self) -> Option<TileHit> {
        self.hover
    }

    /// Recomputes the viewport and home framing for a window size: the
    /// viewport is the window inset by the border, the minimum zoom is the
    /// one that fits the whole map, and the home offset centers it.
    fn fit_to_surface(&mut self, width: u32, height: u32) -> Result<()> {
        let vp = ScreenRect::new(
            self.border,
            self.border,
            (width as f32 - 2.0 * self.border).max(1.0),
            (height as f32 - 2.0 * self.border).max(1.0),
        );
        self.view.set_viewport(vp);

        let extent = self.atlas.geometry().world_extent().max(1.0);
        let fit = (vp.width.min(vp.height) / extent).min(self.zoom_max);
        self.view.set_scale_limit(fit, self.zoom_max)?;

        // Center the map in the viewport at the fitted zoom.
        let home_x = -(vp.width / fit - extent) / 2.0;
        let home_y = -(vp.height / fit - extent) / 2.0;
        self.view.set_home(home_x, home_y);
        self.view.reset();
        debug!("fitted {}x{} window: zoom range [{fit}, {}]", width, height, self.zoom_max);
        self.dirty = true;
        Ok(())
    }

    /// Drains the driver's pending events. Returns `Status::Quit` once the
    /// viewer should exit.
    pub fn process_event_cycle(&mut self, driver: &mut impl Driver) -> Result<Status> {
        for event in driver.process_events()? {
            if self.handle_event(event)? == Status::Quit {
                return Ok(Status::Quit);
            }
        }
        Ok(Status::Running)
    }

    fn handle_event(&mut self, event: BackendEvent) -> Result<Status> {
        match event {
            BackendEvent::CloseRequested => return Ok(Status::Quit),
            BackendEvent::Key { symbol, .. } => return self.handle_key(symbol),
            BackendEvent::Resize {
                width_px,
                height_px,
            } => self.fit_to_surface(width_px, height_px)?,
            BackendEvent::Expose => self.dirty = true,
            BackendEvent::MouseButtonPress {
                button,
                x,
                y,
                modifiers,
            } => self.handle_button_press(button, ScreenPoint::new(x, y), modifiers),
            BackendEvent::MouseButtonRelease { button, .. } => {
                if button == MouseButton::Left {
                    self.gesture = Gesture::Idle;
                }
            }
            BackendEvent::MouseMove { x, y, modifiers } => {
                self.handle_motion(ScreenPoint::new(x, y), modifiers)
            }
        }
        Ok(Status::Running)
    }

    fn handle_key(&mut self, symbol: KeySymbol) -> Result<Status> {
        if symbol.is_modifier() {
            return Ok(Status::Running);
        }
        match symbol {
            KeySymbol::Escape | KeySymbol::Char('q') => return Ok(Status::Quit),
            KeySymbol::Char('g') => {
                self.show_grid = !self.show_grid;
                self.dirty = true;
            }
            KeySymbol::Char('c') | KeySymbol::Home => {
                self.view.reset();
                self.dirty = true;
            }
            _ => {}
        }
        Ok(Status::Running)
    }

    fn handle_button_press(&mut self, button: MouseButton, at: ScreenPoint, modifiers: Modifiers) {
        match button {
            MouseButton::ScrollUp => {
                self.view.zoom_by(self.zoom_step, true);
                self.dirty = true;
            }
            MouseButton::ScrollDown => {
                self.view.zoom_by(self.zoom_step, false);
                self.dirty = true;
            }
            MouseButton::Left => {
                self.gesture = if modifiers.contains(Modifiers::CONTROL) {
                    Gesture::Scaling
                } else {
                    Gesture::Panning
                };
                self.last_mouse = at;
            }
            _ => {}
        }
    }

    fn handle_motion(&mut self, at: ScreenPoint, modifiers: Modifiers) {
        let dx = at.x - self.last_mouse.x;
        let dy = at.y - self.last_mouse.y;
        self.last_mouse = at;

        // The gesture tracks the live modifier state, not the state at
        // button press; ctrl takes priority while held.
        if self.gesture != Gesture::Idle {
            self.gesture = if modifiers.contains(Modifiers::CONTROL) {
                Gesture::Scaling
            } else {
                Gesture::Panning
            };
        }

        match self.gesture {
            Gesture::Panning => {
                self.view.pan(dx, dy);
                self.dirty = true;
            }
            Gesture::Scaling => {
                let magnitude = (dx * dx + dy * dy).sqrt() / DRAG_SCALE_DIVISOR * self.zoom_step;
                self.view.zoom_by(magnitude, dy < 0.0);
                self.dirty = true;
            }
            Gesture::Idle => {}
        }

        // Hover resolution runs in viewport-local coordinates.
        let vp = self.view.viewport();
        let local = ScreenPoint::new(at.x - vp.x, at.y - vp.y);
        let hit = if vp.contains(at) {
            resolve(local, &self.view, &self.atlas.geometry())
        } else {
            None
        };
        if hit != self.hover {
            self.hover = hit;
            self.dirty = true;
        }
    }

    /// Rebuilds and presents a frame when anything changed since the last
    /// one. Redraw-on-demand: an idle viewer presents nothing.
    pub fn render_if_needed(&mut self, driver: &mut impl Driver) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        let commands = self
            .renderer
            .build_frame(&self.atlas, &self.view, self.show_grid, self.hover);
        let (width, height) = driver.surface_size();
        let driver_commands = self.rasterizer.compile_into_buffer(
            commands,
            &self.atlas,
            driver.framebuffer_mut(),
            width as usize,
            height as usize,
        );
        driver.execute(driver_commands)
    }
}

/// Runs the viewer loop against a driver until quit.
pub fn run_loop(
    mut controller: ViewerController,
    driver: &mut impl Driver,
    idle_sleep: Duration,
) -> Result<()> {
    info!("entering viewer loop");
    loop {
        if controller.process_event_cycle(driver)? == Status::Quit {
            break;
        }
        controller.render_if_needed(driver)?;
        std::thread::sleep(idle_sleep);
    }
    info!("viewer loop finished");
    driver.cleanup()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::MockDriver;
    use crate::map::TileBuilder;

    fn controller() -> ViewerController {
        let data: Vec<u8> = (0..2560).map(|i| (i % 256) as u8).collect();
        let mut b = TileBuilder::new(16);
        b.push_chunk(&data);
        let atlas = TileAtlas::attach(b.finish(), 16);
        ViewerController::new(atlas, &Config::default(), (800, 600)).unwrap()
    }

    #[test]
    fn initial_framing_fits_the_map() {
        let c = controller();
        // 10 tiles of cell 16: 4 per row, world extent 64; viewport is
        // 760x560, so the fitting zoom is 560/64.
        assert!((c.view().zoom() - 560.0 / 64.0).abs() < 1e-3);
        assert_eq!(c.view().zoom(), c.view().zoom_min());
    }

    #[test]
    fn wheel_zooms_and_drag_pans() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);
        let z0 = c.view().zoom();

        d.push_event(BackendEvent::MouseButtonPress {
            button: MouseButton::ScrollUp,
            x: 100.0,
            y: 100.0,
            modifiers: Modifiers::empty(),
        });
        assert_eq!(c.process_event_cycle(&mut d).unwrap(), Status::Running);
        assert!(c.view().zoom() > z0);

        let o0 = c.view().offset();
        d.push_event(BackendEvent::MouseButtonPress {
            button: MouseButton::Left,
            x: 100.0,
            y: 100.0,
            modifiers: Modifiers::empty(),
        });
        d.push_event(BackendEvent::MouseMove {
            x: 150.0,
            y: 100.0,
            modifiers: Modifiers::empty(),
        });
        d.push_event(BackendEvent::MouseButtonRelease {
            button: MouseButton::Left,
            x: 150.0,
            y: 100.0,
            modifiers: Modifiers::empty(),
        });
        c.process_event_cycle(&mut d).unwrap();
        assert!(c.view().offset().x < o0.x);
    }

    #[test]
    fn ctrl_drag_scales_instead_of_panning() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);
        let z0 = c.view().zoom();
        let o0 = c.view().offset();

        d.push_event(BackendEvent::MouseButtonPress {
            button: MouseButton::Left,
            x: 100.0,
            y: 200.0,
            modifiers: Modifiers::CONTROL,
        });
        d.push_event(BackendEvent::MouseMove {
            x: 100.0,
            y: 120.0,
            modifiers: Modifiers::CONTROL,
        });
        c.process_event_cycle(&mut d).unwrap();
        assert!(c.view().zoom() > z0);
        assert_eq!(c.view().offset(), o0);
    }

    #[test]
    fn ctrl_mid_drag_switches_between_pan_and_zoom() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);
        let z0 = c.view().zoom();

        // Start a plain drag, then hold ctrl without releasing the button:
        // the next motion scales instead of panning.
        d.push_event(BackendEvent::MouseButtonPress {
            button: MouseButton::Left,
            x: 100.0,
            y: 200.0,
            modifiers: Modifiers::empty(),
        });
        d.push_event(BackendEvent::MouseMove {
            x: 100.0,
            y: 180.0,
            modifiers: Modifiers::CONTROL,
        });
        c.process_event_cycle(&mut d).unwrap();
        assert!(c.view().zoom() > z0, "ctrl-held motion should zoom");
        let z1 = c.view().zoom();
        let o1 = c.view().offset();

        // Release ctrl mid-drag: motion goes back to panning.
        d.push_event(BackendEvent::MouseMove {
            x: 150.0,
            y: 180.0,
            modifiers: Modifiers::empty(),
        });
        c.process_event_cycle(&mut d).unwrap();
        assert_eq!(c.view().zoom(), z1);
        assert!(c.view().offset().x < o1.x);
    }

    #[test]
    fn keys_toggle_grid_reset_and_quit() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);
        let grid0 = c.show_grid();

        d.push_event(BackendEvent::Key {
            symbol: KeySymbol::Char('g'),
            modifiers: Modifiers::empty(),
        });
        c.process_event_cycle(&mut d).unwrap();
        assert_eq!(c.show_grid(), !grid0);

        // Disturb the view, then reset with Home.
        d.push_event(BackendEvent::MouseButtonPress {
            button: MouseButton::ScrollUp,
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers::empty(),
        });
        d.push_event(BackendEvent::Key {
            symbol: KeySymbol::Home,
            modifiers: Modifiers::empty(),
        });
        c.process_event_cycle(&mut d).unwrap();
        assert_eq!(c.view().zoom(), c.view().zoom_min());

        d.push_event(BackendEvent::Key {
            symbol: KeySymbol::Escape,
            modifiers: Modifiers::empty(),
        });
        assert_eq!(c.process_event_cycle(&mut d).unwrap(), Status::Quit);
    }

    #[test]
    fn close_request_quits() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);
        d.push_event(BackendEvent::CloseRequested);
        assert_eq!(c.process_event_cycle(&mut d).unwrap(), Status::Quit);
    }

    #[test]
    fn frames_present_only_when_dirty() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);

        c.render_if_needed(&mut d).unwrap();
        assert_eq!(d.presented_frames, 1);

        // Nothing changed; no new frame.
        c.render_if_needed(&mut d).unwrap();
        assert_eq!(d.presented_frames, 1);

        d.push_event(BackendEvent::Expose);
        c.process_event_cycle(&mut d).unwrap();
        c.render_if_needed(&mut d).unwrap();
        assert_eq!(d.presented_frames, 2);
    }

    #[test]
    fn hover_tracks_the_byte_under_the_cursor() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);

        // The map is centered; its world origin projects to a point inside
        // the viewport. Aim at world (5.5, 5.5).
        let vp = c.view().viewport();
        let sx = vp.x + c.view().screen_x(5.5);
        let sy = vp.y + c.view().screen_y(5.5);
        d.push_event(BackendEvent::MouseMove {
            x: sx,
            y: sy,
            modifiers: Modifiers::empty(),
        });
        c.process_event_cycle(&mut d).unwrap();

        let hit = c.hover().expect("cursor over the map resolves");
        assert_eq!((hit.tile_x, hit.tile_y), (0, 0));
        assert_eq!((hit.intra_x, hit.intra_y), (5, 5));
    }

    #[test]
    fn resize_refits_and_redraws() {
        let mut c = controller();
        let mut d = MockDriver::new(800, 600);
        c.render_if_needed(&mut d).unwrap();

        d.push_event(BackendEvent::Resize {
            width_px: 1000,
            height_px: 1000,
        });
        c.process_event_cycle(&mut d).unwrap();
        assert!((c.view().zoom() - 960.0 / 64.0).abs() < 1e-3);
    }
}
