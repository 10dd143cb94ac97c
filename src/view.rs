// src/view.rs

//! The `ViewTransform`: the affine mapping between world space and screen
//! space, plus the pan/zoom state the interactive viewer mutates.
//!
//! The transform is deliberately dumb about *what* is being viewed; it knows
//! a viewport rectangle, a world-space offset, and a zoom factor bounded by
//! `[zoom_min, zoom_max]`. Conversions are
//!
//! ```text
//!   world  = screen / zoom + offset
//!   screen = (world - offset) * zoom
//! ```
//!
//! which are exact inverses of each other for any finite zoom. Zoom is never
//! allowed to reach zero: the minimum scale limit is validated to be a
//! strictly positive floor, and every zoom operation clamps (saturating, not
//! rejecting) into the configured range.

use crate::geom::{ScreenPoint, ScreenRect, WorldPoint, WorldRect};
use anyhow::{bail, Result};

/// Fallback zoom bounds used before `set_scale_limit` is called.
const DEFAULT_ZOOM_MIN: f32 = 1.0;
const DEFAULT_ZOOM_MAX: f32 = 32.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    viewport: ScreenRect,
    offset: WorldPoint,
    zoom: f32,
    zoom_min: f32,
    zoom_max: f32,
    home: WorldPoint,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            viewport: ScreenRect::default(),
            offset: WorldPoint::default(),
            zoom: DEFAULT_ZOOM_MIN,
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            home: WorldPoint::default(),
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_min(&self) -> f32 {
        self.zoom_min
    }

    pub fn zoom_max(&self) -> f32 {
        self.zoom_max
    }

    pub fn offset(&self) -> WorldPoint {
        self.offset
    }

    pub fn viewport(&self) -> ScreenRect {
        self.viewport
    }

    /// Replaces the screen-space rectangle tiles are rendered into. Callers
    /// typically follow a resize with `reset()` to recompute framing.
    pub fn set_viewport(&mut self, rect: ScreenRect) {
        self.viewport = rect;
    }

    /// Sets the allowed zoom range. The minimum must be a strictly positive
    /// finite floor; a zero minimum would make the inverse transform divide
    /// by zero once `reset()` snaps to it.
    pub fn set_scale_limit(&mut self, min: f32, max: f32) -> Result<()> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 {
            bail!("zoom minimum must be a positive finite value (got {min})");
        }
        if max < min {
            bail!("zoom maximum {max} is below minimum {min}");
        }
        self.zoom_min = min;
        self.zoom_max = max;
        self.zoom = self.zoom.clamp(min, max);
        Ok(())
    }

    /// Records the world-space origin that `reset()` returns to.
    pub fn set_home(&mut self, x: f32, y: f32) {
        self.home = WorldPoint::new(x, y);
    }

    /// Restores the recorded home origin and snaps zoom to the most
    /// zoomed-out legal state.
    pub fn reset(&mut self) {
        self.offset = self.home;
        self.zoom = self.zoom_min;
    }

    /// Translates the view by a screen-space delta. The delta is scaled by
    /// the inverse zoom so a drag covers the same number of window pixels at
    /// any magnification. Panning is unclamped: off-content regions simply
    /// render as background.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset.x -= dx / self.zoom;
        self.offset.y -= dy / self.zoom;
    }

    /// Scales the zoom by a multiplicative step of `magnitude` in the
    /// requested direction, saturating at the scale limits rather than
    /// rejecting the gesture.
    pub fn zoom_by(&mut self, magnitude: f32, zoom_in: bool) {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return;
        }
        let factor = 1.0 + magnitude;
        let next = if zoom_in {
            self.zoom * factor
        } else {
            self.zoom / factor
        };
        self.zoom = next.clamp(self.zoom_min, self.zoom_max);
    }

    pub fn view_x(&self, sx: f32) -> f32 {
        sx / self.zoom + self.offset.x
    }

    pub fn view_y(&self, sy: f32) -> f32 {
        sy / self.zoom + self.offset.y
    }

    pub fn screen_x(&self, vx: f32) -> f32 {
        (vx - self.offset.x) * self.zoom
    }

    pub fn screen_y(&self, vy: f32) -> f32 {
        (vy - self.offset.y) * self.zoom
    }

    pub fn view_point(&self, p: ScreenPoint) -> WorldPoint {
        WorldPoint::new(self.view_x(p.x), self.view_y(p.y))
    }

    pub fn screen_point(&self, p: WorldPoint) -> ScreenPoint {
        ScreenPoint::new(self.screen_x(p.x), self.screen_y(p.y))
    }

    /// Projects a world rectangle into viewport-local screen space.
    pub fn screen_rect(&self, r: WorldRect) -> ScreenRect {
        let x0 = self.screen_x(r.x);
        let y0 = self.screen_y(r.y);
        let x1 = self.screen_x(r.right());
        let y1 = self.screen_y(r.bottom());
        ScreenRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Whether a viewport-local screen rectangle overlaps the visible area.
    /// Used to cull tiles before a blit is issued.
    pub fn is_in_viewport(&self, rect: &ScreenRect) -> bool {
        let local = ScreenRect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        local.intersects(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> ViewTransform {
        let mut vt = ViewTransform::new();
        vt.set_viewport(ScreenRect::new(20.0, 20.0, 760.0, 560.0));
        vt.set_scale_limit(0.5, 64.0).unwrap();
        vt
    }

    #[test]
    fn screen_view_round_trip() {
        let mut vt = transform();
        vt.pan(37.5, -122.25);
        vt.zoom_by(0.75, true);

        for &v in &[0.0, 1.0, 5.5, 123.456, -88.25, 4096.0] {
            let s = vt.screen_x(v);
            assert!((vt.view_x(s) - v).abs() < 1e-3, "view(screen({v})) drifted");
            let w = vt.view_y(v);
            assert!((vt.screen_y(w) - v).abs() < 1e-3, "screen(view({v})) drifted");
        }
    }

    #[test]
    fn zoom_saturates_at_limits() {
        let mut vt = transform();
        for _ in 0..10_000 {
            vt.zoom_by(0.125, true);
        }
        assert!(vt.zoom() <= vt.zoom_max());
        assert_eq!(vt.zoom(), vt.zoom_max());

        for _ in 0..10_000 {
            vt.zoom_by(0.125, false);
        }
        assert!(vt.zoom() >= vt.zoom_min());
        assert_eq!(vt.zoom(), vt.zoom_min());
    }

    #[test]
    fn scale_limit_rejects_zero_floor() {
        let mut vt = ViewTransform::new();
        assert!(vt.set_scale_limit(0.0, 8.0).is_err());
        assert!(vt.set_scale_limit(-1.0, 8.0).is_err());
        assert!(vt.set_scale_limit(f32::NAN, 8.0).is_err());
        assert!(vt.set_scale_limit(4.0, 2.0).is_err());
        assert!(vt.set_scale_limit(0.001, 8.0).is_ok());
    }

    #[test]
    fn reset_restores_home_and_min_zoom() {
        let mut vt = transform();
        vt.set_home(12.0, 34.0);
        vt.pan(500.0, -300.0);
        vt.zoom_by(2.0, true);
        vt.zoom_by(0.3, true);

        vt.reset();
        assert_eq!(vt.offset(), WorldPoint::new(12.0, 34.0));
        assert_eq!(vt.zoom(), vt.zoom_min());
    }

    #[test]
    fn pan_is_zoom_compensated() {
        let mut vt = transform();
        // At zoom 2, a 100px drag should move the origin by 50 world units.
        while vt.zoom() < 2.0 {
            vt.zoom_by(1.0, true);
        }
        assert_eq!(vt.zoom(), 2.0);
        let before = vt.offset();
        vt.pan(100.0, 0.0);
        assert!((before.x - vt.offset().x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn clamping_existing_zoom_when_limits_shrink() {
        let mut vt = transform();
        for _ in 0..100 {
            vt.zoom_by(0.5, true);
        }
        assert_eq!(vt.zoom(), 64.0);
        vt.set_scale_limit(1.0, 8.0).unwrap();
        assert_eq!(vt.zoom(), 8.0);
    }

    #[test]
    fn viewport_culling() {
        let vt = transform();
        assert!(vt.is_in_viewport(&ScreenRect::new(10.0, 10.0, 50.0, 50.0)));
        assert!(vt.is_in_viewport(&ScreenRect::new(-40.0, -40.0, 50.0, 50.0)));
        assert!(!vt.is_in_viewport(&ScreenRect::new(-100.0, 0.0, 50.0, 50.0)));
        assert!(!vt.is_in_viewport(&ScreenRect::new(10_000.0, 0.0, 50.0, 50.0)));
    }

    #[test]
    fn world_rect_projection_matches_axes() {
        let mut vt = transform();
        vt.pan(-64.0, 32.0);
        let r = WorldRect::new(16.0, 32.0, 16.0, 16.0);
        let s = vt.screen_rect(r);
        assert!((s.x - vt.screen_x(16.0)).abs() < 1e-4);
        assert!((s.bottom() - vt.screen_y(48.0)).abs() < 1e-4);
    }
}
