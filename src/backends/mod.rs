// src/backends/mod.rs

//! Defines the `Driver` trait for windowing backends and the common types
//! shared by backends and the renderer, such as `BackendEvent`,
//! `RenderCommand`, and `DriverCommand`.
//!
//! The renderer never talks to a window system directly; it emits
//! `RenderCommand`s, the rasterizer turns those into framebuffer pixels plus
//! `DriverCommand`s, and a `Driver` owns the window and the presentation.
//! That split keeps everything above the driver testable without a display.

use crate::color::Rgba;
use crate::geom::ScreenRect;
pub use crate::keys::{KeySymbol, Modifiers};
use anyhow::Result;

#[cfg(test)]
pub mod mock;
pub mod x11;

/// Represents events originating from the windowing backend. These are
/// translated from native events and consumed by the interaction
/// controller.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// A keyboard key was pressed.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
    },
    /// The window was resized by the platform. Dimensions are in pixels.
    Resize { width_px: u32, height_px: u32 },
    /// The platform asked the window to close (e.g. the close button).
    CloseRequested,
    /// A mouse button was pressed.
    MouseButtonPress {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// A mouse button was released.
    MouseButtonRelease {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// The mouse was moved.
    MouseMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    /// A region of the window was exposed and needs repainting.
    Expose,
}

/// Represents mouse buttons. X11 reports wheel motion as button 4/5
/// presses; backends translate those to the scroll variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Other(u8),
}

/// Commands emitted by the renderer, consumed by the rasterizer.
///
/// Coordinates are window-relative screen pixels. A `SetClip` applies to
/// every subsequent command until the next `SetClip`.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Clears the entire framebuffer with the given color.
    ClearAll { color: Rgba },
    /// Restricts subsequent drawing to `rect`, or lifts the restriction.
    SetClip { rect: Option<ScreenRect> },
    /// Scales a tile's render surface into `dst`, tinting each pixel with
    /// `tint`.
    BlitTile {
        tile_index: usize,
        dst: ScreenRect,
        tint: Rgba,
    },
    /// Fills a rectangle.
    FillRect { rect: ScreenRect, color: Rgba },
    /// Strokes a one-pixel rectangle outline.
    StrokeRect { rect: ScreenRect, color: Rgba },
    /// Draws a one-pixel line between two points.
    DrawLine {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        color: Rgba,
    },
    /// Draws a text string with the built-in bitmap font, top-left anchored.
    DrawText {
        x: f32,
        y: f32,
        text: String,
        color: Rgba,
    },
    /// Presents the composed frame.
    Present,
}

/// Minimal commands a driver must execute after the rasterizer has written
/// the framebuffer. Pixel data never travels through these.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCommand {
    /// Present the framebuffer to the screen.
    Present,
    /// Set the window title.
    SetTitle { title: String },
}

/// Defines the interface between the viewer and a window system.
///
/// A `Driver` owns the window, translates native events into
/// `BackendEvent`s, and presents the framebuffer composed by the
/// rasterizer. Everything above it is display-agnostic.
pub trait Driver {
    /// Processes any pending platform events, translating them into
    /// generic `BackendEvent`s. Non-blocking; returns an empty vector when
    /// nothing is pending.
    fn process_events(&mut self) -> Result<Vec<BackendEvent>>;

    /// Current drawable size in pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Mutable access to the driver's RGBA framebuffer, row-major, 4 bytes
    /// per pixel. The rasterizer writes frames directly into this buffer.
    fn framebuffer_mut(&mut self) -> &mut [u8];

    /// Pushes the framebuffer to the screen.
    fn present(&mut self) -> Result<()>;

    /// Sets the window title.
    fn set_title(&mut self, title: &str);

    /// Executes post-rasterization commands.
    fn execute(&mut self, commands: Vec<DriverCommand>) -> Result<()> {
        for command in commands {
            match command {
                DriverCommand::Present => self.present()?,
                DriverCommand::SetTitle { title } => self.set_title(&title),
            }
        }
        Ok(())
    }

    /// Releases platform resources. Idempotent; also invoked on drop by
    /// implementations that own native handles.
    fn cleanup(&mut self) -> Result<()>;
}
