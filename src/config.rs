// src/config.rs

//! Defines the configuration structures for the viewer.
//!
//! This module provides a set of structs that can be deserialized from a
//! JSON configuration file to customize the viewer's appearance and
//! behavior. Default values are provided for every option, so an absent or
//! partial file always yields a usable configuration.

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgba;

/// Hard bounds on the window dimensions a configuration may request.
pub const MIN_WINDOW_WIDTH: u32 = 200;
pub const MAX_WINDOW_WIDTH: u32 = 7680;
pub const MIN_WINDOW_HEIGHT: u32 = 100;
pub const MAX_WINDOW_HEIGHT: u32 = 4320;

/// Largest tile edge a configuration may request. A cell of 256 is already
/// 64 KiB of file per tile.
pub const MAX_CELL_SIZE: u32 = 256;

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the viewer.
///
/// This struct is the root of the configuration and is intended to be
/// deserialized from a configuration file. It groups settings into logical
/// categories.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Window-related settings.
    pub window: WindowConfig,
    /// Pixel-map viewer settings.
    pub viewer: ViewerConfig,
    /// Performance-related settings.
    pub performance: PerformanceConfig,
    /// Color theme.
    pub theme: Theme,
}

impl Config {
    /// Loads a configuration file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Rejects values the viewer cannot run with. Cosmetic settings are
    /// never validated; geometry and scale settings are.
    pub fn validate(&self) -> Result<()> {
        let w = &self.window;
        if !(MIN_WINDOW_WIDTH..=MAX_WINDOW_WIDTH).contains(&w.width)
            || !(MIN_WINDOW_HEIGHT..=MAX_WINDOW_HEIGHT).contains(&w.height)
        {
            bail!(
                "window size {}x{} is outside {}x{}..{}x{}",
                w.width,
                w.height,
                MIN_WINDOW_WIDTH,
                MIN_WINDOW_HEIGHT,
                MAX_WINDOW_WIDTH,
                MAX_WINDOW_HEIGHT
            );
        }
        let v = &self.viewer;
        if v.cell_size == 0 || v.cell_size > MAX_CELL_SIZE {
            bail!("cell size {} is outside 1..={MAX_CELL_SIZE}", v.cell_size);
        }
        if !v.zoom_step.is_finite() || v.zoom_step <= 0.0 {
            bail!("zoom step must be positive (got {})", v.zoom_step);
        }
        if !v.zoom_max.is_finite() || v.zoom_max < 1.0 {
            bail!("zoom maximum must be at least 1 (got {})", v.zoom_max);
        }
        Ok(())
    }
}

// --- Window Configuration ---

/// Defines the initial window geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Inset between the window edge and the tile viewport, in pixels.
    pub border_pixels: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 800,
            height: 600,
            border_pixels: 20,
        }
    }
}

// --- Viewer Configuration ---

/// Defines the pixel-map geometry and interaction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Tile edge length in byte pixels. Each tile covers `cell_size^2`
    /// bytes of the source stream.
    pub cell_size: u32,
    /// Multiplicative step applied per wheel notch when zooming.
    pub zoom_step: f32,
    /// Upper zoom bound, in screen pixels per byte pixel. The lower bound
    /// is computed at startup so the whole map fits the window.
    pub zoom_max: f32,
    /// Whether the tile grid overlay starts enabled.
    pub show_grid: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            cell_size: 16,
            zoom_step: 0.125,
            zoom_max: 32.0,
            show_grid: true,
        }
    }
}

// --- Performance Configuration ---

/// Defines settings related to the redraw loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Sleep per iteration of the event loop when nothing is dirty, in
    /// milliseconds. Keeps an idle viewer off the CPU.
    pub idle_sleep_ms: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig { idle_sleep_ms: 1 }
    }
}

// --- Theme Configuration ---

/// Colors used by the viewer, written in configuration as packed
/// `0xRRGGBBAA` integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Window clear color, visible outside the viewport inset.
    pub clear: Rgba,
    /// Viewport background behind the tiles.
    pub background: Rgba,
    /// Fill behind text readouts.
    pub panel: Rgba,
    /// Accent used for grid lines and the viewport frame.
    pub accent: Rgba,
    /// Tint applied to tile pixels.
    pub tile: Rgba,
    /// Color for text readouts.
    pub text: Rgba,
    /// Highlight for the byte under the cursor.
    pub highlight: Rgba,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            clear: Rgba::from_u32(0x5555_55FF),
            background: Rgba::from_u32(0x2828_28FF),
            panel: Rgba::from_u32(0x1818_18FF),
            accent: Rgba::from_u32(0x5EC4_F6FF),
            tile: Rgba::from_u32(0xFFFF_FFFF),
            text: Rgba::from_u32(0x8080_80FF),
            highlight: Rgba::from_u32(0xFF00_00FF),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "viewer": { "cell_size": 32 } }"#).unwrap();
        assert_eq!(config.viewer.cell_size, 32);
        assert_eq!(config.viewer.zoom_step, 0.125);
        assert_eq!(config.window.width, 800);
        config.validate().unwrap();
    }

    #[test]
    fn theme_colors_parse_from_packed_ints() {
        let config: Config =
            serde_json::from_str(r#"{ "theme": { "accent": 4278190335 } }"#).unwrap();
        assert_eq!(config.theme.accent, Rgba::from_u32(0xFF00_00FF));
        // Untouched entries keep the defaults.
        assert_eq!(config.theme.background, Rgba::from_u32(0x2828_28FF));
    }

    #[test]
    fn out_of_range_geometry_is_rejected() {
        let mut config = Config::default();
        config.viewer.cell_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.viewer.cell_size = MAX_CELL_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window.width = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.viewer.zoom_step = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.viewer.cell_size, 16);
    }
}
