// src/color.rs

//! The `Rgba` color type shared by the theme, the renderer, and the
//! rasterizer.

use serde::{Deserialize, Serialize};

/// A straight (non-premultiplied) RGBA color.
///
/// Theme entries are written in configuration as packed `0xRRGGBBAA`
/// integers, the same notation the palette constants use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u32", into = "u32")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Unpacks a `0xRRGGBBAA` literal.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: (packed >> 24) as u8,
            g: (packed >> 16) as u8,
            b: (packed >> 8) as u8,
            a: packed as u8,
        }
    }

    pub const fn to_u32(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Source-over composition of `self` onto an opaque destination pixel.
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => Rgba::opaque(self.r, self.g, self.b),
            0 => dst,
            a => {
                let a = u32::from(a);
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * inv) / 255) as u8;
                Rgba::opaque(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
            }
        }
    }
}

impl From<u32> for Rgba {
    fn from(packed: u32) -> Self {
        Self::from_u32(packed)
    }
}

impl From<Rgba> for u32 {
    fn from(c: Rgba) -> Self {
        c.to_u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_round_trip() {
        let c = Rgba::from_u32(0x5EC4_F6FF);
        assert_eq!(c, Rgba::new(0x5E, 0xC4, 0xF6, 0xFF));
        assert_eq!(c.to_u32(), 0x5EC4_F6FF);
    }

    #[test]
    fn over_is_identity_at_alpha_extremes() {
        let dst = Rgba::opaque(10, 20, 30);
        assert_eq!(Rgba::new(200, 100, 50, 0).over(dst), dst);
        assert_eq!(
            Rgba::new(200, 100, 50, 255).over(dst),
            Rgba::opaque(200, 100, 50)
        );
    }

    #[test]
    fn over_mixes_at_half_alpha() {
        let out = Rgba::new(255, 255, 255, 128).over(Rgba::opaque(0, 0, 0));
        assert!(out.r >= 127 && out.r <= 129);
        assert_eq!(out.a, 255);
    }
}
