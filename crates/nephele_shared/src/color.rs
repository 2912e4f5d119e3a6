//! Color types for sprite tinting and per-vertex mesh alpha.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::clamp01;

/// Linear RGBA color with f32 channels in [0, 1].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Rgba {
    /// Creates a new color
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Same color with the alpha channel replaced
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Packs into 8-bit channels, clamping each into [0, 1] first
    #[must_use]
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8::new(
            unit_to_byte(self.r),
            unit_to_byte(self.g),
            unit_to_byte(self.b),
            unit_to_byte(self.a),
        )
    }
}

/// Packed 8-bit RGBA, the per-vertex color format of submitted meshes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Rgba8 {
    /// Creates a new packed color
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Opaque white with a unit-interval alpha applied
    #[must_use]
    pub fn white_with_alpha(alpha: f32) -> Self {
        Self::new(255, 255, 255, unit_to_byte(alpha))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_byte(value: f32) -> u8 {
    (clamp01(value) * 255.0) as u8
}
