//! Shared Types Module
//!
//! Overlay vertex and mesh structures plus the `Color` type shared by the
//! scene, the material and the parameter panel.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

// ============================================================================
// OVERLAY VERTEX TYPES
// ============================================================================

/// Vertex for 2D overlay quads (panel, text)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<Vertex>(), 28);

// ============================================================================
// MESH STRUCTURE
// ============================================================================

/// A mesh with vertices and indices
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// COLOR
// ============================================================================

/// An sRGB color with components in `[0, 1]`.
///
/// Colors are authored as hex values (`0xababab`) the way the panel shows
/// them and converted to linear space only when uploaded to the GPU.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Pack back into `0xRRGGBB`, rounding each channel.
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn channel(self, index: usize) -> f32 {
        match index {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    pub fn set_channel(&mut self, index: usize, value: f32) {
        let value = value.clamp(0.0, 1.0);
        match index {
            0 => self.r = value,
            1 => self.g = value,
            _ => self.b = value,
        }
    }

    /// Convert to linear space for lighting math.
    pub fn to_linear(self) -> Vec3 {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Vec3::new(decode(self.r), decode(self.g), decode(self.b))
    }

    pub fn to_array(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
