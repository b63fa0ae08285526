//! Mountain Parameters
//!
//! The configuration record read by the mesh generator on every
//! regeneration. Edited live through the parameter panel.

use serde::{Deserialize, Serialize};

/// Smallest plane extent the generator will build.
pub const MIN_PLANE_EXTENT: f32 = 0.01;

/// Adjustable mountain generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub plane_width: f32,
    pub plane_height: f32,
    pub segments_width: u32,
    pub segments_height: u32,
    /// Upper bound (exclusive) of the random vertex height
    pub mountain_height: f32,
    /// Spin the mountain slowly around Y
    pub animate: bool,
    /// Clear color as `0xRRGGBB`
    pub bg_color: u32,
    // Accepted in config files; nothing reads them yet.
    pub spin: f32,
    pub angle: f32,
    pub power: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            plane_width: 5.0,
            plane_height: 5.0,
            segments_width: 20,
            segments_height: 20,
            mountain_height: 0.31,
            animate: true,
            bg_color: 0x000000,
            spin: 1.0,
            angle: 1.0,
            power: 1.0,
        }
    }
}

impl Parameters {
    /// Copy with values the generator cannot build from pulled back into range:
    /// segment counts of at least 1, positive plane extents and a
    /// non-negative mountain height.
    pub fn sanitized(&self) -> Self {
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            plane_width: finite_or(self.plane_width, MIN_PLANE_EXTENT).max(MIN_PLANE_EXTENT),
            plane_height: finite_or(self.plane_height, MIN_PLANE_EXTENT).max(MIN_PLANE_EXTENT),
            segments_width: self.segments_width.max(1),
            segments_height: self.segments_height.max(1),
            mountain_height: finite_or(self.mountain_height, 0.0).max(0.0),
            ..self.clone()
        }
    }

    /// Number of grid vertices a plane built from these parameters has.
    pub fn vertex_count(&self) -> usize {
        let p = self.sanitized();
        (p.segments_width as usize + 1) * (p.segments_height as usize + 1)
    }
}
