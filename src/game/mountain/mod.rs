//! Mountain Module
//!
//! Parameters, plane geometry, the rock material and the generator that
//! rebuilds the mountain whenever a tracked parameter changes.

pub mod generator;
pub mod geometry;
pub mod material;
pub mod params;

pub use generator::{
    MountainBindings, MountainFolders, MountainHandles, TILT_ANGLE, TerrainState,
    displace_heights,
};
pub use geometry::Geometry;
pub use material::{ROCK_TINT, Side, StandardMaterial, TextureRole, TextureSlots};
pub use params::{MIN_PLANE_EXTENT, Parameters};
