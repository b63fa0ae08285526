//! Camera Module
//!
//! Window-system agnostic camera state and math.

pub mod orbit;

pub use orbit::{DAMPING_FACTOR, OrbitCamera, OrbitMouseButton};
