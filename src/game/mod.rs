//! Game Module
//!
//! The mountain demo built on top of the engine: generation parameters and
//! mesh generator, the scene graph, the parameter panel, startup config and
//! the demo state tying them together.

pub mod config;
pub mod demo;
pub mod mountain;
pub mod scene;
pub mod types;
pub mod ui;

pub use config::ViewerConfig;
pub use demo::MountainDemo;
pub use mountain::{Geometry, Parameters, StandardMaterial, TerrainState};
pub use scene::{AmbientLight, MeshNode, NodeId, PointLight, Scene};
pub use types::{Color, Mesh, Vertex};
pub use ui::{Panel, PanelEvent};
