//! Ridgeline Engine Library
//!
//! A procedural mountain viewer: a randomly displaced terrain mesh with a
//! textured standard material, lit by an ambient and a point light, viewed
//! through a damped orbit camera and tweaked live from a parameter panel.
//!
//! # Modules
//!
//! - [`render`] - wgpu context, textures, mesh and overlay passes
//! - [`camera`] - Damped orbit camera
//! - [`error`] - Library error type
//! - [`game`] - Mountain generation, scene graph, panel and config
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng;
//! use ridgeline_engine::game::mountain::{MountainFolders, Parameters, TerrainState};
//! use ridgeline_engine::game::scene::Scene;
//! use ridgeline_engine::game::ui::Panel;
//!
//! let mut scene = Scene::new();
//! let mut panel = Panel::new(1280.0, 720.0);
//! let settings = panel.add_folder("Mountains Settings");
//! let background = panel.add_folder("Background");
//!
//! let mut terrain = TerrainState::new(MountainFolders { settings, background });
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! terrain.regenerate(&Parameters::default(), &mut scene, &mut panel, &mut rng);
//! assert_eq!(scene.mesh_count(), 1);
//! ```

pub mod camera;
pub mod error;
pub mod render;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use error::{Result, RidgelineError};
