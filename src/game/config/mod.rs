//! Config Module
//!
//! Startup configuration for the mountain viewer.

pub mod viewer_config;

pub use viewer_config::{DEFAULT_TEXTURE_DIR, ViewerConfig};
