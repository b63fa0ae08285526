//! Error Types
//!
//! Failures the viewer can surface to its caller. Anything recoverable at
//! runtime (a missing texture, a lost surface) is logged and worked around
//! instead of being returned.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while bringing up the GPU, loading configuration or
/// decoding texture images.
#[derive(Debug, Error)]
pub enum RidgelineError {
    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode texture {}: {source}", path.display())]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, RidgelineError>;
