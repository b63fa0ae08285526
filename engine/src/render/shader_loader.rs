//! Shader Loading Utilities
//!
//! WGSL sources for the viewer's pipelines, embedded at compile time.

/// Shaders compiled into the binary.
pub mod embedded {
    /// Lit, textured mountain surface
    pub const MOUNTAIN: &str = include_str!("../../../shaders/mountain.wgsl");
    /// Panel overlay
    pub const OVERLAY: &str = include_str!("../../../shaders/overlay.wgsl");
}

/// Create a wgpu shader module from WGSL source.
pub fn create_shader_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::embedded;

    #[test]
    fn test_entry_points_present() {
        for source in [embedded::MOUNTAIN, embedded::OVERLAY] {
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
    }
}
