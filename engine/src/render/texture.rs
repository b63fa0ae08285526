//! Rock Textures
//!
//! Loads the five rock maps from disk into GPU textures. A map that cannot
//! be read is logged and replaced by a single neutral texel, so the mountain
//! still renders (flat shaded, undisplaced) without its assets.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{Result, RidgelineError};
use crate::game::mountain::TextureRole;

/// File name of the map for `role` inside the texture directory
pub fn file_name(role: TextureRole) -> &'static str {
    match role {
        TextureRole::Color => "rock_06_diff_4k.jpg",
        TextureRole::Height => "rock_06_bump_4k.jpg",
        TextureRole::Normal => "rock_06_nor_gl_4k.jpg",
        TextureRole::AmbientOcclusion => "rock_06_ao_4k.jpg",
        TextureRole::Roughness => "rock_06_rough_4k.jpg",
    }
}

pub fn texture_path(dir: &Path, role: TextureRole) -> PathBuf {
    dir.join(file_name(role))
}

/// Texel substituted when a map is missing: no tint, no displacement,
/// an unperturbed normal, no occlusion and full roughness.
pub fn fallback_texel(role: TextureRole) -> [u8; 4] {
    match role {
        TextureRole::Color | TextureRole::AmbientOcclusion | TextureRole::Roughness => {
            [255, 255, 255, 255]
        }
        TextureRole::Height => [0, 0, 0, 255],
        TextureRole::Normal => [128, 128, 255, 255],
    }
}

/// Only the color map holds sRGB data.
pub fn texture_format(role: TextureRole) -> wgpu::TextureFormat {
    match role {
        TextureRole::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
        _ => wgpu::TextureFormat::Rgba8Unorm,
    }
}

/// Decode an image file to RGBA8
pub fn decode_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| RidgelineError::TextureDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// A texture and its default view
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Every rock map plus the samplers the mountain shader uses
pub struct TextureSet {
    loaded: [Option<GpuTexture>; 5],
    fallback: [GpuTexture; 5],
    /// Nearest filtering, for the color map
    pub color_sampler: wgpu::Sampler,
    /// Linear filtering, for every other map
    pub linear_sampler: wgpu::Sampler,
}

impl TextureSet {
    /// Load all maps from `dir`. Never fails; missing maps fall back.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, dir: &Path) -> Self {
        let loaded = TextureRole::ALL.map(|role| {
            let path = texture_path(dir, role);
            match decode_rgba(&path) {
                Ok(rgba) => {
                    let (width, height) = rgba.dimensions();
                    tracing::info!(role = role.name(), width, height, path = %path.display(), "loaded texture");
                    Some(GpuTexture::from_rgba(
                        device,
                        queue,
                        file_name(role),
                        texture_format(role),
                        width,
                        height,
                        &rgba,
                    ))
                }
                Err(err) => {
                    tracing::warn!(role = role.name(), error = %err, "using fallback texel");
                    None
                }
            }
        });

        let fallback = TextureRole::ALL.map(|role| {
            GpuTexture::from_rgba(
                device,
                queue,
                "Fallback Texel",
                texture_format(role),
                1,
                1,
                &fallback_texel(role),
            )
        });

        let color_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Color Map Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Linear Map Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            loaded,
            fallback,
            color_sampler,
            linear_sampler,
        }
    }

    /// View of the loaded map for `role`, or its fallback
    pub fn view(&self, role: TextureRole) -> &wgpu::TextureView {
        match &self.loaded[role.index()] {
            Some(texture) => &texture.view,
            None => self.fallback_view(role),
        }
    }

    /// Neutral view bound to an empty material slot
    pub fn fallback_view(&self, role: TextureRole) -> &wgpu::TextureView {
        &self.fallback[role.index()].view
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.iter().filter(|t| t.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_for_every_role() {
        let dir = Path::new("textures");
        assert_eq!(
            texture_path(dir, TextureRole::Color),
            PathBuf::from("textures/rock_06_diff_4k.jpg")
        );
        assert_eq!(file_name(TextureRole::Height), "rock_06_bump_4k.jpg");
        assert_eq!(file_name(TextureRole::Normal), "rock_06_nor_gl_4k.jpg");
        assert_eq!(file_name(TextureRole::AmbientOcclusion), "rock_06_ao_4k.jpg");
        assert_eq!(file_name(TextureRole::Roughness), "rock_06_rough_4k.jpg");
    }

    #[test]
    fn test_fallback_texels_are_neutral() {
        assert_eq!(fallback_texel(TextureRole::Height), [0, 0, 0, 255]);
        assert_eq!(fallback_texel(TextureRole::Normal), [128, 128, 255, 255]);
        assert_eq!(fallback_texel(TextureRole::Color), [255; 4]);
    }

    #[test]
    fn test_only_color_is_srgb() {
        for role in TextureRole::ALL {
            assert_eq!(texture_format(role).is_srgb(), role == TextureRole::Color);
        }
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode_rgba(Path::new("no/such/rock.jpg")).unwrap_err();
        assert!(matches!(err, RidgelineError::TextureDecode { .. }));
    }
}
