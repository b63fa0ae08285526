//! Render Module
//!
//! wgpu plumbing for the viewer: GPU context, textures, and the mesh and
//! overlay passes.

pub mod gpu_context;
pub mod mesh_pass;
pub mod render_pass;
pub mod shader_loader;
pub mod texture;
pub mod ui_pass;

pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
pub use mesh_pass::{MeshRenderPass, MeshVertex, NodeUniforms, PipelineKind, SceneUniforms};
pub use render_pass::{FrameContext, RenderContext, RenderPass, RenderPassPriority, render_in_order};
pub use texture::TextureSet;
pub use ui_pass::UiRenderPass;
