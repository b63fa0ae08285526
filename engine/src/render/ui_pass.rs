//! UI Render Pass
//!
//! Draws the panel's 2D quads on top of the scene.
//! No depth testing, uses alpha blending.

use super::render_pass::{FrameContext, RenderContext, RenderPass, RenderPassPriority};
use super::shader_loader::{create_shader_module, embedded};
use crate::game::types::{Mesh, Vertex};

const INITIAL_VERTEX_BYTES: u64 = 1024 * 1024;
const INITIAL_INDEX_BYTES: u64 = 256 * 1024;

/// Vertex buffer layout of overlay quads
fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Smallest power-of-two capacity holding `needed` bytes
fn grown_capacity(current: u64, needed: u64) -> u64 {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}

/// UI render pass for the parameter panel
pub struct UiRenderPass {
    initialized: bool,
    pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    vertex_capacity: u64,
    index_capacity: u64,
    index_count: u32,
}

impl UiRenderPass {
    pub fn new() -> Self {
        Self {
            initialized: false,
            pipeline: None,
            vertex_buffer: None,
            index_buffer: None,
            vertex_capacity: INITIAL_VERTEX_BYTES,
            index_capacity: INITIAL_INDEX_BYTES,
            index_count: 0,
        }
    }

    fn create_buffer(
        device: &wgpu::Device,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload this frame's overlay mesh, growing the buffers if needed
    pub fn prepare(&mut self, ctx: &RenderContext, mesh: &Mesh) {
        self.index_count = 0;
        if mesh.is_empty() {
            return;
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&mesh.vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);

        let vertex_capacity = grown_capacity(self.vertex_capacity, vertex_bytes.len() as u64);
        if vertex_capacity != self.vertex_capacity || self.vertex_buffer.is_none() {
            self.vertex_capacity = vertex_capacity;
            self.vertex_buffer = Some(Self::create_buffer(
                ctx.device,
                "UI Vertex Buffer",
                vertex_capacity,
                wgpu::BufferUsages::VERTEX,
            ));
        }
        let index_capacity = grown_capacity(self.index_capacity, index_bytes.len() as u64);
        if index_capacity != self.index_capacity || self.index_buffer.is_none() {
            self.index_capacity = index_capacity;
            self.index_buffer = Some(Self::create_buffer(
                ctx.device,
                "UI Index Buffer",
                index_capacity,
                wgpu::BufferUsages::INDEX,
            ));
        }

        if let (Some(vertex_buffer), Some(index_buffer)) = (&self.vertex_buffer, &self.index_buffer) {
            ctx.queue.write_buffer(vertex_buffer, 0, vertex_bytes);
            ctx.queue.write_buffer(index_buffer, 0, index_bytes);
            self.index_count = mesh.indices.len() as u32;
        }
    }
}

impl Default for UiRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for UiRenderPass {
    fn name(&self) -> &'static str {
        "UI"
    }

    fn priority(&self) -> RenderPassPriority {
        RenderPassPriority::UI
    }

    fn initialize(&mut self, ctx: &RenderContext) {
        if self.initialized {
            return;
        }

        let shader = create_shader_module(ctx.device, "Overlay Shader", embedded::OVERLAY);

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("UI Pipeline Layout"),
                bind_group_layouts: &[],
                push_constant_ranges: &[],
            });

        // No depth testing, alpha blending
        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("UI Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        self.pipeline = Some(pipeline);
        self.initialized = true;
    }

    fn render(&self, _ctx: &RenderContext, frame: &mut FrameContext) {
        if self.index_count == 0 {
            return;
        }
        let (Some(pipeline), Some(vertex_buffer), Some(index_buffer)) =
            (&self.pipeline, &self.vertex_buffer, &self.index_buffer)
        else {
            return;
        };

        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load, // Preserve the scene
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(pipeline);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(1024, 100), 1024);
        assert_eq!(grown_capacity(1024, 1024), 1024);
        assert_eq!(grown_capacity(1024, 1500), 2048);
    }

    #[test]
    fn test_vertex_layout_matches_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 28);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x4);
    }
}
