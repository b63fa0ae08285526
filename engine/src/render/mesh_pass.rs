//! Mesh Render Pass
//!
//! Draws every mesh node of the scene with the standard material shader.
//! GPU buffers are created lazily per geometry handle and per node, and
//! dropped as soon as the asset they mirror is no longer live in the scene,
//! so disposing a geometry or material also releases its GPU memory.

use std::collections::HashMap;

use glam::{Mat3, Mat4, Vec3};
use static_assertions::const_assert_eq;
use wgpu::util::DeviceExt;

use super::gpu_context::DEPTH_FORMAT;
use super::render_pass::{FrameContext, RenderContext, RenderPass, RenderPassPriority};
use super::shader_loader::{create_shader_module, embedded};
use super::texture::TextureSet;
use crate::game::mountain::{Geometry, Side, StandardMaterial, TextureRole};
use crate::game::scene::{Handle, MeshNode, NodeId, Scene};

/// Vertex for mesh rendering (position, normal, uv)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<MeshVertex>(), 32);

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a geometry's attributes for upload
pub fn mesh_vertices(geometry: &Geometry) -> Vec<MeshVertex> {
    geometry
        .positions
        .iter()
        .zip(&geometry.normals)
        .zip(&geometry.uvs)
        .map(|((p, n), uv)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
        })
        .collect()
}

/// Per-frame camera and light data
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<SceneUniforms>(), 128);

impl SceneUniforms {
    pub fn new(view_proj: [[f32; 4]; 4], camera_pos: Vec3, scene: &Scene) -> Self {
        let ambient = scene.ambient_light.color.to_linear() * scene.ambient_light.intensity;
        let light = &scene.point_light;
        let light_color = light.color.to_linear() * light.intensity;
        Self {
            view_proj,
            camera_pos: camera_pos.extend(1.0).to_array(),
            ambient: ambient.extend(1.0).to_array(),
            light_position: light.position.extend(light.distance).to_array(),
            light_color: light_color.extend(light.decay).to_array(),
        }
    }
}

/// Per-node transform and material data
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub tint: [f32; 4],
    /// displacement scale, roughness, alpha test, unused
    pub params: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<NodeUniforms>(), 160);

impl NodeUniforms {
    pub fn new(node: &MeshNode, material: &StandardMaterial) -> Self {
        let model = node.model_matrix();
        let normal_matrix = Mat4::from_mat3(Mat3::from_mat4(model).inverse().transpose());
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            tint: material.color.to_linear().extend(1.0).to_array(),
            params: [
                material.displacement_scale,
                material.roughness,
                material.alpha_test,
                0.0,
            ],
        }
    }
}

/// Pipeline a material draws with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Fill(Side),
    Wireframe,
}

impl PipelineKind {
    pub fn for_material(material: &StandardMaterial) -> Self {
        if material.wireframe {
            PipelineKind::Wireframe
        } else {
            PipelineKind::Fill(material.side)
        }
    }

    fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            PipelineKind::Fill(Side::Front) => Some(wgpu::Face::Back),
            PipelineKind::Fill(Side::Back) => Some(wgpu::Face::Front),
            PipelineKind::Fill(Side::Double) | PipelineKind::Wireframe => None,
        }
    }

    fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PipelineKind::Wireframe => wgpu::PrimitiveTopology::LineList,
            PipelineKind::Fill(_) => wgpu::PrimitiveTopology::TriangleList,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PipelineKind::Fill(Side::Front) => "Mesh Pipeline (front)",
            PipelineKind::Fill(Side::Back) => "Mesh Pipeline (back)",
            PipelineKind::Fill(Side::Double) => "Mesh Pipeline (double)",
            PipelineKind::Wireframe => "Mesh Pipeline (wireframe)",
        }
    }
}

const PIPELINE_KINDS: [PipelineKind; 4] = [
    PipelineKind::Fill(Side::Front),
    PipelineKind::Fill(Side::Back),
    PipelineKind::Fill(Side::Double),
    PipelineKind::Wireframe,
];

/// Vertex and index buffers of one geometry
struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    line_buffer: wgpu::Buffer,
    line_count: u32,
}

impl GpuGeometry {
    fn new(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = mesh_vertices(geometry);
        let lines = geometry.line_indices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let line_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Line Index Buffer"),
            contents: bytemuck::cast_slice(&lines),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            line_buffer,
            line_count: lines.len() as u32,
        }
    }
}

/// Uniform buffer and bind group of one node
struct GpuNode {
    geometry: Handle<Geometry>,
    material: Handle<StandardMaterial>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// A node ready to draw this frame
#[derive(Clone, Copy, Debug)]
struct DrawItem {
    node: NodeId,
    kind: PipelineKind,
}

/// Mesh render pass that draws the scene's mesh nodes
pub struct MeshRenderPass {
    textures: TextureSet,
    initialized: bool,
    scene_buffer: Option<wgpu::Buffer>,
    scene_bind_group: Option<wgpu::BindGroup>,
    node_layout: Option<wgpu::BindGroupLayout>,
    pipelines: HashMap<PipelineKind, wgpu::RenderPipeline>,
    geometries: HashMap<Handle<Geometry>, GpuGeometry>,
    nodes: HashMap<NodeId, GpuNode>,
    draws: Vec<DrawItem>,
}

impl MeshRenderPass {
    pub fn new(textures: TextureSet) -> Self {
        Self {
            textures,
            initialized: false,
            scene_buffer: None,
            scene_bind_group: None,
            node_layout: None,
            pipelines: HashMap::new(),
            geometries: HashMap::new(),
            nodes: HashMap::new(),
            draws: Vec::new(),
        }
    }

    /// Drop GPU copies of disposed assets, upload new ones and refresh
    /// uniforms. Call once per frame before rendering.
    pub fn prepare(&mut self, ctx: &RenderContext, scene: &Scene, uniforms: &SceneUniforms) {
        self.prune(scene);

        let Some(scene_buffer) = &self.scene_buffer else {
            return;
        };
        ctx.queue.write_buffer(scene_buffer, 0, bytemuck::bytes_of(uniforms));

        self.draws.clear();
        for (id, node) in scene.nodes() {
            let (Some(geometry), Some(material)) =
                (scene.geometries.get(node.geometry), scene.materials.get(node.material))
            else {
                continue;
            };

            if !self.geometries.contains_key(&node.geometry) {
                tracing::debug!(handle = ?node.geometry, vertices = geometry.vertex_count(), "uploading geometry");
                self.geometries
                    .insert(node.geometry, GpuGeometry::new(ctx.device, geometry));
            }

            if !self.nodes.contains_key(&id) {
                let Some(gpu_node) = self.create_node(ctx.device, node, material) else {
                    continue;
                };
                self.nodes.insert(id, gpu_node);
            }

            if let Some(gpu_node) = self.nodes.get(&id) {
                let data = NodeUniforms::new(node, material);
                ctx.queue
                    .write_buffer(&gpu_node.uniform_buffer, 0, bytemuck::bytes_of(&data));
            }

            self.draws.push(DrawItem {
                node: id,
                kind: PipelineKind::for_material(material),
            });
        }
    }

    fn prune(&mut self, scene: &Scene) {
        let before = (self.geometries.len(), self.nodes.len());
        self.geometries
            .retain(|handle, _| scene.geometries.contains(*handle));
        self.nodes
            .retain(|id, gpu| node_is_live(scene, *id, gpu.geometry, gpu.material));
        let after = (self.geometries.len(), self.nodes.len());
        if before != after {
            tracing::debug!(
                geometries = before.0 - after.0,
                nodes = before.1 - after.1,
                "released GPU resources of disposed assets"
            );
        }
    }

    fn create_node(
        &self,
        device: &wgpu::Device,
        node: &MeshNode,
        material: &StandardMaterial,
    ) -> Option<GpuNode> {
        let layout = self.node_layout.as_ref()?;
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Node Uniform Buffer"),
            size: std::mem::size_of::<NodeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let slots = material.maps.in_role_order();
        let views: [&wgpu::TextureView; 5] = std::array::from_fn(|i| match slots[i] {
            Some(role) => self.textures.view(role),
            None => self.textures.fallback_view(TextureRole::ALL[i]),
        });

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }];
        entries.extend(views.iter().enumerate().map(|(i, view)| wgpu::BindGroupEntry {
            binding: 1 + i as u32,
            resource: wgpu::BindingResource::TextureView(view),
        }));
        entries.push(wgpu::BindGroupEntry {
            binding: 6,
            resource: wgpu::BindingResource::Sampler(&self.textures.color_sampler),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: 7,
            resource: wgpu::BindingResource::Sampler(&self.textures.linear_sampler),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Node Bind Group"),
            layout,
            entries: &entries,
        });

        Some(GpuNode {
            geometry: node.geometry,
            material: node.material,
            uniform_buffer,
            bind_group,
        })
    }

    fn create_pipeline(
        ctx: &RenderContext,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        kind: PipelineKind,
    ) -> wgpu::RenderPipeline {
        ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(kind.label()),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: kind.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: kind.cull_mode(),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Whether GPU state built for a node may still be drawn: the node is
/// attached and neither of its assets has been disposed.
fn node_is_live(
    scene: &Scene,
    id: NodeId,
    geometry: Handle<Geometry>,
    material: Handle<StandardMaterial>,
) -> bool {
    scene.node(id).is_some() && scene.geometries.contains(geometry) && scene.materials.contains(material)
}

fn texture_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl RenderPass for MeshRenderPass {
    fn name(&self) -> &'static str {
        "Mesh"
    }

    fn priority(&self) -> RenderPassPriority {
        RenderPassPriority::Geometry
    }

    fn initialize(&mut self, ctx: &RenderContext) {
        if self.initialized {
            return;
        }

        let shader = create_shader_module(ctx.device, "Mountain Shader", embedded::MOUNTAIN);
        let both = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let fragment = wgpu::ShaderStages::FRAGMENT;

        let scene_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[uniform_entry(0, both)],
            });

        // Height map and its sampler are read by the vertex stage
        let node_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Node Bind Group Layout"),
                entries: &[
                    uniform_entry(0, both),
                    texture_entry(1, fragment),
                    texture_entry(2, both),
                    texture_entry(3, fragment),
                    texture_entry(4, fragment),
                    texture_entry(5, fragment),
                    sampler_entry(6, fragment),
                    sampler_entry(7, both),
                ],
            });

        let scene_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh Pipeline Layout"),
                bind_group_layouts: &[&scene_layout, &node_layout],
                push_constant_ranges: &[],
            });

        for kind in PIPELINE_KINDS {
            let pipeline = Self::create_pipeline(ctx, &shader, &pipeline_layout, kind);
            self.pipelines.insert(kind, pipeline);
        }

        self.scene_buffer = Some(scene_buffer);
        self.scene_bind_group = Some(scene_bind_group);
        self.node_layout = Some(node_layout);
        self.initialized = true;
    }

    fn render(&self, _ctx: &RenderContext, frame: &mut FrameContext) {
        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(frame.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: frame.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(scene_bind_group) = &self.scene_bind_group else {
            return;
        };
        render_pass.set_bind_group(0, scene_bind_group, &[]);

        for draw in &self.draws {
            let Some(gpu_node) = self.nodes.get(&draw.node) else {
                continue;
            };
            let (Some(geometry), Some(pipeline)) = (
                self.geometries.get(&gpu_node.geometry),
                self.pipelines.get(&draw.kind),
            ) else {
                continue;
            };

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, &gpu_node.bind_group, &[]);
            render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            match draw.kind {
                PipelineKind::Wireframe => {
                    render_pass
                        .set_index_buffer(geometry.line_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..geometry.line_count, 0, 0..1);
                }
                PipelineKind::Fill(_) => {
                    render_pass
                        .set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
                }
            }
        }
    }
}
