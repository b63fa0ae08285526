//! Mountain Generator
//!
//! Builds the mountain mesh from [`Parameters`] and swaps it into the scene.
//! Every call releases the previous mesh (geometry, material, node and its
//! three panel bindings) before creating the replacement, so at most one
//! mountain is ever attached.

use std::f32::consts::FRAC_PI_2;

use rand::Rng;

use super::{Geometry, Parameters, StandardMaterial};
use crate::game::scene::{Handle, MeshNode, NodeId, Scene};
use crate::game::ui::{BindingId, BindingTarget, FolderId, MaterialField, Panel};

/// Tilt applied to the plane about X before heights are rolled
pub const TILT_ANGLE: f32 = -FRAC_PI_2 + 0.5;

/// Replace the Y of every vertex with a uniform draw from
/// `[0, max_height)`. A non-positive height flattens the mesh to Y = 0.
pub fn displace_heights<R: Rng + ?Sized>(geometry: &mut Geometry, max_height: f32, rng: &mut R) {
    for position in geometry.positions.iter_mut() {
        position.y = if max_height > 0.0 {
            rng.random_range(0.0..max_height)
        } else {
            0.0
        };
    }
}

/// Panel folders the generator adds its bindings to
#[derive(Clone, Copy, Debug)]
pub struct MountainFolders {
    /// Displacement scale and tint color
    pub settings: FolderId,
    /// Wireframe toggle
    pub background: FolderId,
}

/// Panel bindings owned by the current mountain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountainBindings {
    pub displacement: BindingId,
    pub color: BindingId,
    pub wireframe: BindingId,
}

impl MountainBindings {
    pub fn all(&self) -> [BindingId; 3] {
        [self.displacement, self.color, self.wireframe]
    }
}

/// Everything the current mountain holds in the scene and panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountainHandles {
    pub node: NodeId,
    pub geometry: Handle<Geometry>,
    pub material: Handle<StandardMaterial>,
    pub bindings: MountainBindings,
}

/// Owner of the live mountain between regenerations
pub struct TerrainState {
    folders: MountainFolders,
    current: Option<MountainHandles>,
    generation: u64,
}

impl TerrainState {
    pub fn new(folders: MountainFolders) -> Self {
        Self {
            folders,
            current: None,
            generation: 0,
        }
    }

    /// Node of the live mountain, if one has been generated
    pub fn node(&self) -> Option<NodeId> {
        self.current.map(|h| h.node)
    }

    pub fn handles(&self) -> Option<&MountainHandles> {
        self.current.as_ref()
    }

    /// Number of completed regenerations
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dispose the current mountain and build a new one from `params`.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        params: &Parameters,
        scene: &mut Scene,
        panel: &mut Panel,
        rng: &mut R,
    ) {
        let params = params.sanitized();
        self.release(scene, panel);

        let mut geometry = Geometry::plane(
            params.plane_width,
            params.plane_height,
            params.segments_width,
            params.segments_height,
        );
        let material = StandardMaterial::rock();
        let bindings = self.bind_material(panel, &material);

        geometry.rotate_x(TILT_ANGLE);
        displace_heights(&mut geometry, params.mountain_height, rng);

        let vertex_count = geometry.vertex_count();
        let geometry = scene.geometries.insert(geometry);
        let material = scene.materials.insert(material);

        let mut node = MeshNode::new(geometry, material);
        node.cast_shadow = true;
        let node = scene.add(node);

        self.current = Some(MountainHandles {
            node,
            geometry,
            material,
            bindings,
        });
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            vertex_count,
            segments_width = params.segments_width,
            segments_height = params.segments_height,
            mountain_height = params.mountain_height,
            "mountain regenerated"
        );
    }

    fn release(&mut self, scene: &mut Scene, panel: &mut Panel) {
        let Some(old) = self.current.take() else {
            return;
        };
        scene.geometries.dispose(old.geometry);
        scene.materials.dispose(old.material);
        for binding in old.bindings.all() {
            panel.destroy(binding);
        }
        scene.remove(old.node);
        tracing::trace!(node = ?old.node, "previous mountain released");
    }

    fn bind_material(&self, panel: &mut Panel, material: &StandardMaterial) -> MountainBindings {
        let displacement = panel
            .add_slider(
                self.folders.settings,
                BindingTarget::Material(MaterialField::DisplacementScale),
                material.displacement_scale,
                0.0,
                1.0,
                0.05,
            )
            .name("Displacement height")
            .id();
        let color = panel
            .add_color(
                self.folders.settings,
                BindingTarget::Material(MaterialField::Color),
                material.color,
            )
            .id();
        let wireframe = panel
            .add_toggle(
                self.folders.background,
                BindingTarget::Material(MaterialField::Wireframe),
                material.wireframe,
            )
            .id();

        MountainBindings {
            displacement,
            color,
            wireframe,
        }
    }
}
