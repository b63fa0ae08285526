//! Scene Graph
//!
//! Owns every geometry and material that can be drawn, the mesh nodes that
//! pair them, the lights, and the background color. The renderer reads the
//! scene each frame and keeps GPU copies only for assets still live here.

pub mod assets;

pub use assets::{Assets, Handle};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::game::mountain::{Geometry, StandardMaterial};
use crate::game::types::Color;

/// Handle of a mesh node attached to the scene
pub type NodeId = Handle<MeshNode>;

/// A drawable pairing of geometry and material
#[derive(Clone, Debug)]
pub struct MeshNode {
    pub geometry: Handle<Geometry>,
    pub material: Handle<StandardMaterial>,
    pub position: Vec3,
    /// Euler rotation (XYZ order), radians
    pub rotation: Vec3,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshNode {
    pub fn new(geometry: Handle<Geometry>, material: Handle<StandardMaterial>) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Uniform light applied to every surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.4,
        }
    }
}

/// Shadow map settings of a light
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowConfig {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 1024,
            near: 0.1,
            far: 10.0,
        }
    }
}

/// Omnidirectional light with range cutoff and distance decay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Range after which the light contributes nothing (0 = infinite)
    pub distance: f32,
    pub decay: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowConfig,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.8,
            distance: 15.0,
            decay: 1.0,
            position: Vec3::new(0.0, 1.0, 0.0),
            cast_shadow: true,
            shadow: ShadowConfig::default(),
        }
    }
}

impl PointLight {
    /// Falloff factor at distance `d`: inverse power decay, smoothly cut off
    /// at `distance`.
    pub fn attenuation(&self, d: f32) -> f32 {
        let falloff = 1.0 / d.powf(self.decay).max(0.01);
        if self.distance > 0.0 {
            let ratio = d / self.distance;
            let window = (1.0 - ratio.powi(4)).clamp(0.0, 1.0);
            falloff * window * window
        } else {
            falloff
        }
    }
}

/// The scene graph
pub struct Scene {
    pub geometries: Assets<Geometry>,
    pub materials: Assets<StandardMaterial>,
    nodes: Assets<MeshNode>,
    pub ambient_light: AmbientLight,
    pub point_light: PointLight,
    pub background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            geometries: Assets::new(),
            materials: Assets::new(),
            nodes: Assets::new(),
            ambient_light: AmbientLight::default(),
            point_light: PointLight::default(),
            background: Color::BLACK,
        }
    }

    /// Attach a mesh node
    pub fn add(&mut self, node: MeshNode) -> NodeId {
        self.nodes.insert(node)
    }

    /// Detach a mesh node. Its geometry and material stay in their stores
    /// until disposed.
    pub fn remove(&mut self, id: NodeId) -> Option<MeshNode> {
        self.nodes.dispose(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&MeshNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MeshNode> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MeshNode)> {
        self.nodes.iter()
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_nodes() {
        let mut scene = Scene::new();
        let g = scene.geometries.insert(Geometry::plane(1.0, 1.0, 1, 1));
        let m = scene.materials.insert(StandardMaterial::default());

        let id = scene.add(MeshNode::new(g, m));
        assert_eq!(scene.mesh_count(), 1);
        assert!(scene.remove(id).is_some());
        assert_eq!(scene.mesh_count(), 0);
        assert!(scene.remove(id).is_none());
        // Removing the node leaves the assets alone
        assert_eq!(scene.geometries.len(), 1);
        assert_eq!(scene.materials.len(), 1);
    }

    #[test]
    fn test_model_matrix_rotation_y() {
        let mut scene = Scene::new();
        let g = scene.geometries.insert(Geometry::plane(1.0, 1.0, 1, 1));
        let m = scene.materials.insert(StandardMaterial::default());
        let mut node = MeshNode::new(g, m);
        node.rotation.y = std::f32::consts::FRAC_PI_2;
        let p = node.model_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_point_light_defaults_and_attenuation() {
        let light = PointLight::default();
        assert_eq!(light.intensity, 0.8);
        assert_eq!(light.distance, 15.0);
        assert_eq!(light.decay, 1.0);
        assert_eq!(light.shadow.map_size, 1024);

        assert!((light.attenuation(1.0) - (1.0 - (1.0f32 / 15.0).powi(4)).powi(2)).abs() < 1e-6);
        assert_eq!(light.attenuation(15.0), 0.0);
        assert_eq!(light.attenuation(20.0), 0.0);
        assert!(light.attenuation(0.5) > light.attenuation(2.0));
    }
}
