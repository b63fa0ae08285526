//! Mountain Demo
//!
//! Window-independent state of the viewer: the parameters, the scene, the
//! panel with its static bindings, and the live mountain. Panel events are
//! applied here, so the whole edit-regenerate loop runs without a GPU.

use rand::Rng;

use crate::game::mountain::{MountainFolders, Parameters, StandardMaterial, TerrainState};
use crate::game::scene::{MeshNode, Scene};
use crate::game::types::Color;
use crate::game::ui::{
    BindingTarget, BindingValue, FolderId, LightField, MaterialField, Panel, PanelEvent,
    ParamField,
};

/// Radians per second the mountain spins while animating
pub const SPIN_SPEED: f32 = 0.1;

/// The three panel folders
#[derive(Clone, Copy, Debug)]
pub struct DemoFolders {
    pub settings: FolderId,
    pub lights: FolderId,
    pub background: FolderId,
}

pub struct MountainDemo {
    pub params: Parameters,
    pub scene: Scene,
    pub panel: Panel,
    pub terrain: TerrainState,
    pub folders: DemoFolders,
}

impl MountainDemo {
    /// Build the scene and panel and generate the first mountain
    pub fn new<R: Rng + ?Sized>(params: Parameters, viewport: (f32, f32), rng: &mut R) -> Self {
        let mut scene = Scene::new();
        scene.background = Color::from_hex(params.bg_color);

        let mut panel = Panel::new(viewport.0, viewport.1);
        let folders = DemoFolders {
            settings: panel.add_folder("Mountains Settings"),
            lights: panel.add_folder("Lights"),
            background: panel.add_folder("Background"),
        };
        add_static_bindings(&mut panel, folders, &params, &scene);

        let mut terrain = TerrainState::new(MountainFolders {
            settings: folders.settings,
            background: folders.background,
        });
        terrain.regenerate(&params, &mut scene, &mut panel, rng);

        Self {
            params,
            scene,
            panel,
            terrain,
            folders,
        }
    }

    /// The live mountain node
    pub fn mountain(&self) -> Option<&MeshNode> {
        self.terrain.node().and_then(|id| self.scene.node(id))
    }

    /// The live mountain material
    pub fn mountain_material(&self) -> Option<&StandardMaterial> {
        let handles = self.terrain.handles()?;
        self.scene.materials.get(handles.material)
    }

    /// Apply a panel change. Returns whether the mountain was rebuilt.
    pub fn handle_event<R: Rng + ?Sized>(&mut self, event: PanelEvent, rng: &mut R) -> bool {
        let PanelEvent::Changed {
            target,
            value,
            regenerate,
            ..
        } = event;

        match target {
            BindingTarget::Param(field) => apply_param(&mut self.params, field, value),
            BindingTarget::Material(field) => {
                let material = self
                    .terrain
                    .handles()
                    .and_then(|h| self.scene.materials.get_mut(h.material));
                if let Some(material) = material {
                    apply_material(material, field, value);
                }
            }
            BindingTarget::Light(field) => apply_light(&mut self.scene, field, value),
        }

        if regenerate {
            self.terrain
                .regenerate(&self.params, &mut self.scene, &mut self.panel, rng);
        }
        regenerate
    }

    /// Per-frame animation: spin the mountain about Y while enabled
    pub fn animate(&mut self, elapsed: f32) {
        if !self.params.animate {
            return;
        }
        if let Some(node) = self.terrain.node().and_then(|id| self.scene.node_mut(id)) {
            node.rotation.y = -elapsed * SPIN_SPEED;
        }
    }

    /// Clear color in linear space
    pub fn clear_color(&self) -> [f64; 3] {
        let c = self.scene.background.to_linear();
        [c.x as f64, c.y as f64, c.z as f64]
    }
}

fn add_static_bindings(panel: &mut Panel, folders: DemoFolders, params: &Parameters, scene: &Scene) {
    let sliders = [
        (ParamField::PlaneWidth, "Plane Width", params.plane_width, 1.0, 10.0, 0.5),
        (ParamField::PlaneHeight, "Plane Height", params.plane_height, 1.0, 10.0, 0.5),
        (ParamField::SegmentsWidth, "Segments Width", params.segments_width as f32, 8.0, 64.0, 2.0),
        (ParamField::SegmentsHeight, "Segments Height", params.segments_height as f32, 8.0, 64.0, 2.0),
        (ParamField::MountainHeight, "Random height", params.mountain_height, 0.0, 0.7, 0.01),
    ];
    for (field, name, value, min, max, step) in sliders {
        panel
            .add_slider(folders.settings, BindingTarget::Param(field), value, min, max, step)
            .name(name)
            .regenerate_on_change();
    }

    panel
        .add_toggle(folders.background, BindingTarget::Param(ParamField::Animate), params.animate)
        .name("Animate");

    let ambient = scene.ambient_light;
    let point = scene.point_light;
    let lights = [
        (LightField::AmbientIntensity, "Ambient intensity", ambient.intensity, LightField::AmbientColor, "Ambient color", ambient.color),
        (LightField::PointIntensity, "Point Light intensity", point.intensity, LightField::PointColor, "Point Light color", point.color),
    ];
    for (intensity_field, intensity_name, intensity, color_field, color_name, color) in lights {
        panel
            .add_slider(folders.lights, BindingTarget::Light(intensity_field), intensity, 0.0, 1.2, 0.001)
            .name(intensity_name);
        panel
            .add_color(folders.lights, BindingTarget::Light(color_field), color)
            .name(color_name);
    }
}

/// Write a panel value into the generation parameters
pub fn apply_param(params: &mut Parameters, field: ParamField, value: BindingValue) {
    match (field, value) {
        (ParamField::PlaneWidth, BindingValue::Number(v)) => params.plane_width = v,
        (ParamField::PlaneHeight, BindingValue::Number(v)) => params.plane_height = v,
        (ParamField::SegmentsWidth, BindingValue::Number(v)) => params.segments_width = segments(v),
        (ParamField::SegmentsHeight, BindingValue::Number(v)) => params.segments_height = segments(v),
        (ParamField::MountainHeight, BindingValue::Number(v)) => params.mountain_height = v,
        (ParamField::Animate, BindingValue::Bool(v)) => params.animate = v,
        _ => tracing::warn!(?field, ?value, "ignoring mismatched parameter value"),
    }
}

fn segments(value: f32) -> u32 {
    value.round().max(1.0) as u32
}

/// Write a panel value into a material
pub fn apply_material(material: &mut StandardMaterial, field: MaterialField, value: BindingValue) {
    match (field, value) {
        (MaterialField::Color, BindingValue::Color(c)) => material.color = c,
        (MaterialField::Wireframe, BindingValue::Bool(v)) => material.wireframe = v,
        (MaterialField::DisplacementScale, BindingValue::Number(v)) => material.displacement_scale = v,
        _ => tracing::warn!(?field, ?value, "ignoring mismatched material value"),
    }
}

/// Write a panel value into the scene lights
pub fn apply_light(scene: &mut Scene, field: LightField, value: BindingValue) {
    match (field, value) {
        (LightField::AmbientIntensity, BindingValue::Number(v)) => scene.ambient_light.intensity = v,
        (LightField::AmbientColor, BindingValue::Color(c)) => scene.ambient_light.color = c,
        (LightField::PointIntensity, BindingValue::Number(v)) => scene.point_light.intensity = v,
        (LightField::PointColor, BindingValue::Color(c)) => scene.point_light.color = c,
        _ => tracing::warn!(?field, ?value, "ignoring mismatched light value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn demo() -> (MountainDemo, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let demo = MountainDemo::new(Parameters::default(), (1280.0, 720.0), &mut rng);
        (demo, rng)
    }

    #[test]
    fn test_startup_layout() {
        let (demo, _) = demo();
        // 5 sliders + animate + 4 light controls + 3 mountain controls
        assert_eq!(demo.panel.len(), 13);
        assert_eq!(demo.panel.bindings_in(demo.folders.settings).count(), 7);
        assert_eq!(demo.panel.bindings_in(demo.folders.lights).count(), 4);
        assert_eq!(demo.panel.bindings_in(demo.folders.background).count(), 2);
        assert_eq!(demo.scene.mesh_count(), 1);
    }

    #[test]
    fn test_segments_rounded_and_clamped() {
        let mut p = Parameters::default();
        apply_param(&mut p, ParamField::SegmentsWidth, BindingValue::Number(7.6));
        assert_eq!(p.segments_width, 8);
        apply_param(&mut p, ParamField::SegmentsHeight, BindingValue::Number(-3.0));
        assert_eq!(p.segments_height, 1);
    }

    #[test]
    fn test_mismatched_value_is_ignored() {
        let mut p = Parameters::default();
        apply_param(&mut p, ParamField::PlaneWidth, BindingValue::Bool(true));
        assert_eq!(p, Parameters::default());
    }

    #[test]
    fn test_animate_spins_only_when_enabled() {
        let (mut demo, _) = demo();
        demo.animate(10.0);
        assert!((demo.mountain().unwrap().rotation.y + 1.0).abs() < 1e-6);

        demo.params.animate = false;
        demo.animate(20.0);
        assert!((demo.mountain().unwrap().rotation.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_light_event_updates_scene() {
        let (mut demo, mut rng) = demo();
        let id = demo
            .panel
            .bindings_in(demo.folders.lights)
            .find(|(_, b)| b.target == BindingTarget::Light(LightField::PointIntensity))
            .map(|(id, _)| id)
            .unwrap();
        let event = demo.panel.set_value(id, BindingValue::Number(1.1)).unwrap();
        assert!(!demo.handle_event(event, &mut rng));
        assert!((demo.scene.point_light.intensity - 1.1).abs() < 1e-6);
    }
}
