//! Panel Tests - Mouse Interaction on the Viewer Layout
//!
//! Drives the full viewer panel with synthetic mouse input and checks the
//! events it emits and how the demo reacts to them.

use rand::SeedableRng;
use rand::rngs::StdRng;
use ridgeline_engine::game::MountainDemo;
use ridgeline_engine::game::mountain::Parameters;
use ridgeline_engine::game::ui::widgets::channel_rects;
use ridgeline_engine::game::ui::{
    BindingId, BindingTarget, BindingValue, LightField, MaterialField, PanelEvent, ParamField,
};

fn setup() -> (MountainDemo, StdRng) {
    let mut rng = StdRng::seed_from_u64(21);
    let demo = MountainDemo::new(Parameters::default(), (1280.0, 720.0), &mut rng);
    (demo, rng)
}

fn find(demo: &MountainDemo, target: BindingTarget) -> BindingId {
    [demo.folders.settings, demo.folders.lights, demo.folders.background]
        .into_iter()
        .flat_map(|folder| demo.panel.bindings_in(folder).collect::<Vec<_>>())
        .find(|(_, b)| b.target == target)
        .map(|(id, _)| id)
        .expect("binding present")
}

#[test]
fn test_folder_titles_and_names() {
    let (demo, _) = setup();
    assert_eq!(demo.panel.folder_title(demo.folders.settings), Some("Mountains Settings"));
    assert_eq!(demo.panel.folder_title(demo.folders.lights), Some("Lights"));
    assert_eq!(demo.panel.folder_title(demo.folders.background), Some("Background"));

    let names: Vec<&str> = demo
        .panel
        .bindings_in(demo.folders.settings)
        .map(|(_, b)| b.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "Plane Width",
            "Plane Height",
            "Segments Width",
            "Segments Height",
            "Random height",
            "Displacement height",
            "color",
        ]
    );
}

#[test]
fn test_panel_anchored_inside_viewport() {
    let (mut demo, _) = setup();
    let bounds = demo.panel.bounds();
    assert!(bounds.x > 640.0);
    assert!(bounds.x + bounds.w <= 1280.0);

    demo.panel.resize(800.0, 600.0);
    let bounds = demo.panel.bounds();
    assert!(bounds.x + bounds.w <= 800.0);
}

#[test]
fn test_drag_segments_slider_rebuilds_mountain() {
    let (mut demo, mut rng) = setup();
    let id = find(&demo, BindingTarget::Param(ParamField::SegmentsWidth));
    let rect = demo.panel.control_bounds(id).unwrap();

    // Press at the left edge: snaps to the minimum of 8
    let input = demo.panel.on_mouse_press(rect.x, rect.y + rect.h / 2.0);
    assert!(input.consumed);
    let event = input.event.expect("value changed");
    assert!(matches!(
        event,
        PanelEvent::Changed { value: BindingValue::Number(v), regenerate: true, .. } if v == 8.0
    ));
    assert!(demo.handle_event(event, &mut rng));
    assert_eq!(demo.params.segments_width, 8);
    assert_eq!(demo.params.vertex_count(), 9 * 21);

    // Dragging further left changes nothing
    assert_eq!(demo.panel.on_mouse_move(rect.x - 40.0, rect.y), None);
    assert!(demo.panel.on_mouse_release());
}

#[test]
fn test_static_bindings_survive_rebuild() {
    let (mut demo, mut rng) = setup();
    let id = find(&demo, BindingTarget::Param(ParamField::PlaneHeight));
    let event = demo.panel.set_value(id, BindingValue::Number(7.5)).unwrap();
    demo.handle_event(event, &mut rng);

    assert!(demo.panel.contains(id));
    assert_eq!(demo.panel.binding(id).unwrap().control.value(), BindingValue::Number(7.5));
    assert_eq!(demo.params.plane_height, 7.5);
}

#[test]
fn test_drag_color_channel() {
    let (mut demo, mut rng) = setup();
    let id = find(&demo, BindingTarget::Material(MaterialField::Color));
    let rect = demo.panel.control_bounds(id).unwrap();
    let red = channel_rects(rect)[0];

    let input = demo.panel.on_mouse_press(red.x, red.y + red.h / 2.0);
    assert!(input.consumed);
    let event = input.event.expect("red channel moved");
    assert!(!demo.handle_event(event, &mut rng));

    let color = demo.mountain_material().unwrap().color;
    assert_eq!(color.r, 0.0);
    assert!((color.g - 171.0 / 255.0).abs() < 1e-6);
}

#[test]
fn test_light_slider_precision() {
    let (mut demo, mut rng) = setup();
    let id = find(&demo, BindingTarget::Light(LightField::AmbientIntensity));
    let event = demo.panel.set_value(id, BindingValue::Number(0.12345)).unwrap();
    demo.handle_event(event, &mut rng);
    assert!((demo.scene.ambient_light.intensity - 0.123).abs() < 1e-6);

    let event = demo.panel.set_value(id, BindingValue::Number(5.0)).unwrap();
    demo.handle_event(event, &mut rng);
    assert_eq!(demo.scene.ambient_light.intensity, 1.2);
}

#[test]
fn test_hidden_panel_passes_input_through() {
    let (mut demo, _) = setup();
    let id = find(&demo, BindingTarget::Param(ParamField::Animate));
    let rect = demo.panel.control_bounds(id).unwrap();

    demo.panel.toggle_visible();
    assert!(!demo.panel.covers(rect.x + 1.0, rect.y + 1.0));
    let input = demo.panel.on_mouse_press(rect.x + 1.0, rect.y + 1.0);
    assert!(!input.consumed);
    assert!(demo.panel.generate_ui_mesh().is_empty());

    demo.panel.toggle_visible();
    assert!(!demo.panel.generate_ui_mesh().is_empty());
}

#[test]
fn test_animate_toggle_stops_spin() {
    let (mut demo, mut rng) = setup();
    let id = find(&demo, BindingTarget::Param(ParamField::Animate));
    let rect = demo.panel.control_bounds(id).unwrap();

    let input = demo.panel.on_mouse_press(rect.x + 1.0, rect.y + 1.0);
    let event = input.event.expect("toggle flipped");
    demo.handle_event(event, &mut rng);
    assert!(!demo.params.animate);

    demo.animate(30.0);
    assert_eq!(demo.mountain().unwrap().rotation.y, 0.0);
}
