//! Shader Tests - WGSL Validation
//!
//! Parses and validates the embedded shaders with naga so a broken shader
//! fails in CI instead of at pipeline creation.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use ridgeline_engine::render::shader_loader::embedded;

fn validate(name: &str, source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{name} failed to parse:\n{}", e.emit_to_string(source)));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{name} failed validation: {e:?}"));
    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|ep| ep.name.as_str()).collect()
}

#[test]
fn test_mountain_shader_validates() {
    let module = validate("mountain.wgsl", embedded::MOUNTAIN);
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_main"));
    assert!(entries.contains(&"fs_main"));
}

#[test]
fn test_overlay_shader_validates() {
    let module = validate("overlay.wgsl", embedded::OVERLAY);
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_main"));
    assert!(entries.contains(&"fs_main"));
}

#[test]
fn test_mountain_shader_binds_every_map() {
    let module = validate("mountain.wgsl", embedded::MOUNTAIN);
    let node_group: Vec<u32> = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| var.binding.as_ref())
        .filter(|binding| binding.group == 1)
        .map(|binding| binding.binding)
        .collect();
    // Node uniform, five maps, two samplers
    for slot in 0..8 {
        assert!(node_group.contains(&slot), "missing @group(1) @binding({slot})");
    }
}

#[test]
fn test_overlay_inputs_are_position_and_color() {
    let module = validate("overlay.wgsl", embedded::OVERLAY);
    let vs = module
        .entry_points
        .iter()
        .find(|ep| ep.name == "vs_main")
        .expect("vs_main present");
    let input = vs.function.arguments[0].ty;
    let naga::TypeInner::Struct { members, .. } = &module.types[input].inner else {
        panic!("vs_main takes a struct");
    };
    let locations: Vec<u32> = members
        .iter()
        .filter_map(|m| match m.binding {
            Some(naga::Binding::Location { location, .. }) => Some(location),
            _ => None,
        })
        .collect();
    assert_eq!(locations, [0, 1]);
}
