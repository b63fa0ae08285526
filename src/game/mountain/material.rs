//! Standard Material
//!
//! PBR-style surface description for the mountain: tint, texture slots and
//! the scalar properties the panel can edit live. This is CPU-side data; the
//! mesh render pass turns it into uniforms and a bind group.

use crate::game::types::Color;

/// Base tint of the rock material
pub const ROCK_TINT: u32 = 0xababab;

/// Which faces of a mesh are rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// The five image maps a standard material can sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureRole {
    /// Diffuse color (sRGB)
    Color,
    /// Height map driving GPU displacement
    Height,
    /// Tangent-space normal map
    Normal,
    /// Ambient occlusion
    AmbientOcclusion,
    /// Roughness
    Roughness,
}

impl TextureRole {
    pub const ALL: [TextureRole; 5] = [
        TextureRole::Color,
        TextureRole::Height,
        TextureRole::Normal,
        TextureRole::AmbientOcclusion,
        TextureRole::Roughness,
    ];

    pub fn index(self) -> usize {
        match self {
            TextureRole::Color => 0,
            TextureRole::Height => 1,
            TextureRole::Normal => 2,
            TextureRole::AmbientOcclusion => 3,
            TextureRole::Roughness => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextureRole::Color => "color",
            TextureRole::Height => "height",
            TextureRole::Normal => "normal",
            TextureRole::AmbientOcclusion => "ambient occlusion",
            TextureRole::Roughness => "roughness",
        }
    }
}

/// Texture bindings of a material. An empty slot samples the neutral
/// fallback for that role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureSlots {
    pub map: Option<TextureRole>,
    pub ao_map: Option<TextureRole>,
    pub displacement_map: Option<TextureRole>,
    pub normal_map: Option<TextureRole>,
    pub roughness_map: Option<TextureRole>,
}

impl TextureSlots {
    /// Every slot bound to its matching rock texture.
    pub fn all() -> Self {
        Self {
            map: Some(TextureRole::Color),
            ao_map: Some(TextureRole::AmbientOcclusion),
            displacement_map: Some(TextureRole::Height),
            normal_map: Some(TextureRole::Normal),
            roughness_map: Some(TextureRole::Roughness),
        }
    }

    /// Slot contents in `TextureRole::ALL` order.
    pub fn in_role_order(&self) -> [Option<TextureRole>; 5] {
        [
            self.map,
            self.displacement_map,
            self.normal_map,
            self.ao_map,
            self.roughness_map,
        ]
    }

    pub fn bound_count(&self) -> usize {
        self.in_role_order().iter().filter(|s| s.is_some()).count()
    }
}

/// Standard (metal/rough) material
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub side: Side,
    /// Fragments with alpha below this are discarded
    pub alpha_test: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub maps: TextureSlots,
    pub displacement_scale: f32,
    pub roughness: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            side: Side::Front,
            alpha_test: 0.0,
            transparent: false,
            wireframe: false,
            maps: TextureSlots::default(),
            displacement_scale: 1.0,
            roughness: 1.0,
        }
    }
}

impl StandardMaterial {
    /// The mountain's rock material: grey tint, double-sided, binary alpha
    /// cutoff, all five rock maps, displacement off until edited.
    pub fn rock() -> Self {
        Self {
            color: Color::from_hex(ROCK_TINT),
            side: Side::Double,
            alpha_test: 1.0,
            transparent: true,
            wireframe: false,
            maps: TextureSlots::all(),
            displacement_scale: 0.0,
            roughness: 10.0,
        }
    }
}
