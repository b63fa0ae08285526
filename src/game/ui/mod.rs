//! UI Module
//!
//! The parameter panel and the quad-based drawing helpers behind it.

pub mod panel;
pub mod text;
pub mod widgets;

pub use panel::{
    Binding, BindingId, BindingTarget, BindingValue, Control, FolderId, LightField,
    MaterialField, Panel, PanelEvent, PanelInput, ParamField,
};
pub use text::{Screen, draw_text, push_rect};
pub use widgets::Rect;
