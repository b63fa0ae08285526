//! Parameter Panel
//!
//! A small immediate-style control panel drawn with the pixel font. Controls
//! are grouped into folders and bound to a field by [`BindingTarget`]; the
//! panel never touches the bound data itself. Changing a control yields a
//! [`PanelEvent`] that the application applies, regenerating the mountain
//! when the binding asks for it.

use super::text::{GLYPH_HEIGHT, Screen, draw_text, push_rect, text_width};
use super::widgets::{self, Rect};
use crate::game::scene::{Assets, Handle};
use crate::game::types::{Color, Mesh};

// Layout (pixels)
const PANEL_WIDTH: f32 = 250.0;
const MARGIN: f32 = 12.0;
const PADDING: f32 = 10.0;
const FOLDER_HEIGHT: f32 = 26.0;
const ROW_HEIGHT: f32 = 36.0;
const CONTROL_OFFSET: f32 = 16.0;
const CONTROL_HEIGHT: f32 = 12.0;
const TITLE_SCALE: f32 = 2.0;
const LABEL_SCALE: f32 = 1.5;

const BACKGROUND: [f32; 4] = [0.08, 0.08, 0.1, 0.85];
const FOLDER_BAR: [f32; 4] = [0.16, 0.16, 0.2, 1.0];
const TITLE_COLOR: [f32; 4] = [1.0, 0.85, 0.4, 1.0];
const LABEL_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
const VALUE_COLOR: [f32; 4] = [0.6, 0.8, 1.0, 1.0];

/// Folder of the panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FolderId(usize);

/// Handle of a live binding
pub type BindingId = Handle<Binding>;

/// Generation parameters a binding can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamField {
    PlaneWidth,
    PlaneHeight,
    SegmentsWidth,
    SegmentsHeight,
    MountainHeight,
    Animate,
}

/// Properties of the mountain material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialField {
    Color,
    Wireframe,
    DisplacementScale,
}

/// Light properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightField {
    AmbientIntensity,
    AmbientColor,
    PointIntensity,
    PointColor,
}

/// The field a binding edits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingTarget {
    Param(ParamField),
    Material(MaterialField),
    Light(LightField),
}

impl BindingTarget {
    /// Label used when a binding is not given a name
    pub fn default_name(self) -> &'static str {
        match self {
            BindingTarget::Param(ParamField::PlaneWidth) => "planeWidth",
            BindingTarget::Param(ParamField::PlaneHeight) => "planeHeight",
            BindingTarget::Param(ParamField::SegmentsWidth) => "segmentsWidth",
            BindingTarget::Param(ParamField::SegmentsHeight) => "segmentsHeight",
            BindingTarget::Param(ParamField::MountainHeight) => "mountainHeight",
            BindingTarget::Param(ParamField::Animate) => "animate",
            BindingTarget::Material(MaterialField::Color) => "color",
            BindingTarget::Material(MaterialField::Wireframe) => "wireframe",
            BindingTarget::Material(MaterialField::DisplacementScale) => "displacementScale",
            BindingTarget::Light(LightField::AmbientIntensity | LightField::PointIntensity) => {
                "intensity"
            }
            BindingTarget::Light(LightField::AmbientColor | LightField::PointColor) => "color",
        }
    }
}

/// Value carried by a control
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BindingValue {
    Number(f32),
    Bool(bool),
    Color(Color),
}

/// Control kind and its current state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    Slider {
        min: f32,
        max: f32,
        step: f32,
        value: f32,
    },
    Toggle {
        value: bool,
    },
    Color {
        value: Color,
    },
}

impl Control {
    pub fn value(&self) -> BindingValue {
        match *self {
            Control::Slider { value, .. } => BindingValue::Number(value),
            Control::Toggle { value } => BindingValue::Bool(value),
            Control::Color { value } => BindingValue::Color(value),
        }
    }
}

/// Snap `value` to the nearest multiple of `step` above `min`, then clamp.
pub fn snap(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let (lo, hi) = (min.min(max), min.max(max));
    if !value.is_finite() {
        return lo;
    }
    let snapped = if step > 0.0 {
        lo + ((value - lo) / step).round() * step
    } else {
        value
    };
    snapped.clamp(lo, hi)
}

/// A live control bound to a field
#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    pub folder: FolderId,
    pub target: BindingTarget,
    pub control: Control,
    /// Changing this control rebuilds the mountain
    pub regenerate_on_change: bool,
}

/// Produced when the user changes a control
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelEvent {
    Changed {
        binding: BindingId,
        target: BindingTarget,
        value: BindingValue,
        regenerate: bool,
    },
}

/// Result of routing a mouse press to the panel
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelInput {
    /// The press landed on the panel and should not reach the camera
    pub consumed: bool,
    pub event: Option<PanelEvent>,
}

/// Chained configuration of a freshly added binding
pub struct BindingMut<'a> {
    id: BindingId,
    panel: &'a mut Panel,
}

impl BindingMut<'_> {
    pub fn name(self, name: impl Into<String>) -> Self {
        if let Some(binding) = self.panel.bindings.get_mut(self.id) {
            binding.name = name.into();
        }
        self
    }

    pub fn regenerate_on_change(self) -> Self {
        if let Some(binding) = self.panel.bindings.get_mut(self.id) {
            binding.regenerate_on_change = true;
        }
        self
    }

    pub fn id(&self) -> BindingId {
        self.id
    }
}

#[derive(Clone, Copy, Debug)]
enum RowKind {
    Folder(FolderId),
    Binding(BindingId),
}

#[derive(Clone, Copy, Debug)]
struct Row {
    kind: RowKind,
    rect: Rect,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    binding: BindingId,
    channel: Option<usize>,
}

/// The parameter panel
pub struct Panel {
    pub visible: bool,
    folders: Vec<String>,
    bindings: Assets<Binding>,
    /// Insertion order of live bindings
    order: Vec<BindingId>,
    drag: Option<Drag>,
    viewport: (f32, f32),
}

impl Panel {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            visible: true,
            folders: Vec::new(),
            bindings: Assets::new(),
            order: Vec::new(),
            drag: None,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
        self.drag = None;
        tracing::debug!(visible = self.visible, "panel visibility toggled");
    }

    pub fn add_folder(&mut self, title: impl Into<String>) -> FolderId {
        self.folders.push(title.into());
        FolderId(self.folders.len() - 1)
    }

    pub fn folder_title(&self, folder: FolderId) -> Option<&str> {
        self.folders.get(folder.0).map(String::as_str)
    }

    /// Add a slider over `[min, max]` moving in `step` increments
    pub fn add_slider(
        &mut self,
        folder: FolderId,
        target: BindingTarget,
        value: f32,
        min: f32,
        max: f32,
        step: f32,
    ) -> BindingMut<'_> {
        let (lo, hi) = (min.min(max), min.max(max));
        let control = Control::Slider {
            min: lo,
            max: hi,
            step,
            value: value.clamp(lo, hi),
        };
        self.insert(folder, target, control)
    }

    pub fn add_toggle(&mut self, folder: FolderId, target: BindingTarget, value: bool) -> BindingMut<'_> {
        self.insert(folder, target, Control::Toggle { value })
    }

    pub fn add_color(&mut self, folder: FolderId, target: BindingTarget, value: Color) -> BindingMut<'_> {
        self.insert(folder, target, Control::Color { value })
    }

    fn insert(&mut self, folder: FolderId, target: BindingTarget, control: Control) -> BindingMut<'_> {
        let id = self.bindings.insert(Binding {
            name: target.default_name().to_string(),
            folder,
            target,
            control,
            regenerate_on_change: false,
        });
        self.order.push(id);
        tracing::trace!(?id, ?target, "binding added");
        BindingMut { id, panel: self }
    }

    /// Detach a binding. Returns whether it was live.
    pub fn destroy(&mut self, id: BindingId) -> bool {
        if self.bindings.dispose(id).is_none() {
            return false;
        }
        self.order.retain(|&b| b != id);
        if self.drag.is_some_and(|d| d.binding == id) {
            self.drag = None;
        }
        tracing::trace!(?id, "binding destroyed");
        true
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id)
    }

    pub fn contains(&self, id: BindingId) -> bool {
        self.bindings.contains(id)
    }

    /// Number of live bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Live bindings of `folder` in insertion order
    pub fn bindings_in(&self, folder: FolderId) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.order
            .iter()
            .filter_map(|&id| self.bindings.get(id).map(|b| (id, b)))
            .filter(move |(_, b)| b.folder == folder)
    }

    /// Set a control's value as if the user changed it. Sliders snap and
    /// clamp. Returns an event only if the binding is live, the value kind
    /// matches and the stored value actually changed.
    pub fn set_value(&mut self, id: BindingId, value: BindingValue) -> Option<PanelEvent> {
        let binding = self.bindings.get_mut(id)?;
        let changed = match (&mut binding.control, value) {
            (Control::Slider { min, max, step, value: current }, BindingValue::Number(v)) => {
                let v = snap(v, *min, *max, *step);
                let changed = v != *current;
                *current = v;
                changed
            }
            (Control::Toggle { value: current }, BindingValue::Bool(v)) => {
                let changed = v != *current;
                *current = v;
                changed
            }
            (Control::Color { value: current }, BindingValue::Color(v)) => {
                let v = Color::rgb(v.r.clamp(0.0, 1.0), v.g.clamp(0.0, 1.0), v.b.clamp(0.0, 1.0));
                let changed = v != *current;
                *current = v;
                changed
            }
            _ => {
                tracing::warn!(?id, ?value, "value kind does not match control");
                return None;
            }
        };

        changed.then(|| PanelEvent::Changed {
            binding: id,
            target: binding.target,
            value: binding.control.value(),
            regenerate: binding.regenerate_on_change,
        })
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    fn origin(&self) -> (f32, f32) {
        ((self.viewport.0 - PANEL_WIDTH - MARGIN).max(0.0), MARGIN)
    }

    fn rows(&self) -> Vec<Row> {
        let (x, mut y) = self.origin();
        y += PADDING;
        let inner_w = PANEL_WIDTH - PADDING * 2.0;
        let mut rows = Vec::with_capacity(self.folders.len() + self.order.len());

        for folder in (0..self.folders.len()).map(FolderId) {
            rows.push(Row {
                kind: RowKind::Folder(folder),
                rect: Rect::new(x + PADDING, y, inner_w, FOLDER_HEIGHT),
            });
            y += FOLDER_HEIGHT;
            for (id, _) in self.bindings_in(folder) {
                rows.push(Row {
                    kind: RowKind::Binding(id),
                    rect: Rect::new(x + PADDING, y, inner_w, ROW_HEIGHT),
                });
                y += ROW_HEIGHT;
            }
        }
        rows
    }

    /// Full panel rectangle
    pub fn bounds(&self) -> Rect {
        let (x, y) = self.origin();
        let content: f32 = self
            .rows()
            .iter()
            .map(|row| match row.kind {
                RowKind::Folder(_) => FOLDER_HEIGHT,
                RowKind::Binding(_) => ROW_HEIGHT,
            })
            .sum();
        Rect::new(x, y, PANEL_WIDTH, content + PADDING * 2.0)
    }

    /// Whether the visible panel is under `(x, y)`
    pub fn covers(&self, x: f32, y: f32) -> bool {
        self.visible && self.bounds().contains(x, y)
    }

    fn control_rect(row: Rect) -> Rect {
        Rect::new(row.x, row.y + CONTROL_OFFSET, row.w, CONTROL_HEIGHT)
    }

    /// Control rectangle of a live binding
    pub fn control_bounds(&self, id: BindingId) -> Option<Rect> {
        self.rows().into_iter().find_map(|row| match row.kind {
            RowKind::Binding(b) if b == id => Some(Self::control_rect(row.rect)),
            _ => None,
        })
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Mouse button pressed at `(x, y)` pixels
    pub fn on_mouse_press(&mut self, x: f32, y: f32) -> PanelInput {
        if !self.visible || !self.bounds().contains(x, y) {
            return PanelInput::default();
        }

        let hit = self.rows().into_iter().find_map(|row| match row.kind {
            RowKind::Binding(id) if Self::control_rect(row.rect).contains(x, y) => {
                Some((id, Self::control_rect(row.rect)))
            }
            _ => None,
        });

        let event = hit.and_then(|(id, rect)| {
            let control = self.bindings.get(id)?.control;
            match control {
                Control::Slider { .. } => {
                    self.drag = Some(Drag { binding: id, channel: None });
                    self.drag_to(id, None, rect, x)
                }
                Control::Toggle { value } => self.set_value(id, BindingValue::Bool(!value)),
                Control::Color { .. } => {
                    let channel = widgets::channel_at(rect, x)?;
                    self.drag = Some(Drag { binding: id, channel: Some(channel) });
                    self.drag_to(id, Some(channel), rect, x)
                }
            }
        });

        PanelInput { consumed: true, event }
    }

    /// Mouse moved; updates the control being dragged
    pub fn on_mouse_move(&mut self, x: f32, _y: f32) -> Option<PanelEvent> {
        let drag = self.drag?;
        let Some(rect) = self.control_bounds(drag.binding) else {
            self.drag = None;
            return None;
        };
        self.drag_to(drag.binding, drag.channel, rect, x)
    }

    /// Mouse released. Returns whether a drag was in progress.
    pub fn on_mouse_release(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn drag_to(&mut self, id: BindingId, channel: Option<usize>, rect: Rect, x: f32) -> Option<PanelEvent> {
        let control = self.bindings.get(id)?.control;
        let value = match (control, channel) {
            (Control::Slider { min, max, .. }, _) => {
                BindingValue::Number(min + rect.fraction_x(x) * (max - min))
            }
            (Control::Color { value }, Some(channel)) => {
                let bar = widgets::channel_rects(rect)[channel];
                let mut color = value;
                color.set_channel(channel, bar.fraction_x(x));
                BindingValue::Color(color)
            }
            _ => return None,
        };
        self.set_value(id, value)
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Generate the panel as NDC quads for the overlay pass
    pub fn generate_ui_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        if !self.visible {
            return mesh;
        }
        let screen = Screen::new(self.viewport.0, self.viewport.1);
        let bounds = self.bounds();
        push_rect(&mut mesh, screen, bounds.x, bounds.y, bounds.w, bounds.h, BACKGROUND);

        for row in self.rows() {
            match row.kind {
                RowKind::Folder(folder) => {
                    let r = row.rect;
                    push_rect(&mut mesh, screen, r.x, r.y + 2.0, r.w, r.h - 4.0, FOLDER_BAR);
                    let title = self.folder_title(folder).unwrap_or_default();
                    let text_y = r.y + (r.h - GLYPH_HEIGHT * TITLE_SCALE) / 2.0;
                    draw_text(&mut mesh, screen, title, r.x + 4.0, text_y, TITLE_SCALE, TITLE_COLOR);
                }
                RowKind::Binding(id) => {
                    if let Some(binding) = self.bindings.get(id) {
                        Self::draw_binding(&mut mesh, screen, row.rect, binding);
                    }
                }
            }
        }
        mesh
    }

    fn draw_binding(mesh: &mut Mesh, screen: Screen, row: Rect, binding: &Binding) {
        let label_y = row.y + 3.0;
        draw_text(mesh, screen, &binding.name, row.x, label_y, LABEL_SCALE, LABEL_COLOR);

        let value_text = format_value(&binding.control);
        let value_x = row.x + row.w - text_width(&value_text, LABEL_SCALE);
        draw_text(mesh, screen, &value_text, value_x, label_y, LABEL_SCALE, VALUE_COLOR);

        let rect = Self::control_rect(row);
        match binding.control {
            Control::Slider { min, max, value, .. } => {
                let fraction = if max > min { (value - min) / (max - min) } else { 0.0 };
                widgets::draw_slider(mesh, screen, rect, fraction);
            }
            Control::Toggle { value } => widgets::draw_toggle(mesh, screen, rect, value),
            Control::Color { value } => widgets::draw_color(mesh, screen, rect, value),
        }
    }
}

/// Display text of a control's value
fn format_value(control: &Control) -> String {
    match *control {
        Control::Slider { step, value, .. } => {
            let mut decimals = 0;
            let mut scaled = step;
            while decimals < 4 && scaled > 0.0 && (scaled - scaled.round()).abs() > 1e-4 {
                scaled *= 10.0;
                decimals += 1;
            }
            format!("{value:.decimals$}")
        }
        Control::Toggle { value } => if value { "ON" } else { "OFF" }.to_string(),
        Control::Color { value } => format!("#{:06X}", value.to_hex()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: BindingTarget = BindingTarget::Param(ParamField::PlaneWidth);

    fn panel_with_slider() -> (Panel, BindingId) {
        let mut panel = Panel::new(1280.0, 720.0);
        let folder = panel.add_folder("Mountains Settings");
        let id = panel
            .add_slider(folder, WIDTH, 5.0, 1.0, 10.0, 0.5)
            .name("Plane Width")
            .regenerate_on_change()
            .id();
        (panel, id)
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(5.2, 1.0, 10.0, 0.5), 5.0);
        assert_eq!(snap(5.3, 1.0, 10.0, 0.5), 5.5);
        assert_eq!(snap(-4.0, 1.0, 10.0, 0.5), 1.0);
        assert_eq!(snap(99.0, 1.0, 10.0, 0.5), 10.0);
        assert_eq!(snap(f32::NAN, 1.0, 10.0, 0.5), 1.0);
        assert_eq!(snap(9.0, 8.0, 64.0, 2.0), 10.0);
    }

    #[test]
    fn test_builder_sets_name_and_flag() {
        let (panel, id) = panel_with_slider();
        let b = panel.binding(id).unwrap();
        assert_eq!(b.name, "Plane Width");
        assert!(b.regenerate_on_change);
        assert_eq!(b.control.value(), BindingValue::Number(5.0));
    }

    #[test]
    fn test_default_name_from_target() {
        let mut panel = Panel::new(800.0, 600.0);
        let folder = panel.add_folder("Background");
        let id = panel
            .add_toggle(folder, BindingTarget::Material(MaterialField::Wireframe), false)
            .id();
        assert_eq!(panel.binding(id).unwrap().name, "wireframe");
    }

    #[test]
    fn test_set_value_emits_only_on_change() {
        let (mut panel, id) = panel_with_slider();
        assert_eq!(panel.set_value(id, BindingValue::Number(5.1)), None);

        let event = panel.set_value(id, BindingValue::Number(7.4));
        assert_eq!(
            event,
            Some(PanelEvent::Changed {
                binding: id,
                target: WIDTH,
                value: BindingValue::Number(7.5),
                regenerate: true,
            })
        );
    }

    #[test]
    fn test_set_value_kind_mismatch_is_ignored() {
        let (mut panel, id) = panel_with_slider();
        assert_eq!(panel.set_value(id, BindingValue::Bool(true)), None);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut panel, id) = panel_with_slider();
        assert!(panel.destroy(id));
        assert!(!panel.destroy(id));
        assert!(panel.is_empty());
        assert_eq!(panel.set_value(id, BindingValue::Number(3.0)), None);
    }

    #[test]
    fn test_press_outside_not_consumed() {
        let (mut panel, _) = panel_with_slider();
        let input = panel.on_mouse_press(5.0, 5.0);
        assert!(!input.consumed);
        assert!(input.event.is_none());
    }

    #[test]
    fn test_drag_slider_to_max() {
        let (mut panel, id) = panel_with_slider();
        let rect = panel.control_bounds(id).unwrap();
        let input = panel.on_mouse_press(rect.x + 1.0, rect.y + 1.0);
        assert!(input.consumed);
        assert!(panel.is_dragging());

        let event = panel.on_mouse_move(rect.x + rect.w + 50.0, rect.y);
        assert!(matches!(
            event,
            Some(PanelEvent::Changed { value: BindingValue::Number(v), .. }) if v == 10.0
        ));
        assert!(panel.on_mouse_release());
        assert!(!panel.is_dragging());
        assert_eq!(panel.on_mouse_move(rect.x, rect.y), None);
    }

    #[test]
    fn test_click_toggle_flips() {
        let mut panel = Panel::new(1280.0, 720.0);
        let folder = panel.add_folder("Background");
        let target = BindingTarget::Param(ParamField::Animate);
        let id = panel.add_toggle(folder, target, true).id();
        let rect = panel.control_bounds(id).unwrap();

        let input = panel.on_mouse_press(rect.x + 2.0, rect.y + 2.0);
        assert_eq!(
            input.event,
            Some(PanelEvent::Changed {
                binding: id,
                target,
                value: BindingValue::Bool(false),
                regenerate: false,
            })
        );
        assert!(!panel.is_dragging());
    }

    #[test]
    fn test_hidden_panel_ignores_input_and_draws_nothing() {
        let (mut panel, id) = panel_with_slider();
        let rect = panel.control_bounds(id).unwrap();
        panel.toggle_visible();
        assert!(!panel.on_mouse_press(rect.x + 1.0, rect.y + 1.0).consumed);
        assert!(panel.generate_ui_mesh().is_empty());
        panel.toggle_visible();
        assert!(!panel.generate_ui_mesh().is_empty());
    }

    #[test]
    fn test_format_value_uses_step_precision() {
        let slider = |step, value| Control::Slider { min: 0.0, max: 10.0, step, value };
        assert_eq!(format_value(&slider(0.5, 5.0)), "5.0");
        assert_eq!(format_value(&slider(2.0, 20.0)), "20");
        assert_eq!(format_value(&slider(0.05, 0.3)), "0.30");
        assert_eq!(format_value(&slider(0.001, 0.4)), "0.400");
        assert_eq!(
            format_value(&Control::Color { value: Color::from_hex(0xababab) }),
            "#ABABAB"
        );
    }
}
