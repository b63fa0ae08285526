//! Panel Widgets
//!
//! Hit rectangles and quad drawing for the three control kinds the panel
//! offers: slider, toggle and color picker.

use super::text::{Screen, push_rect};
use crate::game::types::{Color, Mesh};

const TRACK_COLOR: [f32; 4] = [0.22, 0.22, 0.25, 1.0];
const FILL_COLOR: [f32; 4] = [0.35, 0.65, 1.0, 1.0];
const HANDLE_COLOR: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
const CHANNEL_COLORS: [[f32; 4]; 3] = [
    [0.9, 0.3, 0.3, 1.0],
    [0.3, 0.85, 0.35, 1.0],
    [0.35, 0.5, 1.0, 1.0],
];

/// Width of the color swatch at the left of a color control
pub const SWATCH_WIDTH: f32 = 28.0;
const CHANNEL_GAP: f32 = 4.0;

/// Axis-aligned rectangle in screen pixels (origin top-left)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Check if a point is within this rectangle
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Horizontal position of `px` inside the rectangle, in `[0, 1]`
    pub fn fraction_x(&self, px: f32) -> f32 {
        if self.w <= 0.0 {
            return 0.0;
        }
        ((px - self.x) / self.w).clamp(0.0, 1.0)
    }

    fn draw(&self, mesh: &mut Mesh, screen: Screen, color: [f32; 4]) {
        push_rect(mesh, screen, self.x, self.y, self.w, self.h, color);
    }
}

/// Channel bars of a color control, right of the swatch
pub fn channel_rects(control: Rect) -> [Rect; 3] {
    let start = control.x + SWATCH_WIDTH + CHANNEL_GAP;
    let bar_w = ((control.x + control.w - start) - CHANNEL_GAP * 2.0) / 3.0;
    std::array::from_fn(|i| {
        Rect::new(
            start + i as f32 * (bar_w + CHANNEL_GAP),
            control.y,
            bar_w.max(0.0),
            control.h,
        )
    })
}

/// Which channel bar of a color control `px` falls on
pub fn channel_at(control: Rect, px: f32) -> Option<usize> {
    channel_rects(control)
        .iter()
        .position(|bar| px >= bar.x && px <= bar.x + bar.w)
}

/// Slider: track, fill up to `fraction` and a handle
pub fn draw_slider(mesh: &mut Mesh, screen: Screen, rect: Rect, fraction: f32) {
    let fraction = fraction.clamp(0.0, 1.0);
    rect.draw(mesh, screen, TRACK_COLOR);
    if fraction > 0.0 {
        Rect::new(rect.x, rect.y, rect.w * fraction, rect.h).draw(mesh, screen, FILL_COLOR);
    }
    let handle_x = rect.x + rect.w * fraction - 3.0;
    Rect::new(handle_x, rect.y - 2.0, 6.0, rect.h + 4.0).draw(mesh, screen, HANDLE_COLOR);
}

/// Toggle: a square box, filled when on
pub fn draw_toggle(mesh: &mut Mesh, screen: Screen, rect: Rect, value: bool) {
    let side = rect.h;
    let outer = Rect::new(rect.x, rect.y, side, side);
    outer.draw(mesh, screen, TRACK_COLOR);
    if value {
        Rect::new(outer.x + 3.0, outer.y + 3.0, side - 6.0, side - 6.0)
            .draw(mesh, screen, FILL_COLOR);
    }
}

/// Color picker: a swatch plus one bar per RGB channel
pub fn draw_color(mesh: &mut Mesh, screen: Screen, rect: Rect, color: Color) {
    Rect::new(rect.x, rect.y, SWATCH_WIDTH, rect.h).draw(mesh, screen, color.to_array(1.0));
    for (i, bar) in channel_rects(rect).into_iter().enumerate() {
        draw_channel(mesh, screen, bar, color.channel(i), CHANNEL_COLORS[i]);
    }
}

fn draw_channel(mesh: &mut Mesh, screen: Screen, bar: Rect, value: f32, tint: [f32; 4]) {
    bar.draw(mesh, screen, TRACK_COLOR);
    let value = value.clamp(0.0, 1.0);
    if value > 0.0 {
        Rect::new(bar.x, bar.y, bar.w * value, bar.h).draw(mesh, screen, tint);
    }
}
