//! Text Rendering
//!
//! Pixel-font text and flat rectangles built from screen-space quads.

use crate::game::types::{Mesh, Vertex};

/// Glyph cell width in font pixels, including one pixel of spacing
const GLYPH_ADVANCE: f32 = 6.0;
/// Glyph height in font pixels
pub const GLYPH_HEIGHT: f32 = 7.0;

/// Screen dimensions used to map pixel coordinates to NDC
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Pixels from the top-left corner to NDC (Y up)
    pub fn to_ndc(&self, x: f32, y: f32) -> [f32; 3] {
        [
            (x / self.width) * 2.0 - 1.0,
            1.0 - (y / self.height) * 2.0,
            0.0,
        ]
    }
}

/// Append an axis-aligned rectangle given in screen pixels
pub fn push_rect(mesh: &mut Mesh, screen: Screen, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    let base = mesh.vertices.len() as u32;
    for (px, py) in [(x, y), (x + w, y), (x + w, y + h), (x, y + h)] {
        mesh.vertices.push(Vertex {
            position: screen.to_ndc(px, py),
            color,
        });
    }
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Width in pixels of `text` drawn at `scale`
pub fn text_width(text: &str, scale: f32) -> f32 {
    text.chars().count() as f32 * GLYPH_ADVANCE * scale
}

/// Draw text with its top-left corner at `(x, y)`
pub fn draw_text(
    mesh: &mut Mesh,
    screen: Screen,
    text: &str,
    x: f32,
    y: f32,
    scale: f32,
    color: [f32; 4],
) {
    for (char_idx, c) in text.chars().enumerate() {
        let bitmap = glyph(c);
        let char_x = x + char_idx as f32 * GLYPH_ADVANCE * scale;

        for (row, &bits) in bitmap.iter().enumerate() {
            for col in 0..5 {
                if (bits >> (4 - col)) & 1 == 1 {
                    push_rect(
                        mesh,
                        screen,
                        char_x + col as f32 * scale,
                        y + row as f32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }
}

/// 5x7 bitmap for a character, one byte per row, MSB of the low five bits
/// on the left. Letters are drawn upper-case.
pub fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b01110, 0b10001, 0b00001, 0b00110, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b01110, 0b10000, 0b11110, 0b10001, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001, 0b01110],
        ' ' => [0; 7],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000],
        '#' => [0b01010, 0b11111, 0b01010, 0b01010, 0b01010, 0b11111, 0b01010],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        // Unknown = filled box
        _ => [0b11111; 7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_ndc_corners() {
        let s = Screen::new(800.0, 600.0);
        assert_eq!(s.to_ndc(0.0, 0.0), [-1.0, 1.0, 0.0]);
        assert_eq!(s.to_ndc(800.0, 600.0), [1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_push_rect_adds_one_quad() {
        let mut mesh = Mesh::new();
        push_rect(&mut mesh, Screen::new(100.0, 100.0), 10.0, 10.0, 5.0, 5.0, [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut mesh = Mesh::new();
        draw_text(&mut mesh, Screen::new(100.0, 100.0), "   ", 0.0, 0.0, 2.0, [1.0; 4]);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_glyph_case_insensitive() {
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(text_width("ABC", 2.0), 36.0);
    }
}
