//! Plane Geometry
//!
//! Planar grid geometry with per-vertex position, normal and UV plus
//! triangle indices. Vertices are laid out row by row from the top-left
//! corner, matching the usual `PlaneGeometry` layout of web 3D engines, so
//! the height and normal maps line up with the source textures.

use std::collections::HashSet;

use glam::{Mat3, Vec2, Vec3};

/// CPU-side vertex buffer of a mesh
#[derive(Clone, Debug)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    /// Grid columns (`width_segments + 1`)
    pub columns: u32,
    /// Grid rows (`height_segments + 1`)
    pub rows: u32,
}

impl Geometry {
    /// Build a `width x height` plane in the XY plane facing +Z, split into
    /// `width_segments x height_segments` quads.
    ///
    /// Segment counts below 1 are treated as 1.
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let grid_x = width_segments.max(1);
        let grid_y = height_segments.max(1);
        let columns = grid_x + 1;
        let rows = grid_y + 1;

        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let segment_w = width / grid_x as f32;
        let segment_h = height / grid_y as f32;

        let vertex_count = (columns * rows) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for iy in 0..rows {
            let y = iy as f32 * segment_h - half_h;
            for ix in 0..columns {
                let x = ix as f32 * segment_w - half_w;
                positions.push(Vec3::new(x, -y, 0.0));
                normals.push(Vec3::Z);
                uvs.push(Vec2::new(
                    ix as f32 / grid_x as f32,
                    1.0 - iy as f32 / grid_y as f32,
                ));
            }
        }

        let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + columns * iy;
                let b = ix + columns * (iy + 1);
                let c = (ix + 1) + columns * (iy + 1);
                let d = (ix + 1) + columns * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            positions,
            normals,
            uvs,
            indices,
            columns,
            rows,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Rotate positions and normals about the X axis by `angle` radians.
    pub fn rotate_x(&mut self, angle: f32) {
        let rotation = Mat3::from_rotation_x(angle);
        for p in &mut self.positions {
            *p = rotation * *p;
        }
        for n in &mut self.normals {
            *n = (rotation * *n).normalize_or_zero();
        }
    }

    /// Unique triangle edges as a line list, in first-seen order.
    pub fn line_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_vertex_and_index_counts() {
        let g = Geometry::plane(5.0, 5.0, 20, 20);
        assert_eq!(g.vertex_count(), 441);
        assert_eq!(g.triangle_count(), 20 * 20 * 2);
        assert_eq!(g.normals.len(), 441);
        assert_eq!(g.uvs.len(), 441);
    }

    #[test]
    fn test_plane_corners_and_uvs() {
        let g = Geometry::plane(4.0, 2.0, 2, 1);
        // First vertex is top-left
        assert_eq!(g.positions[0], Vec3::new(-2.0, 1.0, 0.0));
        assert_eq!(g.uvs[0], Vec2::new(0.0, 1.0));
        // Last vertex is bottom-right
        let last = g.vertex_count() - 1;
        assert_eq!(g.positions[last], Vec3::new(2.0, -1.0, 0.0));
        assert_eq!(g.uvs[last], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_zero_segments_clamped() {
        let g = Geometry::plane(1.0, 1.0, 0, 0);
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.indices.len(), 6);
    }

    #[test]
    fn test_indices_in_range() {
        let g = Geometry::plane(3.0, 3.0, 7, 5);
        let n = g.vertex_count() as u32;
        assert!(g.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_rotate_x_quarter_turn_lays_plane_flat() {
        let mut g = Geometry::plane(2.0, 2.0, 1, 1);
        g.rotate_x(-std::f32::consts::FRAC_PI_2);
        for p in &g.positions {
            assert!(p.y.abs() < 1e-6, "plane should lie in XZ, got {p:?}");
        }
        assert!((g.normals[0] - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_line_indices_unique_edges() {
        // One quad = 2 triangles = 5 unique edges
        let g = Geometry::plane(1.0, 1.0, 1, 1);
        assert_eq!(g.line_indices().len(), 10);

        // Grid of w x h quads: horizontal + vertical + diagonal edges
        let g = Geometry::plane(1.0, 1.0, 3, 2);
        let expected = 3 * 3 + 4 * 2 + 3 * 2;
        assert_eq!(g.line_indices().len(), expected * 2);
    }
}
