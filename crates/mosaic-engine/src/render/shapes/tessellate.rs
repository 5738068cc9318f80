//! CPU tessellation for polygon fills and outlines.
//!
//! Output is a flat triangle list in logical pixels, ready to upload.

use bytemuck::{Pod, Zeroable};
use earcutr::earcut;

use crate::coords::{Rect, Vec2};

/// Vertex shared by fills and strokes.
///
/// `uv` addresses the bound texture; solid geometry samples a 1×1 white
/// texture so `color` alone decides the output.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct PolygonVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl PolygonVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PolygonVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const SOLID_UV: [f32; 2] = [0.5, 0.5];

/// Growable triangle mesh.
#[derive(Debug, Default)]
pub(crate) struct Mesh {
    pub vertices: Vec<PolygonVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub(crate) fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    fn push(&mut self, pos: Vec2, uv: [f32; 2], color: [f32; 4]) -> u32 {
        let i = self.vertices.len() as u32;
        self.vertices.push(PolygonVertex { pos: [pos.x, pos.y], uv, color });
        i
    }

    fn push_quad(&mut self, corners: [Vec2; 4], color: [f32; 4]) {
        let base = self.push(corners[0], SOLID_UV, color);
        for c in &corners[1..] {
            self.push(*c, SOLID_UV, color);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Appends the triangulated interior of `points` to `mesh`.
///
/// UVs stretch the bounding box over `[0, 1]²`. Returns the number of
/// triangles added; zero for degenerate input.
pub(crate) fn fill(mesh: &mut Mesh, points: &[Vec2], color: [f32; 4]) -> usize {
    let points = open_ring(points);
    if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
        return 0;
    }
    let Some(bounds) = Rect::bounding(points) else { return 0 };

    let flat: Vec<f64> = points
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();
    let triangles = match earcut(&flat, &[], 2) {
        Ok(t) => t,
        Err(_) => {
            log::debug!("triangulation failed for {} points", points.len());
            return 0;
        }
    };
    if triangles.is_empty() {
        return 0;
    }

    let base = mesh.vertices.len() as u32;
    for &p in points {
        mesh.push(p, bounds_uv(bounds, p), color);
    }
    mesh.indices.extend(triangles.iter().map(|&i| base + i as u32));

    triangles.len() / 3
}

/// Appends a closed stroke of `width` centered on the path of `points`.
///
/// Each edge becomes a quad; joints are bevelled so the outline has no gaps
/// at corners.
pub(crate) fn stroke(mesh: &mut Mesh, points: &[Vec2], width: f32, color: [f32; 4]) {
    let points = open_ring(points);
    if points.len() < 2 || !(width > 0.0) {
        return;
    }
    let half = width * 0.5;

    // Unit normals per edge; `None` for zero-length edges.
    let n = points.len();
    let normals: Vec<Option<Vec2>> = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            (b - a).normalized().map(|d| d.perp() * half)
        })
        .collect();

    for i in 0..n {
        let Some(off) = normals[i] else { continue };
        let (a, b) = (points[i], points[(i + 1) % n]);
        mesh.push_quad([a + off, b + off, b - off, a - off], color);
    }

    // Bevel joint at vertex i between edge i-1 and edge i.
    for i in 0..n {
        let prev = (0..n).map(|k| (i + n - 1 - k) % n).find_map(|k| normals[k]);
        let (Some(p), Some(q)) = (prev, normals[i]) else { continue };
        let v = points[i];
        let c = mesh.push(v, SOLID_UV, color);
        mesh.push(v + p, SOLID_UV, color);
        mesh.push(v + q, SOLID_UV, color);
        mesh.push(v - p, SOLID_UV, color);
        mesh.push(v - q, SOLID_UV, color);
        mesh.indices.extend_from_slice(&[c, c + 1, c + 2, c, c + 3, c + 4]);
    }
}

/// Drops an explicit closing point equal to the first.
fn open_ring(points: &[Vec2]) -> &[Vec2] {
    match points {
        [first, .., last] if points.len() > 3 && first == last => &points[..points.len() - 1],
        _ => points,
    }
}

fn bounds_uv(bounds: Rect, p: Vec2) -> [f32; 2] {
    let u = if bounds.size.x > 0.0 { (p.x - bounds.origin.x) / bounds.size.x } else { 0.0 };
    let v = if bounds.size.y > 0.0 { (p.y - bounds.origin.y) / bounds.size.y } else { 0.0 };
    [u, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn square(size: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(size, 0.0),
            Vec2::new(size, size),
            Vec2::new(0.0, size),
        ]
    }

    fn triangle_area(m: &Mesh, t: &[u32]) -> f32 {
        let p = |i: u32| {
            let v = m.vertices[i as usize].pos;
            Vec2::new(v[0], v[1])
        };
        let (a, b, c) = (p(t[0]), p(t[1]), p(t[2]));
        ((b - a).x * (c - a).y - (b - a).y * (c - a).x).abs() * 0.5
    }

    // ── fill ──────────────────────────────────────────────────────────────

    #[test]
    fn square_fills_with_two_triangles() {
        let mut m = Mesh::default();
        assert_eq!(fill(&mut m, &square(10.0), WHITE), 2);
        assert_eq!(m.vertices.len(), 4);
        assert_eq!(m.indices.len(), 6);
    }

    #[test]
    fn concave_fill_covers_exact_area() {
        // L-shape: 10x10 square minus the 5x5 top-right quadrant.
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let mut m = Mesh::default();
        fill(&mut m, &l, WHITE);
        let area: f32 = m.indices.chunks(3).map(|t| triangle_area(&m, t)).sum();
        assert!((area - 75.0).abs() < 1e-3);
    }

    #[test]
    fn fill_uvs_span_bounding_box() {
        let pts = vec![Vec2::new(100.0, 50.0), Vec2::new(300.0, 50.0), Vec2::new(100.0, 150.0)];
        let mut m = Mesh::default();
        fill(&mut m, &pts, WHITE);
        let uvs: Vec<[f32; 2]> = m.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn fill_indices_are_offset_by_existing_vertices() {
        let mut m = Mesh::default();
        fill(&mut m, &square(1.0), WHITE);
        fill(&mut m, &square(1.0), WHITE);
        assert!(m.indices[6..].iter().all(|&i| (4..8).contains(&i)));
    }

    #[test]
    fn collinear_points_produce_nothing() {
        let line = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        let mut m = Mesh::default();
        assert_eq!(fill(&mut m, &line, WHITE), 0);
        assert!(m.indices.is_empty());
    }

    #[test]
    fn closing_point_is_ignored() {
        let mut pts = square(4.0);
        pts.push(pts[0]);
        let mut m = Mesh::default();
        fill(&mut m, &pts, WHITE);
        assert_eq!(m.vertices.len(), 4);
    }

    // ── stroke ────────────────────────────────────────────────────────────

    #[test]
    fn square_stroke_has_edge_quads_and_joints() {
        let mut m = Mesh::default();
        stroke(&mut m, &square(10.0), 2.0, WHITE);
        // 4 edge quads (4 verts, 6 idx) + 4 bevels (5 verts, 6 idx).
        assert_eq!(m.vertices.len(), 36);
        assert_eq!(m.indices.len(), 48);
    }

    #[test]
    fn stroke_is_centered_on_path() {
        let mut m = Mesh::default();
        stroke(&mut m, &square(10.0), 2.0, WHITE);
        for v in &m.vertices {
            assert!(v.pos[0] >= -1.0 - 1e-4 && v.pos[0] <= 11.0 + 1e-4);
            assert!(v.pos[1] >= -1.0 - 1e-4 && v.pos[1] <= 11.0 + 1e-4);
        }
        assert!(m.vertices.iter().any(|v| (v.pos[0] + 1.0).abs() < 1e-4));
        assert!(m.vertices.iter().any(|v| (v.pos[0] - 1.0).abs() < 1e-4));
    }

    #[test]
    fn zero_width_stroke_is_skipped() {
        let mut m = Mesh::default();
        stroke(&mut m, &square(10.0), 0.0, WHITE);
        assert!(m.vertices.is_empty());
    }

    #[test]
    fn repeated_vertex_skips_degenerate_edge() {
        let pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        let mut m = Mesh::default();
        stroke(&mut m, &pts, 2.0, WHITE);
        assert!(m.vertices.iter().all(|v| v.pos[0].is_finite() && v.pos[1].is_finite()));
        // 3 real edges, 3 joints (vertex 2 follows the empty edge and still joins).
        assert_eq!(m.indices.len(), 3 * 6 + 3 * 6);
    }
}
