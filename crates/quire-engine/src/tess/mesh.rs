use lyon::tessellation::{
    FillVertex, FillVertexConstructor, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::coords::Vec2;

/// Tessellator output vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub pos: Vec2,
    /// Anti-aliasing weight in `[0, 1]`; scales the paint alpha.
    pub coverage: f32,
}

impl Vertex {
    #[inline]
    pub const fn new(pos: Vec2, coverage: f32) -> Self {
        Self { pos, coverage }
    }

    #[inline]
    pub const fn solid(pos: Vec2) -> Self {
        Self { pos, coverage: 1.0 }
    }

    #[inline]
    pub const fn clear(pos: Vec2) -> Self {
        Self { pos, coverage: 0.0 }
    }
}

/// Indexed triangles as produced by the lyon tessellators.
pub(crate) type IndexedMesh = VertexBuffers<Vec2, u32>;

/// lyon vertex constructor that keeps only the position.
pub(crate) struct Positions;

impl FillVertexConstructor<Vec2> for Positions {
    fn new_vertex(&mut self, vertex: FillVertex) -> Vec2 {
        vertex.position().into()
    }
}

impl StrokeVertexConstructor<Vec2> for Positions {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> Vec2 {
        vertex.position().into()
    }
}

/// Line-only lyon path from polylines given as `(points, closed)`.
pub(crate) fn polyline_path<'a, I>(polylines: I) -> lyon::path::Path
where
    I: IntoIterator<Item = (&'a [Vec2], bool)>,
{
    let mut builder = lyon::path::Path::builder();
    for (points, closed) in polylines {
        let Some((first, rest)) = points.split_first() else { continue };
        builder.begin((*first).into());
        for &p in rest {
            builder.line_to(p.into());
        }
        builder.end(closed);
    }
    builder.build()
}

/// Twice-area below which a triangle is considered degenerate.
const MIN_AREA2: f32 = 1e-7;

/// Appends triangles to a vertex list, dropping degenerate ones.
pub(crate) struct MeshSink<'a> {
    out: &'a mut Vec<Vertex>,
}

impl<'a> MeshSink<'a> {
    #[inline]
    pub fn new(out: &'a mut Vec<Vertex>) -> Self {
        Self { out }
    }

    pub fn tri(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        let area2 = (b.pos - a.pos).cross(c.pos - a.pos);
        if !(area2.abs() > MIN_AREA2) {
            return;
        }
        self.out.extend_from_slice(&[a, b, c]);
    }

    /// Quad given in perimeter order `a -> b -> c -> d`.
    #[inline]
    pub fn quad(&mut self, a: Vertex, b: Vertex, c: Vertex, d: Vertex) {
        self.tri(a, b, c);
        self.tri(a, c, d);
    }

    #[inline]
    pub fn solid_tri(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        self.tri(Vertex::solid(a), Vertex::solid(b), Vertex::solid(c));
    }

    /// Every triangle of `mesh` at full coverage.
    pub fn solid_mesh(&mut self, mesh: &IndexedMesh) {
        for tri in mesh.indices.chunks_exact(3) {
            let corners = (
                mesh.vertices.get(tri[0] as usize),
                mesh.vertices.get(tri[1] as usize),
                mesh.vertices.get(tri[2] as usize),
            );
            if let (Some(&a), Some(&b), Some(&c)) = corners {
                self.solid_tri(a, b, c);
            }
        }
    }

    /// Fringe band along the shape edge `inner0 -> inner1`, fading to zero at
    /// `outer0 -> outer1`.
    #[inline]
    pub fn fringe(&mut self, inner0: Vec2, inner1: Vec2, outer0: Vec2, outer1: Vec2) {
        self.quad(
            Vertex::solid(inner0),
            Vertex::solid(inner1),
            Vertex::clear(outer1),
            Vertex::clear(outer0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_triangles_are_dropped() {
        let mut out = Vec::new();
        let mut sink = MeshSink::new(&mut out);
        sink.solid_tri(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0));
        sink.solid_tri(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        assert!(out.is_empty());
    }

    #[test]
    fn quad_with_collapsed_side_emits_one_triangle() {
        let mut out = Vec::new();
        let mut sink = MeshSink::new(&mut out);
        let a = Vec2::new(0.0, 0.0);
        sink.quad(
            Vertex::solid(a),
            Vertex::solid(a),
            Vertex::clear(Vec2::new(1.0, 1.0)),
            Vertex::clear(Vec2::new(0.0, 1.0)),
        );
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn fringe_coverage_layout() {
        let mut out = Vec::new();
        let mut sink = MeshSink::new(&mut out);
        sink.fringe(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(4.0, -1.0),
        );
        assert_eq!(out.len(), 6);
        assert_eq!(out.iter().filter(|v| v.coverage == 1.0).count(), 3);
        assert_eq!(out.iter().filter(|v| v.coverage == 0.0).count(), 3);
    }

    #[test]
    fn solid_mesh_expands_indices() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.extend([
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]);
        mesh.indices.extend([0, 1, 2, 0, 2, 3, 0, 1, 9]);
        let mut out = Vec::new();
        MeshSink::new(&mut out).solid_mesh(&mesh);
        assert_eq!(out.len(), 6);
        assert_eq!(out[4].pos, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn polyline_path_keeps_closed_flags() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let empty: [Vec2; 0] = [];
        let path = polyline_path([(&tri[..], true), (&empty[..], false), (&tri[..2], false)]);
        let closes: Vec<bool> = path
            .iter()
            .filter_map(|e| match e {
                lyon::path::PathEvent::End { close, .. } => Some(close),
                _ => None,
            })
            .collect();
        assert_eq!(closes, [true, false]);
    }
}
