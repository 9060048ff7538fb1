//! CPU tessellation of flattened paths into anti-aliased triangle lists.
//!
//! Interior and stroke outlines come from lyon; the fringe is added here.
//!
//! Output convention:
//! - plain triangle list (three vertices per triangle), frame units
//! - every vertex carries a coverage weight: 1 on the shape, 0 on the outer
//!   edge of the anti-aliasing fringe; the backend multiplies it into the
//!   paint alpha
//! - zero-area triangles are never emitted

mod fill;
mod fringe;
mod mesh;
mod stroke;

pub use fill::FillTessellator;
pub use mesh::Vertex;
pub use stroke::{resolve_stroke_width, StrokeStyle, Stroker};

pub(crate) use mesh::MeshSink;

#[cfg(test)]
pub(crate) mod test_util {
    use super::Vertex;

    /// Twice the signed area of each triangle.
    pub fn triangle_areas2(vs: &[Vertex]) -> Vec<f32> {
        vs.chunks_exact(3)
            .map(|t| (t[1].pos - t[0].pos).cross(t[2].pos - t[0].pos))
            .collect()
    }

    /// Area covered by fully opaque triangles (all three vertices at coverage 1).
    pub fn solid_area(vs: &[Vertex]) -> f32 {
        vs.chunks_exact(3)
            .filter(|t| t.iter().all(|v| v.coverage == 1.0))
            .map(|t| ((t[1].pos - t[0].pos).cross(t[2].pos - t[0].pos) * 0.5).abs())
            .sum()
    }

    /// Area of fringe triangles (at least one vertex at coverage 0).
    pub fn fringe_area(vs: &[Vertex]) -> f32 {
        vs.chunks_exact(3)
            .filter(|t| t.iter().any(|v| v.coverage == 0.0))
            .map(|t| ((t[1].pos - t[0].pos).cross(t[2].pos - t[0].pos) * 0.5).abs())
            .sum()
    }

    pub fn fringe_triangles(vs: &[Vertex]) -> usize {
        vs.chunks_exact(3)
            .filter(|t| t.iter().any(|v| v.coverage == 0.0))
            .count()
    }
}
