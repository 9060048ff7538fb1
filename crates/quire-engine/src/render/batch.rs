use core::ops::Range;

use crate::coords::Rect;
use crate::paint::Color;
use crate::tess::Vertex;

use super::AlphaMode;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawKind {
    Fill,
    Stroke,
}

/// One `fill` or `stroke`: a range of the batch's vertex list drawn with a
/// single color and blend mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub kind: DrawKind,
    pub vertices: Range<u32>,
    /// Paint color after global alpha (and hairline scaling for strokes).
    pub color: Color,
    pub alpha_mode: AlphaMode,
    /// Bounds of the call's vertices, fringe included.
    pub bounds: Rect,
}

impl DrawCall {
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.end - self.vertices.start
    }
}

/// Geometry awaiting submission: one shared vertex list plus the draw calls
/// referencing it, in issue order.
#[derive(Debug, Clone, Default)]
pub struct DrawBatch {
    vertices: Vec<Vertex>,
    calls: Vec<DrawCall>,
}

impl DrawBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Vertices belonging to `call`.
    pub fn call_vertices(&self, call: &DrawCall) -> &[Vertex] {
        &self.vertices[call.vertices.start as usize..call.vertices.end as usize]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Drops all calls and vertices, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.calls.clear();
    }

    /// Runs `emit` to append vertices and records them as one draw call.
    ///
    /// Returns `false` and records nothing when `emit` produced no vertices.
    pub fn push_with<F>(&mut self, kind: DrawKind, color: Color, alpha_mode: AlphaMode, emit: F) -> bool
    where
        F: FnOnce(&mut Vec<Vertex>),
    {
        let start = self.vertices.len();
        emit(&mut self.vertices);
        let end = self.vertices.len();

        let (Ok(first), Ok(last)) = (u32::try_from(start), u32::try_from(end)) else {
            log::warn!("{kind:?} dropped: batch exceeds u32 vertex indices");
            self.vertices.truncate(start);
            return false;
        };
        let Some(bounds) = Rect::from_points(self.vertices[start..].iter().map(|v| v.pos)) else {
            return false;
        };

        self.calls.push(DrawCall {
            kind,
            vertices: first..last,
            color,
            alpha_mode,
            bounds,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn tri(out: &mut Vec<Vertex>, x: f32) {
        out.extend_from_slice(&[
            Vertex::solid(Vec2::new(x, 0.0)),
            Vertex::solid(Vec2::new(x + 1.0, 0.0)),
            Vertex::clear(Vec2::new(x, 2.0)),
        ]);
    }

    #[test]
    fn calls_keep_issue_order_and_ranges() {
        let mut batch = DrawBatch::new();
        assert!(batch.push_with(DrawKind::Fill, Color::WHITE, AlphaMode::Straight, |o| tri(o, 0.0)));
        assert!(batch.push_with(DrawKind::Stroke, Color::BLACK, AlphaMode::Straight, |o| {
            tri(o, 5.0);
            tri(o, 7.0);
        }));

        let calls = batch.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].kind, DrawKind::Fill);
        assert_eq!(calls[0].vertices, 0..3);
        assert_eq!(calls[1].kind, DrawKind::Stroke);
        assert_eq!(calls[1].vertices, 3..9);
        assert_eq!(calls[1].vertex_count(), 6);
        assert_eq!(batch.call_vertices(&calls[1])[0].pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn bounds_cover_the_call_only() {
        let mut batch = DrawBatch::new();
        batch.push_with(DrawKind::Fill, Color::WHITE, AlphaMode::Straight, |o| tri(o, 0.0));
        batch.push_with(DrawKind::Fill, Color::WHITE, AlphaMode::Straight, |o| tri(o, 10.0));
        assert_eq!(batch.calls()[1].bounds, Rect::new(10.0, 0.0, 1.0, 2.0));
    }

    #[test]
    fn empty_emit_records_nothing() {
        let mut batch = DrawBatch::new();
        assert!(!batch.push_with(DrawKind::Fill, Color::WHITE, AlphaMode::Straight, |_| {}));
        assert!(batch.is_empty());
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut batch = DrawBatch::new();
        batch.push_with(DrawKind::Fill, Color::WHITE, AlphaMode::Straight, |o| tri(o, 0.0));
        batch.clear();
        assert!(batch.is_empty());
        assert!(batch.vertices().is_empty());
    }
}
