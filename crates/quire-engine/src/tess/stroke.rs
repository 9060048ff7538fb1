use lyon::tessellation::{self as lt, BuffersBuilder, StrokeOptions};

use crate::coords::Vec2;
use crate::paint::{LineCap, LineJoin};
use crate::path::Subpath;

use super::fringe::fringe_mesh;
use super::mesh::{polyline_path, IndexedMesh, Positions};
use super::{MeshSink, Vertex};

/// Segments shorter than this are skipped.
const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// Stroke geometry parameters, all in frame units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Round,
            miter_limit: 10.0,
        }
    }
}

/// Converts a user stroke width into a frame-unit width plus an alpha scale.
///
/// `scale` is the average scale of the current transform and `device_px` the
/// size of one device pixel in frame units. Non-positive or non-finite widths
/// become one device pixel at full alpha. Widths thinner than a device pixel
/// are drawn one pixel wide with alpha reduced in proportion.
pub fn resolve_stroke_width(width: f32, scale: f32, device_px: f32) -> (f32, f32) {
    let w = width * scale;
    if !(w > 0.0) || !w.is_finite() {
        return (device_px, 1.0);
    }
    if w < device_px {
        return (device_px, w / device_px);
    }
    (w, 1.0)
}

/// Expands polylines into stroke outlines with joins, caps and AA fringes.
///
/// The outline comes from lyon's stroke tessellator; the fringe is then laid
/// around the boundary of the resulting mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroker {
    /// Fringe width on both outline edges; `0` disables anti-aliasing.
    pub fringe_width: f32,
    /// Maximum chord deviation for round joins and caps.
    pub tolerance: f32,
}

impl Stroker {
    #[inline]
    pub fn new(fringe_width: f32, tolerance: f32) -> Self {
        Self {
            fringe_width,
            tolerance,
        }
    }

    /// Appends the stroke mesh for `subpaths` to `out`. Returns the number of
    /// vertices written.
    ///
    /// `style.width` must already be resolved to frame units (see
    /// [`resolve_stroke_width`]).
    pub fn stroke(&self, subpaths: &[Subpath], style: &StrokeStyle, out: &mut Vec<Vertex>) -> usize {
        let start = out.len();
        if !(style.width > 0.0) || !style.width.is_finite() {
            log::trace!("stroke skipped: width {}", style.width);
            return 0;
        }

        let polylines: Vec<(Vec<Vec2>, bool)> = subpaths.iter().filter_map(strokable).collect();
        if polylines.is_empty() {
            return 0;
        }
        let path = polyline_path(polylines.iter().map(|(pts, closed)| (pts.as_slice(), *closed)));

        let mut mesh = IndexedMesh::new();
        let result = lt::StrokeTessellator::new().tessellate_path(
            &path,
            &self.options(style),
            &mut BuffersBuilder::new(&mut mesh, Positions),
        );
        if let Err(err) = result {
            log::warn!("stroke tessellation failed: {err:?}");
            return 0;
        }

        let mut sink = MeshSink::new(out);
        sink.solid_mesh(&mesh);
        fringe_mesh(&mut sink, &mesh.vertices, &mesh.indices, self.fringe_width);
        out.len() - start
    }

    fn options(&self, style: &StrokeStyle) -> StrokeOptions {
        let cap = match style.cap {
            LineCap::Butt => lt::LineCap::Butt,
            LineCap::Square => lt::LineCap::Square,
            LineCap::Round => lt::LineCap::Round,
        };
        let join = match style.join {
            LineJoin::Miter => lt::LineJoin::Miter,
            LineJoin::Bevel => lt::LineJoin::Bevel,
            LineJoin::Round => lt::LineJoin::Round,
        };
        let tolerance = if self.tolerance > 0.0 { self.tolerance } else { 0.25 };
        StrokeOptions::default()
            .with_line_width(style.width)
            .with_line_cap(cap)
            .with_line_join(join)
            .with_miter_limit(style.miter_limit.max(StrokeOptions::MINIMUM_MITER_LIMIT))
            .with_tolerance(tolerance)
    }
}

/// Drops zero-length segments. Returns `None` when nothing is left to stroke.
fn strokable(sp: &Subpath) -> Option<(Vec<Vec2>, bool)> {
    let mut pts: Vec<Vec2> = Vec::with_capacity(sp.points.len());
    for &p in &sp.points {
        if pts.last().is_some_and(|&last| last.distance(p) <= MIN_SEGMENT_LENGTH) {
            continue;
        }
        pts.push(p);
    }
    let mut closed = sp.closed;
    if closed && pts.len() > 1 && pts[0].distance(pts[pts.len() - 1]) <= MIN_SEGMENT_LENGTH {
        pts.pop();
    }
    if pts.len() < 2 {
        return None;
    }
    if pts.len() < 3 {
        closed = false;
    }
    Some((pts, closed))
}
