use core::f32::consts::TAU;

use lyon::tessellation::{self as lt, BuffersBuilder, FillOptions};

use crate::coords::Vec2;
use crate::paint::FillRule;
use crate::path::Subpath;

use super::fringe::{fringe_loop, fringe_mesh};
use super::mesh::{polyline_path, IndexedMesh, Positions};
use super::{MeshSink, Vertex};

/// Converts closed polylines into an interior mesh plus an outward AA fringe.
///
/// Every subpath is treated as closed. Subpaths with fewer than three points
/// contribute nothing. A single convex subpath is fanned directly; anything
/// else goes through lyon's sweep, which resolves overlaps and
/// self-intersections by the fill rule.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FillTessellator {
    pub rule: FillRule,
    /// Fringe width in frame units; `0` disables anti-aliasing.
    pub fringe_width: f32,
}

impl FillTessellator {
    #[inline]
    pub fn new(rule: FillRule, fringe_width: f32) -> Self {
        Self { rule, fringe_width }
    }

    /// Appends the fill mesh for `subpaths` to `out`. Returns the number of
    /// vertices written.
    pub fn tessellate(&self, subpaths: &[Subpath], out: &mut Vec<Vertex>) -> usize {
        let start = out.len();
        let contours: Vec<&Subpath> = subpaths.iter().filter(|sp| sp.points.len() >= 3).collect();
        if contours.is_empty() {
            log::trace!("fill skipped: no subpath with three points");
            return 0;
        }

        let mut sink = MeshSink::new(out);
        match contours.as_slice() {
            [single] if is_convex(&single.points) => self.convex(&mut sink, single),
            _ => self.sweep(&mut sink, &contours),
        }
        out.len() - start
    }

    /// Fan plus edge-normal fringe; linear in the point count.
    fn convex(&self, sink: &mut MeshSink<'_>, contour: &Subpath) {
        let pts = &contour.points;
        for i in 1..pts.len() - 1 {
            sink.solid_tri(pts[0], pts[i], pts[i + 1]);
        }
        if contour.signed_area2() > 0.0 {
            fringe_loop(sink, pts, self.fringe_width);
        } else {
            let reversed: Vec<Vec2> = pts.iter().rev().copied().collect();
            fringe_loop(sink, &reversed, self.fringe_width);
        }
    }

    fn sweep(&self, sink: &mut MeshSink<'_>, contours: &[&Subpath]) {
        let path = polyline_path(contours.iter().map(|sp| (sp.points.as_slice(), true)));
        let rule = match self.rule {
            FillRule::NonZero => lt::FillRule::NonZero,
            FillRule::EvenOdd => lt::FillRule::EvenOdd,
        };
        let options = FillOptions::default().with_fill_rule(rule);

        let mut mesh = IndexedMesh::new();
        let result = lt::FillTessellator::new().tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut mesh, Positions),
        );
        if let Err(err) = result {
            log::warn!("fill tessellation failed: {err:?}");
            return;
        }

        sink.solid_mesh(&mesh);
        fringe_mesh(sink, &mesh.vertices, &mesh.indices, self.fringe_width);
    }
}

/// True for a simple convex polygon (all turns one way, one full revolution).
fn is_convex(pts: &[Vec2]) -> bool {
    let n = pts.len();
    let mut sign = 0.0f32;
    let mut total_turn = 0.0f32;
    for i in 0..n {
        let d0 = pts[(i + 1) % n] - pts[i];
        let d1 = pts[(i + 2) % n] - pts[(i + 1) % n];
        let cross = d0.cross(d1);
        if cross.abs() > 1e-6 {
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        total_turn += cross.atan2(d0.dot(d1));
    }
    sign != 0.0 && (total_turn.abs() - TAU).abs() < 1e-2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tess::test_util::{fringe_area, fringe_triangles, solid_area, triangle_areas2};

    fn poly(points: &[(f32, f32)]) -> Subpath {
        Subpath {
            points: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            closed: true,
        }
    }

    fn square(x: f32, y: f32, s: f32) -> Subpath {
        poly(&[(x, y), (x + s, y), (x + s, y + s), (x, y + s)])
    }

    fn reversed(mut sp: Subpath) -> Subpath {
        sp.points.reverse();
        sp
    }

    fn tessellate(rule: FillRule, fringe: f32, subpaths: &[Subpath]) -> Vec<Vertex> {
        let mut out = Vec::new();
        FillTessellator::new(rule, fringe).tessellate(subpaths, &mut out);
        out
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-2
    }

    /// Inside by a clear margin; points on an edge do not count.
    fn inside_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
        const M: f32 = 1e-2;
        let s0 = (b - a).cross(p - a);
        let s1 = (c - b).cross(p - b);
        let s2 = (a - c).cross(p - c);
        (s0 > M && s1 > M && s2 > M) || (s0 < -M && s1 < -M && s2 < -M)
    }

    // ── interior ──────────────────────────────────────────────────────────

    #[test]
    fn convex_square_covers_its_area() {
        let vs = tessellate(FillRule::NonZero, 0.0, &[square(0.0, 0.0, 10.0)]);
        assert_eq!(vs.len(), 6);
        assert!(approx(solid_area(&vs), 100.0));
    }

    #[test]
    fn concave_polygon_uses_sweep() {
        // L-shape, area 75.
        let l = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (5.0, 5.0), (5.0, 10.0), (0.0, 10.0)]);
        assert!(!is_convex(&l.points));
        let vs = tessellate(FillRule::NonZero, 0.0, &[l]);
        assert!(approx(solid_area(&vs), 75.0));
    }

    #[test]
    fn concentric_same_direction_depends_on_rule() {
        let shapes = [square(0.0, 0.0, 10.0), square(2.0, 2.0, 6.0)];
        let nz = tessellate(FillRule::NonZero, 0.0, &shapes);
        let eo = tessellate(FillRule::EvenOdd, 0.0, &shapes);
        assert!(approx(solid_area(&nz), 100.0));
        assert!(approx(solid_area(&eo), 64.0));
    }

    #[test]
    fn opposite_direction_inner_is_a_hole_for_non_zero() {
        let shapes = [square(0.0, 0.0, 10.0), reversed(square(2.0, 2.0, 6.0))];
        let vs = tessellate(FillRule::NonZero, 0.0, &shapes);
        assert!(approx(solid_area(&vs), 64.0));
    }

    #[test]
    fn bowtie_resolves_self_intersection() {
        let bowtie = poly(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
        for rule in [FillRule::NonZero, FillRule::EvenOdd] {
            let vs = tessellate(rule, 0.0, &[bowtie.clone()]);
            assert!(approx(solid_area(&vs), 50.0), "{rule:?}");
        }
    }

    #[test]
    fn pentagram_center_depends_on_rule() {
        let pts: Vec<(f32, f32)> = (0..5)
            .map(|i| {
                let a = -core::f32::consts::FRAC_PI_2 + i as f32 * 4.0 * core::f32::consts::PI / 5.0;
                (100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        let star = poly(&pts);
        let nz = solid_area(&tessellate(FillRule::NonZero, 0.0, &[star.clone()]));
        let eo = solid_area(&tessellate(FillRule::EvenOdd, 0.0, &[star]));
        assert!(nz > eo + 1000.0, "nz={nz} eo={eo}");
    }

    #[test]
    fn overlapping_squares_are_not_double_covered() {
        let shapes = [square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)];
        let vs = tessellate(FillRule::NonZero, 0.0, &shapes);
        assert!(approx(solid_area(&vs), 175.0));
    }

    #[test]
    fn short_subpaths_contribute_nothing() {
        let line = poly(&[(0.0, 0.0), (10.0, 10.0)]);
        let mut out = Vec::new();
        let n = FillTessellator::new(FillRule::NonZero, 1.0).tessellate(&[line], &mut out);
        assert_eq!(n, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn no_degenerate_triangles() {
        let shapes = [square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)];
        let vs = tessellate(FillRule::EvenOdd, 1.0, &shapes);
        assert!(triangle_areas2(&vs).iter().all(|a| a.abs() > 1e-7));
    }

    #[test]
    fn convex_contour_is_fanned_with_edge_fringe() {
        let n = 1000;
        let ring: Vec<(f32, f32)> = (0..n)
            .map(|i| {
                let a = i as f32 * TAU / n as f32;
                (100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        let vs = tessellate(FillRule::NonZero, 1.0, &[poly(&ring)]);
        // n - 2 fan triangles and one two-triangle band per edge, nothing else.
        assert_eq!(vs.len(), 3 * ((n - 2) + 2 * n));
        assert_eq!(fringe_triangles(&vs), 2 * n);
    }

    // ── fringe ────────────────────────────────────────────────────────────

    #[test]
    fn square_fringe_is_one_unit_band() {
        for sq in [square(0.0, 0.0, 10.0), reversed(square(0.0, 0.0, 10.0))] {
            let vs = tessellate(FillRule::NonZero, 1.0, &[sq]);
            assert!(approx(solid_area(&vs), 100.0));
            // 12x12 outer minus 10x10 inner.
            assert!(approx(fringe_area(&vs), 44.0));
            for v in vs.iter().filter(|v| v.coverage == 0.0) {
                let p = v.pos;
                assert!(p.x <= -0.99 || p.x >= 10.99 || p.y <= -0.99 || p.y >= 10.99);
            }
        }
    }

    #[test]
    fn interior_edges_get_no_fringe() {
        let same_dir = [square(0.0, 0.0, 10.0), square(2.0, 2.0, 6.0)];
        let nz = tessellate(FillRule::NonZero, 1.0, &same_dir);
        let eo = tessellate(FillRule::EvenOdd, 1.0, &same_dir);
        // Outer square only: 12x12 - 10x10.
        assert!(approx(fringe_area(&nz), 44.0), "{}", fringe_area(&nz));
        // Even-odd makes the inner square a hole: plus 6x6 - 4x4.
        assert!(approx(fringe_area(&eo), 64.0), "{}", fringe_area(&eo));
    }

    #[test]
    fn hole_fringe_points_into_the_hole() {
        let shapes = [square(0.0, 0.0, 10.0), reversed(square(2.0, 2.0, 6.0))];
        let vs = tessellate(FillRule::NonZero, 1.0, &shapes);
        let inner_outer: Vec<Vec2> = vs
            .iter()
            .filter(|v| v.coverage == 0.0)
            .map(|v| v.pos)
            .filter(|p| p.x > 0.0 && p.x < 10.0 && p.y > 0.0 && p.y < 10.0)
            .collect();
        assert!(!inner_outer.is_empty());
        for p in inner_outer {
            assert!(p.x >= 2.99 && p.x <= 7.01 && p.y >= 2.99 && p.y <= 7.01, "{p:?}");
        }
    }

    #[test]
    fn sharp_corner_fringe_has_no_gap() {
        let sliver = poly(&[(0.0, 0.0), (100.0, 0.0), (0.0, 5.0)]);
        let vs = tessellate(FillRule::NonZero, 1.0, &[sliver]);
        // Just beyond the tip, between the two edge bands.
        let beyond = Vec2::new(100.6, 0.03);
        let covered = vs
            .chunks_exact(3)
            .filter(|t| t.iter().any(|v| v.coverage == 0.0))
            .any(|t| {
                let s0 = (t[1].pos - t[0].pos).cross(beyond - t[0].pos);
                let s1 = (t[2].pos - t[1].pos).cross(beyond - t[1].pos);
                let s2 = (t[0].pos - t[2].pos).cross(beyond - t[2].pos);
                (s0 >= 0.0 && s1 >= 0.0 && s2 >= 0.0) || (s0 <= 0.0 && s1 <= 0.0 && s2 <= 0.0)
            });
        assert!(covered);
        // The tip's band never reaches further than the fringe width.
        for v in vs.iter().filter(|v| v.coverage == 0.0 && v.pos.x > 100.0) {
            assert!(v.pos.distance(Vec2::new(100.0, 0.0)) < 1.0 + 1e-4, "{:?}", v.pos);
        }
    }

    #[test]
    fn self_crossing_outline_fringe_stays_outside() {
        let bowtie = poly(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
        let vs = tessellate(FillRule::NonZero, 1.0, &[bowtie]);
        assert!(fringe_triangles(&vs) >= 12);
        let left = [Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(0.0, 10.0)];
        let right = [Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0)];
        for v in vs.iter().filter(|v| v.coverage == 0.0) {
            assert!(!inside_triangle(v.pos, left[0], left[1], left[2]), "{:?}", v.pos);
            assert!(!inside_triangle(v.pos, right[0], right[1], right[2]), "{:?}", v.pos);
        }
    }
}
