use lyon::path::iterator::PathIterator;
use lyon::path::PathEvent;

use crate::coords::Vec2;

use super::{Path, PathCommand};

/// One flattened subpath: a polyline plus its closed flag.
///
/// Consecutive points are at least the merge distance apart, and a closed
/// subpath never repeats its first point at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Subpath {
    /// Twice the signed area (shoelace). Positive for clockwise-on-screen loops.
    pub fn signed_area2(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a.cross(b);
        }
        acc
    }
}

impl Path {
    /// Converts the command list into a lyon path.
    ///
    /// Commands with non-finite coordinates are dropped; a non-finite
    /// `MoveTo` ends the current subpath without starting a new one.
    pub fn to_lyon(&self) -> lyon::path::Path {
        let mut builder = lyon::path::Path::builder();
        let mut open = false;
        for cmd in self.commands() {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    if open {
                        builder.end(false);
                        open = false;
                    }
                    if p.is_finite() {
                        builder.begin(p.into());
                        open = true;
                    }
                }
                PathCommand::LineTo(p) => {
                    if open && p.is_finite() {
                        builder.line_to(p.into());
                    }
                }
                PathCommand::BezierTo(c1, c2, p) => {
                    if open && c1.is_finite() && c2.is_finite() && p.is_finite() {
                        builder.cubic_bezier_to(c1.into(), c2.into(), p.into());
                    }
                }
                PathCommand::Close => {
                    if open {
                        builder.end(true);
                        open = false;
                    }
                }
            }
        }
        if open {
            builder.end(false);
        }
        builder.build()
    }

    /// Flattens every subpath into polylines.
    ///
    /// - `tolerance`: maximum distance between a curve and its polyline
    /// - `merge_distance`: points closer than this to their predecessor are dropped
    ///
    /// An open subpath whose last point coincides with its first is treated as closed.
    pub fn flatten(&self, tolerance: f32, merge_distance: f32) -> Vec<Subpath> {
        let tolerance = if tolerance > 0.0 { tolerance } else { 0.25 };
        let path = self.to_lyon();
        let mut out = Vec::new();
        let mut current: Option<Subpath> = None;

        for event in path.iter().flattened(tolerance) {
            match event {
                PathEvent::Begin { at } => {
                    if let Some(sp) = current.take() {
                        finish(sp, merge_distance, &mut out);
                    }
                    current = Some(Subpath { points: vec![at.into()], closed: false });
                }
                PathEvent::Line { to, .. } => {
                    if let Some(sp) = current.as_mut() {
                        push_point(sp, to.into(), merge_distance);
                    }
                }
                PathEvent::End { close, .. } => {
                    if let Some(mut sp) = current.take() {
                        sp.closed = close;
                        finish(sp, merge_distance, &mut out);
                    }
                }
                // Curves never survive flattening.
                PathEvent::Quadratic { .. } | PathEvent::Cubic { .. } => {}
            }
        }

        if let Some(sp) = current.take() {
            finish(sp, merge_distance, &mut out);
        }
        out
    }
}

fn push_point(sp: &mut Subpath, p: Vec2, merge_distance: f32) {
    if let Some(&last) = sp.points.last() {
        if last.approx_eq(p, merge_distance) {
            return;
        }
    }
    sp.points.push(p);
}

fn finish(mut sp: Subpath, merge_distance: f32, out: &mut Vec<Subpath>) {
    if sp.points.len() > 1 {
        let first = sp.points[0];
        if sp.points[sp.points.len() - 1].approx_eq(first, merge_distance) {
            sp.points.pop();
            sp.closed = true;
        }
    }
    if !sp.points.is_empty() {
        out.push(sp);
    }
}
