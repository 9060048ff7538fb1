use core::f32::consts::{FRAC_PI_2, TAU};

use crate::coords::{Transform, Vec2};
use crate::path::{PathBuilder, PathCommand};

/// Points closer than this are treated as coincident by [`PathBuilder::arc_to`].
const ARC_TO_EPSILON: f32 = 0.01;

/// Tangent distances beyond this mean the corner is effectively straight.
const ARC_TO_MAX_TANGENT: f32 = 10_000.0;

/// Sweep direction for [`PathBuilder::arc`], as seen on screen (+Y down).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ArcDirection {
    /// Increasing angle.
    Clockwise,
    /// Decreasing angle.
    CounterClockwise,
}

impl PathBuilder {
    /// Appends a circular arc from angle `a0` to `a1` (radians) around `center`.
    ///
    /// Connects to the active subpath with a line if there is one, otherwise
    /// starts a new subpath. Sweeps of a full turn or more are clamped to one turn.
    /// The arc is split into at most five cubic pieces.
    pub fn arc(
        &mut self,
        xf: &Transform,
        center: Vec2,
        r: f32,
        a0: f32,
        a1: f32,
        dir: ArcDirection,
    ) {
        if !(r > 0.0) || !center.is_finite() || !a0.is_finite() || !a1.is_finite() {
            log::trace!("degenerate arc skipped (r={r})");
            return;
        }

        let mut da = a1 - a0;
        match dir {
            ArcDirection::Clockwise => {
                if da.abs() >= TAU {
                    da = TAU;
                } else {
                    while da < 0.0 {
                        da += TAU;
                    }
                }
            }
            ArcDirection::CounterClockwise => {
                if da.abs() >= TAU {
                    da = -TAU;
                } else {
                    while da > 0.0 {
                        da -= TAU;
                    }
                }
            }
        }

        let divs = ((da.abs() / FRAC_PI_2 + 0.5) as usize).clamp(1, 5);
        let hda = (da / divs as f32) * 0.5;
        let kappa = (4.0 / 3.0 * (1.0 - hda.cos()) / hda.sin()).abs();
        let kappa = if dir == ArcDirection::CounterClockwise { -kappa } else { kappa };

        let mut prev = Vec2::zero();
        let mut prev_tan = Vec2::zero();
        for i in 0..=divs {
            let a = a0 + da * (i as f32 / divs as f32);
            let (dy, dx) = a.sin_cos();
            let p = center + Vec2::new(dx, dy) * r;
            let tan = Vec2::new(-dy, dx) * (r * kappa);

            if i == 0 {
                let start = xf.apply(p);
                if self.has_active_subpath() {
                    self.push_raw(PathCommand::LineTo(start));
                } else {
                    self.push_raw(PathCommand::MoveTo(start));
                }
            } else {
                self.push_raw(PathCommand::BezierTo(
                    xf.apply(prev + prev_tan),
                    xf.apply(p - tan),
                    xf.apply(p),
                ));
            }
            prev = p;
            prev_tan = tan;
        }
    }

    /// Rounds the corner `current -> p1 -> p2` with an arc of `radius`
    /// tangent to both legs.
    ///
    /// Draws a straight line to `p1` when the corner is degenerate: a point
    /// repeats, the three points are collinear or the radius is tiny. Does
    /// nothing without an active subpath.
    pub fn arc_to(&mut self, xf: &Transform, p1: Vec2, p2: Vec2, radius: f32) {
        let Some(pen) = self.pen() else {
            log::trace!("arc_to without an active subpath ignored");
            return;
        };
        // The pen is in frame units; the corner is specified in user space.
        let Some(p0) = xf.inverse().map(|inv| inv.apply(pen)) else {
            self.line_to(xf, p1);
            return;
        };

        if p0.approx_eq(p1, ARC_TO_EPSILON)
            || p1.approx_eq(p2, ARC_TO_EPSILON)
            || distance_to_segment(p1, p0, p2) < ARC_TO_EPSILON
            || !(radius >= ARC_TO_EPSILON)
        {
            self.line_to(xf, p1);
            return;
        }

        let d0 = (p0 - p1).normalized();
        let d1 = (p2 - p1).normalized();
        let a = d0.dot(d1).clamp(-1.0, 1.0).acos();
        let d = radius / (a * 0.5).tan();
        if !(d <= ARC_TO_MAX_TANGENT) {
            self.line_to(xf, p1);
            return;
        }

        let (center, a0, a1, dir) = if d1.cross(d0) > 0.0 {
            (
                p1 + d0 * d + Vec2::new(d0.y, -d0.x) * radius,
                d0.x.atan2(-d0.y),
                (-d1.x).atan2(d1.y),
                ArcDirection::Clockwise,
            )
        } else {
            (
                p1 + d0 * d + Vec2::new(-d0.y, d0.x) * radius,
                (-d0.x).atan2(d0.y),
                d1.x.atan2(-d1.y),
                ArcDirection::CounterClockwise,
            )
        };
        self.arc(xf, center, radius, a0, a1, dir);
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    let t = if len2 > 0.0 { ((p - a).dot(ab) / len2).clamp(0.0, 1.0) } else { 0.0 };
    p.distance(a + ab * t)
}
