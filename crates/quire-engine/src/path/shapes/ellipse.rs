use crate::coords::{Transform, Vec2};
use crate::path::{PathBuilder, PathCommand};

use super::KAPPA;

impl PathBuilder {
    /// Appends a closed ellipse made of four cubic arcs.
    ///
    /// Non-positive (or NaN) radii append nothing.
    pub fn ellipse(&mut self, xf: &Transform, center: Vec2, rx: f32, ry: f32) {
        if !(rx > 0.0 && ry > 0.0) || !center.is_finite() {
            log::trace!("degenerate ellipse skipped (rx={rx}, ry={ry})");
            return;
        }

        let (cx, cy) = (center.x, center.y);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        let pt = |x: f32, y: f32| xf.apply(Vec2::new(x, y));

        self.push_raw(PathCommand::MoveTo(pt(cx - rx, cy)));
        self.push_raw(PathCommand::BezierTo(
            pt(cx - rx, cy + ky),
            pt(cx - kx, cy + ry),
            pt(cx, cy + ry),
        ));
        self.push_raw(PathCommand::BezierTo(
            pt(cx + kx, cy + ry),
            pt(cx + rx, cy + ky),
            pt(cx + rx, cy),
        ));
        self.push_raw(PathCommand::BezierTo(
            pt(cx + rx, cy - ky),
            pt(cx + kx, cy - ry),
            pt(cx, cy - ry),
        ));
        self.push_raw(PathCommand::BezierTo(
            pt(cx - kx, cy - ry),
            pt(cx - rx, cy - ky),
            pt(cx - rx, cy),
        ));
        self.push_raw(PathCommand::Close);
    }

    #[inline]
    pub fn circle(&mut self, xf: &Transform, center: Vec2, r: f32) {
        self.ellipse(xf, center, r, r);
    }
}
