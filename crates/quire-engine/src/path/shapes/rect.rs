use crate::coords::{Transform, Vec2};
use crate::path::{PathBuilder, PathCommand};

use super::KAPPA;

impl PathBuilder {
    /// Appends a closed axis-aligned (in local space) rectangle.
    pub fn rect(&mut self, xf: &Transform, x: f32, y: f32, w: f32, h: f32) {
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return;
        }
        let pt = |px: f32, py: f32| xf.apply(Vec2::new(px, py));
        self.push_raw(PathCommand::MoveTo(pt(x, y)));
        self.push_raw(PathCommand::LineTo(pt(x, y + h)));
        self.push_raw(PathCommand::LineTo(pt(x + w, y + h)));
        self.push_raw(PathCommand::LineTo(pt(x + w, y)));
        self.push_raw(PathCommand::Close);
    }

    /// Appends a closed rectangle with uniformly rounded corners.
    ///
    /// The radius is clamped to half the shorter side; radii below 0.1 fall back
    /// to a plain rectangle.
    pub fn rounded_rect(&mut self, xf: &Transform, x: f32, y: f32, w: f32, h: f32, r: f32) {
        if !(r >= 0.1) {
            self.rect(xf, x, y, w, h);
            return;
        }
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return;
        }

        let rx = r.min(w.abs() * 0.5) * w.signum();
        let ry = r.min(h.abs() * 0.5) * h.signum();
        let (ox, oy) = (rx * (1.0 - KAPPA), ry * (1.0 - KAPPA));
        let pt = |px: f32, py: f32| xf.apply(Vec2::new(px, py));

        self.push_raw(PathCommand::MoveTo(pt(x, y + ry)));
        self.push_raw(PathCommand::LineTo(pt(x, y + h - ry)));
        self.push_raw(PathCommand::BezierTo(
            pt(x, y + h - oy),
            pt(x + ox, y + h),
            pt(x + rx, y + h),
        ));
        self.push_raw(PathCommand::LineTo(pt(x + w - rx, y + h)));
        self.push_raw(PathCommand::BezierTo(
            pt(x + w - ox, y + h),
            pt(x + w, y + h - oy),
            pt(x + w, y + h - ry),
        ));
        self.push_raw(PathCommand::LineTo(pt(x + w, y + ry)));
        self.push_raw(PathCommand::BezierTo(
            pt(x + w, y + oy),
            pt(x + w - ox, y),
            pt(x + w - rx, y),
        ));
        self.push_raw(PathCommand::LineTo(pt(x + rx, y)));
        self.push_raw(PathCommand::BezierTo(pt(x + ox, y), pt(x, y + oy), pt(x, y + ry)));
        self.push_raw(PathCommand::Close);
    }
}
