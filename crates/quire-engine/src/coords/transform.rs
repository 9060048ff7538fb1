use core::ops::Mul;

use super::Vec2;

/// 2x3 affine matrix.
///
/// Layout follows the column convention
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
///
/// `lhs * rhs` is the composition that applies `rhs` first, then `lhs`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[inline]
    pub const fn translation(dx: f32, dy: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `radians`; with +Y down, positive angles turn clockwise on screen.
    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    #[inline]
    pub fn skew_x(radians: f32) -> Self {
        Self::new(1.0, 0.0, radians.tan(), 1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn skew_y(radians: f32) -> Self {
        Self::new(1.0, radians.tan(), 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Returns the inverse, or `None` when the matrix is (numerically) singular.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform::new(
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
            (self.c * self.f - self.d * self.e) * inv,
            (self.b * self.e - self.a * self.f) * inv,
        ))
    }

    /// Mean of the lengths of the transformed unit axes.
    ///
    /// Used to scale stroke widths, which are specified before the transform.
    #[inline]
    pub fn average_scale(&self) -> f32 {
        let sx = (self.a * self.a + self.c * self.c).sqrt();
        let sy = (self.b * self.b + self.d * self.d).sqrt();
        (sx + sy) * 0.5
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f].iter().all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    #[inline]
    fn mul(self, r: Transform) -> Transform {
        Transform::new(
            self.a * r.a + self.c * r.b,
            self.b * r.a + self.d * r.b,
            self.a * r.c + self.c * r.d,
            self.b * r.c + self.d * r.d,
            self.a * r.e + self.c * r.f + self.e,
            self.b * r.e + self.d * r.f + self.f,
        )
    }
}
