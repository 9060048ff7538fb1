use crate::coords::Transform;

/// Current transform plus the entries pushed by `save`.
///
/// Every operation post-multiplies the current matrix, so the most recently
/// issued operation applies to points first.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &Transform {
        &self.current
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Sets the current transform to identity. Saved entries are kept.
    pub fn reset(&mut self) {
        self.current = Transform::IDENTITY;
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform(Transform::translation(dx, dy));
    }

    pub fn rotate(&mut self, radians: f32) {
        self.transform(Transform::rotation(radians));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform(Transform::scaling(sx, sy));
    }

    pub fn skew_x(&mut self, radians: f32) {
        self.transform(Transform::skew_x(radians));
    }

    pub fn skew_y(&mut self, radians: f32) {
        self.transform(Transform::skew_y(radians));
    }

    /// Composes `t` onto the current transform.
    pub fn transform(&mut self, t: Transform) {
        if !t.is_finite() {
            log::trace!("non-finite transform ignored: {t:?}");
            return;
        }
        self.current = self.current * t;
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pops the last saved transform. Returns `false` when nothing was saved.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(t) => {
                self.current = t;
                true
            }
            None => false,
        }
    }

    /// Identity transform and an empty stack.
    pub fn clear(&mut self) {
        self.current = Transform::IDENTITY;
        self.saved.clear();
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::coords::Vec2;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.approx_eq(b, 1e-4)
    }

    #[test]
    fn translate_then_rotate_rotates_first() {
        let mut s = TransformStack::new();
        s.translate(10.0, 0.0);
        s.rotate(FRAC_PI_2);
        assert!(close(s.current().apply(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 1.0)));
    }

    #[test]
    fn scale_then_translate_scales_the_offset() {
        let mut s = TransformStack::new();
        s.scale(2.0, 3.0);
        s.translate(1.0, 1.0);
        assert!(close(s.current().apply(Vec2::zero()), Vec2::new(2.0, 3.0)));
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut s = TransformStack::new();
        s.translate(5.0, 5.0);
        s.skew_x(0.3);
        s.reset();
        assert_eq!(*s.current(), Transform::IDENTITY);
    }

    #[test]
    fn save_restore_round_trips() {
        let mut s = TransformStack::new();
        s.translate(1.0, 2.0);
        s.save();
        s.rotate(1.0);
        assert!(s.restore());
        assert_eq!(*s.current(), Transform::translation(1.0, 2.0));
        assert!(!s.restore());
        assert_eq!(*s.current(), Transform::translation(1.0, 2.0));
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut s = TransformStack::new();
        s.translate(f32::NAN, 0.0);
        s.scale(f32::INFINITY, 1.0);
        assert_eq!(*s.current(), Transform::IDENTITY);
    }

    #[test]
    fn clear_drops_saved_entries() {
        let mut s = TransformStack::new();
        s.save();
        s.save();
        s.translate(3.0, 0.0);
        s.clear();
        assert_eq!(s.depth(), 0);
        assert_eq!(*s.current(), Transform::IDENTITY);
    }
}
