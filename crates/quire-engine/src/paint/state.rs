use super::Color;

/// How the open ends of a stroked subpath are finished.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineCap {
    /// Flat end exactly at the endpoint.
    #[default]
    Butt,
    /// Semicircle of radius `width / 2` centered on the endpoint.
    Round,
    /// Flat end extended by `width / 2` past the endpoint.
    Square,
}

/// How consecutive stroked segments are connected.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    /// Sharp corner; falls back to bevel past the miter limit.
    Miter,
}

/// Rule deciding which regions of a (possibly self-overlapping) path are inside.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

/// Snapshot of every paint value read by `fill` / `stroke`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Paint {
    pub fill_color: Color,
    pub stroke_color: Color,
    /// Stroke width before the transform scale is applied.
    pub stroke_width: f32,
    pub miter_limit: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub fill_rule: FillRule,
    pub global_alpha: f32,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill_color: Color::WHITE,
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            miter_limit: 10.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            fill_rule: FillRule::NonZero,
            global_alpha: 1.0,
        }
    }
}

impl Paint {
    /// Fill color with the global alpha folded in.
    #[inline]
    pub fn effective_fill(&self) -> Color {
        let c = self.fill_color;
        c.with_alpha(c.a * self.global_alpha)
    }

    /// Stroke color with the global alpha folded in.
    #[inline]
    pub fn effective_stroke(&self) -> Color {
        let c = self.stroke_color;
        c.with_alpha(c.a * self.global_alpha)
    }
}

/// Current paint plus the values saved by `save`.
///
/// Values persist across `begin_path` and across frames; only explicit setters,
/// `restore` and `reset` change them.
#[derive(Debug, Clone, Default)]
pub struct PaintState {
    current: Paint,
    saved: Vec<Paint>,
}

impl PaintState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &Paint {
        &self.current
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.current.fill_color = color.clamped();
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.current.stroke_color = color.clamped();
    }

    /// Stores the width as given; clamping happens when the stroke is built so
    /// the transform scale in effect at that time is honored.
    pub fn set_stroke_width(&mut self, width: f32) {
        self.current.stroke_width = if width.is_finite() { width } else { 0.0 };
    }

    pub fn set_miter_limit(&mut self, limit: f32) {
        self.current.miter_limit = if limit.is_finite() { limit.max(0.0) } else { 0.0 };
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.current.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.current.line_join = join;
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.current.fill_rule = rule;
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.current.global_alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pops the last saved paint. Returns `false` (and changes nothing) when
    /// nothing was saved.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(p) => {
                self.current = p;
                true
            }
            None => false,
        }
    }

    /// Restores default paint values. Saved entries are kept.
    pub fn reset(&mut self) {
        self.current = Paint::default();
    }

    /// Forgets saved entries while keeping the current values.
    pub(crate) fn clear_saved(&mut self) {
        self.saved.clear();
    }
}
