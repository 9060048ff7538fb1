use crate::coords::{Transform, Vec2, Viewport};
use crate::error::Error;
use crate::paint::{Color, FillRule, LineCap, LineJoin};
use crate::path::{ArcDirection, Subpath};
use crate::render::{DrawBatch, DrawKind, FrameStats, RenderBackend};
use crate::tess::{resolve_stroke_width, FillTessellator, StrokeStyle, Stroker};

use super::Canvas;

/// An open frame. All drawing happens through this guard.
///
/// Finish with [`Frame::end`]. Dropping the guard instead discards everything
/// drawn in the frame.
pub struct Frame<'a, B: RenderBackend> {
    canvas: &'a mut Canvas<B>,
    viewport: Viewport,
}

impl<'a, B: RenderBackend> Frame<'a, B> {
    pub(super) fn new(canvas: &'a mut Canvas<B>, viewport: Viewport) -> Self {
        Self { canvas, viewport }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Geometry recorded so far in this frame.
    #[inline]
    pub fn batch(&self) -> &DrawBatch {
        self.canvas.renderer.batch()
    }

    /// Submits the frame to the backend.
    ///
    /// The batch and the current path are cleared even when the backend fails.
    pub fn end(mut self) -> Result<FrameStats, Error> {
        let canvas = &mut *self.canvas;
        canvas.path.clear();
        canvas.renderer.end(&mut canvas.backend)
    }

    // ── transform ──────────────────────────────────────────────────────────

    pub fn reset_transform(&mut self) {
        self.canvas.transforms.reset();
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.canvas.transforms.translate(dx, dy);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.canvas.transforms.rotate(radians);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.canvas.transforms.scale(sx, sy);
    }

    pub fn skew_x(&mut self, radians: f32) {
        self.canvas.transforms.skew_x(radians);
    }

    pub fn skew_y(&mut self, radians: f32) {
        self.canvas.transforms.skew_y(radians);
    }

    /// Composes the matrix `[a c e; b d f]` onto the current transform.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.canvas.transforms.transform(Transform::new(a, b, c, d, e, f));
    }

    #[inline]
    pub fn current_transform(&self) -> Transform {
        *self.canvas.transforms.current()
    }

    // ── state stack ────────────────────────────────────────────────────────

    /// Pushes the current transform and paint.
    pub fn save(&mut self) {
        let canvas = &mut *self.canvas;
        if canvas.transforms.depth() >= canvas.config.max_states {
            log::warn!("save ignored: state stack full ({} entries)", canvas.config.max_states);
            return;
        }
        canvas.transforms.save();
        canvas.paint.save();
    }

    /// Pops the last saved transform and paint. No-op on an empty stack.
    pub fn restore(&mut self) {
        let canvas = &mut *self.canvas;
        if canvas.transforms.restore() {
            canvas.paint.restore();
        }
    }

    /// Identity transform and default paint. The save stack is untouched.
    pub fn reset(&mut self) {
        self.canvas.transforms.reset();
        self.canvas.paint.reset();
    }

    #[inline]
    pub fn save_depth(&self) -> usize {
        self.canvas.transforms.depth()
    }

    // ── path ───────────────────────────────────────────────────────────────

    /// Discards the current path.
    pub fn begin_path(&mut self) {
        self.canvas.path.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.move_to(canvas.transforms.current(), Vec2::new(x, y));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.line_to(canvas.transforms.current(), Vec2::new(x, y));
    }

    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.bezier_to(
            canvas.transforms.current(),
            Vec2::new(c1x, c1y),
            Vec2::new(c2x, c2y),
            Vec2::new(x, y),
        );
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.quad_to(canvas.transforms.current(), Vec2::new(cx, cy), Vec2::new(x, y));
    }

    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: ArcDirection) {
        let canvas = &mut *self.canvas;
        canvas.path.arc(canvas.transforms.current(), Vec2::new(cx, cy), r, a0, a1, dir);
    }

    /// Rounds the corner from the current point through `(x1, y1)` towards
    /// `(x2, y2)` with an arc of `radius`.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        let canvas = &mut *self.canvas;
        canvas
            .path
            .arc_to(canvas.transforms.current(), Vec2::new(x1, y1), Vec2::new(x2, y2), radius);
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.ellipse(canvas.transforms.current(), Vec2::new(cx, cy), rx, ry);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.circle(canvas.transforms.current(), Vec2::new(cx, cy), r);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.rect(canvas.transforms.current(), x, y, w, h);
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        let canvas = &mut *self.canvas;
        canvas.path.rounded_rect(canvas.transforms.current(), x, y, w, h, r);
    }

    pub fn close_path(&mut self) {
        self.canvas.path.close();
    }

    // ── paint ──────────────────────────────────────────────────────────────

    pub fn fill_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.canvas.paint.set_fill_color(Color::new(r, g, b, a));
    }

    /// Hue in turns (`0..1`), saturation and lightness in `0..1`.
    pub fn fill_color_hsla(&mut self, h: f32, s: f32, l: f32, a: f32) {
        self.canvas.paint.set_fill_color(Color::hsla(h, s, l, a));
    }

    pub fn stroke_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.canvas.paint.set_stroke_color(Color::new(r, g, b, a));
    }

    pub fn stroke_width(&mut self, width: f32) {
        self.canvas.paint.set_stroke_width(width);
    }

    pub fn line_cap(&mut self, cap: LineCap) {
        self.canvas.paint.set_line_cap(cap);
    }

    pub fn line_join(&mut self, join: LineJoin) {
        self.canvas.paint.set_line_join(join);
    }

    pub fn miter_limit(&mut self, limit: f32) {
        self.canvas.paint.set_miter_limit(limit);
    }

    pub fn global_alpha(&mut self, alpha: f32) {
        self.canvas.paint.set_global_alpha(alpha);
    }

    pub fn fill_rule(&mut self, rule: FillRule) {
        self.canvas.paint.set_fill_rule(rule);
    }

    // ── rendering ──────────────────────────────────────────────────────────

    /// Fills the current path with the current fill paint.
    ///
    /// Every subpath is implicitly closed. Returns whether anything was added
    /// to the batch. The path is kept, so it can be stroked afterwards.
    pub fn fill(&mut self) -> bool {
        let Some(subpaths) = self.flatten() else { return false };
        let fringe = self.fringe_width();
        let canvas = &mut *self.canvas;
        let paint = *canvas.paint.current();
        let tess = FillTessellator::new(paint.fill_rule, fringe);

        let pushed = canvas.renderer.push(DrawKind::Fill, paint.effective_fill(), |out| {
            tess.tessellate(&subpaths, out);
        });
        settle(DrawKind::Fill, pushed)
    }

    /// Strokes the current path with the current stroke paint.
    ///
    /// The width is scaled by the current transform; widths under one device
    /// pixel are drawn one pixel wide with proportionally reduced alpha.
    pub fn stroke(&mut self) -> bool {
        let Some(subpaths) = self.flatten() else { return false };
        let device_px = self.viewport.device_pixel();
        let fringe = self.fringe_width();
        let tolerance = self.canvas.config.tessellation_tolerance * device_px;
        let canvas = &mut *self.canvas;
        let paint = *canvas.paint.current();

        let scale = canvas.transforms.current().average_scale();
        let (width, alpha_scale) = resolve_stroke_width(paint.stroke_width, scale, device_px);
        let style = StrokeStyle {
            width,
            cap: paint.line_cap,
            join: paint.line_join,
            miter_limit: paint.miter_limit,
        };
        let color = paint.effective_stroke();
        let color = color.with_alpha(color.a * alpha_scale);
        let stroker = Stroker::new(fringe, tolerance);

        let pushed = canvas.renderer.push(DrawKind::Stroke, color, |out| {
            stroker.stroke(&subpaths, &style, out);
        });
        settle(DrawKind::Stroke, pushed)
    }

    fn fringe_width(&self) -> f32 {
        let config = &self.canvas.config;
        if config.antialias {
            config.fringe_width.max(0.0) * self.viewport.device_pixel()
        } else {
            0.0
        }
    }

    /// Current path as polylines, or `None` when there is nothing to draw.
    fn flatten(&self) -> Option<Vec<Subpath>> {
        let path = self.canvas.path.path();
        if path.is_empty() {
            log::trace!("draw on empty path ignored");
            return None;
        }
        let px = self.viewport.device_pixel();
        let config = &self.canvas.config;
        Some(path.flatten(config.tessellation_tolerance * px, config.distance_tolerance * px))
    }
}

fn settle(kind: DrawKind, pushed: Result<bool, Error>) -> bool {
    match pushed {
        Ok(added) => added,
        Err(err) => {
            log::warn!("{kind:?} dropped: {err}");
            false
        }
    }
}

impl<B: RenderBackend> Drop for Frame<'_, B> {
    fn drop(&mut self) {
        if self.canvas.renderer.is_in_frame() {
            let dropped = self.canvas.renderer.discard();
            self.canvas.path.clear();
            log::warn!("frame dropped without end(); {dropped} draw calls discarded");
        }
    }
}
