use crate::coords::Viewport;
use crate::error::Error;
use crate::paint::Color;
use crate::tess::Vertex;

use super::{AlphaMode, DrawBatch, DrawKind, FrameSubmission, RenderBackend};

/// Parameters fixed at `begin`, valid until `end`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameState {
    pub viewport: Viewport,
    pub alpha_mode: AlphaMode,
}

/// Summary of a submitted frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub fills: usize,
    pub strokes: usize,
    pub draw_calls: usize,
    pub vertices: usize,
}

impl FrameStats {
    fn of(batch: &DrawBatch) -> Self {
        let fills = batch.calls().iter().filter(|c| c.kind == DrawKind::Fill).count();
        Self {
            fills,
            strokes: batch.calls().len() - fills,
            draw_calls: batch.calls().len(),
            vertices: batch.vertices().len(),
        }
    }
}

/// Idle/InFrame state machine owning the frame's draw batch.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    state: Option<FrameState>,
    batch: DrawBatch,
    frames_submitted: u64,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_in_frame(&self) -> bool {
        self.state.is_some()
    }

    #[inline]
    pub fn state(&self) -> Option<&FrameState> {
        self.state.as_ref()
    }

    #[inline]
    pub fn batch(&self) -> &DrawBatch {
        &self.batch
    }

    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Enters `InFrame` with an empty batch.
    ///
    /// An invalid viewport is rejected and leaves the renderer unchanged.
    /// Beginning while already in a frame discards the open batch.
    pub fn begin(&mut self, viewport: Viewport, alpha_mode: AlphaMode) -> Result<(), Error> {
        if !viewport.is_valid() {
            return Err(Error::InvalidFrame {
                width: viewport.width,
                height: viewport.height,
                pixel_ratio: viewport.pixel_ratio,
            });
        }
        if self.state.is_some() {
            log::warn!(
                "begin_frame with a frame open; discarding {} draw calls",
                self.batch.calls().len()
            );
        }
        self.batch.clear();
        self.state = Some(FrameState { viewport, alpha_mode });
        log::debug!(
            "frame {} begin: {}x{} @{} {:?}",
            self.frames_submitted,
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            alpha_mode
        );
        Ok(())
    }

    /// Appends one draw call tagged with the frame's alpha mode.
    ///
    /// Returns whether a call was recorded (`emit` may produce nothing).
    pub fn push<F>(&mut self, kind: DrawKind, color: Color, emit: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut Vec<Vertex>),
    {
        let state = self.state.ok_or(Error::NotInFrame)?;
        Ok(self.batch.push_with(kind, color, state.alpha_mode, emit))
    }

    /// Submits the batch and returns to `Idle`.
    ///
    /// The batch is emptied whether or not the backend accepts it.
    pub fn end<B>(&mut self, backend: &mut B) -> Result<FrameStats, Error>
    where
        B: RenderBackend + ?Sized,
    {
        let state = self.state.take().ok_or(Error::NotInFrame)?;
        let stats = FrameStats::of(&self.batch);

        let result = backend.submit(&FrameSubmission {
            viewport: state.viewport,
            alpha_mode: state.alpha_mode,
            blend: state.alpha_mode.blend_state(),
            vertices: self.batch.vertices(),
            calls: self.batch.calls(),
        });
        self.batch.clear();
        result?;

        self.frames_submitted += 1;
        log::debug!(
            "frame end: {} calls ({} fill, {} stroke), {} vertices",
            stats.draw_calls,
            stats.fills,
            stats.strokes,
            stats.vertices
        );
        Ok(stats)
    }

    /// Drops the open frame without submitting. Returns the number of
    /// discarded draw calls.
    pub fn discard(&mut self) -> usize {
        let dropped = self.batch.calls().len();
        self.batch.clear();
        self.state = None;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::error::BackendError;
    use crate::render::{BlendFactor, RecordingBackend};

    fn tri(out: &mut Vec<Vertex>) {
        out.extend_from_slice(&[
            Vertex::solid(Vec2::new(0.0, 0.0)),
            Vertex::solid(Vec2::new(1.0, 0.0)),
            Vertex::solid(Vec2::new(0.0, 1.0)),
        ]);
    }

    fn viewport() -> Viewport {
        Viewport::new(100.0, 100.0, 1.0)
    }

    #[test]
    fn push_outside_frame_is_rejected() {
        let mut r = FrameRenderer::new();
        assert_eq!(r.push(DrawKind::Fill, Color::WHITE, tri), Err(Error::NotInFrame));
        assert!(r.batch().is_empty());
    }

    #[test]
    fn end_outside_frame_is_rejected() {
        let mut r = FrameRenderer::new();
        let mut backend = RecordingBackend::new();
        assert_eq!(r.end(&mut backend), Err(Error::NotInFrame));
        assert!(backend.frames().is_empty());
    }

    #[test]
    fn invalid_viewport_is_rejected() {
        let mut r = FrameRenderer::new();
        for vp in [
            Viewport::new(0.0, 100.0, 1.0),
            Viewport::new(100.0, -1.0, 1.0),
            Viewport::new(100.0, 100.0, 0.0),
            Viewport::new(f32::NAN, 100.0, 1.0),
        ] {
            assert!(matches!(r.begin(vp, AlphaMode::Straight), Err(Error::InvalidFrame { .. })));
            assert!(!r.is_in_frame());
        }
    }

    #[test]
    fn end_submits_blend_for_mode_and_clears() {
        let mut r = FrameRenderer::new();
        let mut backend = RecordingBackend::new();

        r.begin(viewport(), AlphaMode::Premultiplied).unwrap();
        assert_eq!(r.push(DrawKind::Fill, Color::WHITE, tri), Ok(true));
        assert_eq!(r.push(DrawKind::Stroke, Color::BLACK, tri), Ok(true));
        let stats = r.end(&mut backend).unwrap();

        assert_eq!(stats, FrameStats { fills: 1, strokes: 1, draw_calls: 2, vertices: 6 });
        assert!(!r.is_in_frame());
        assert!(r.batch().is_empty());
        assert_eq!(r.frames_submitted(), 1);

        let frame = backend.last_frame().unwrap();
        assert_eq!(frame.blend.color.src_factor, BlendFactor::One);
        assert!(frame.calls.iter().all(|c| c.alpha_mode == AlphaMode::Premultiplied));
    }

    #[test]
    fn empty_frame_is_still_submitted() {
        let mut r = FrameRenderer::new();
        let mut backend = RecordingBackend::new();
        r.begin(viewport(), AlphaMode::Straight).unwrap();
        assert_eq!(r.end(&mut backend).unwrap(), FrameStats::default());
        assert_eq!(backend.frames().len(), 1);
        assert!(backend.frames()[0].calls.is_empty());
    }

    #[test]
    fn backend_failure_surfaces_and_resets() {
        let mut r = FrameRenderer::new();
        let mut backend = RecordingBackend::new();
        backend.fail_next_submit(BackendError::NoTarget);

        r.begin(viewport(), AlphaMode::Straight).unwrap();
        r.push(DrawKind::Fill, Color::WHITE, tri).unwrap();
        assert_eq!(r.end(&mut backend), Err(Error::Backend(BackendError::NoTarget)));
        assert!(!r.is_in_frame());
        assert!(r.batch().is_empty());
        assert_eq!(r.frames_submitted(), 0);

        r.begin(viewport(), AlphaMode::Straight).unwrap();
        assert!(r.end(&mut backend).is_ok());
    }

    #[test]
    fn begin_clears_a_stale_batch() {
        let mut r = FrameRenderer::new();
        r.begin(viewport(), AlphaMode::Straight).unwrap();
        r.push(DrawKind::Fill, Color::WHITE, tri).unwrap();
        r.begin(viewport(), AlphaMode::Straight).unwrap();
        assert!(r.batch().is_empty());
        assert_eq!(r.discard(), 0);
        assert!(!r.is_in_frame());
    }
}
