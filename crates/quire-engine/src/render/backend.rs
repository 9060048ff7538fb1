use crate::coords::Viewport;
use crate::error::BackendError;
use crate::tess::Vertex;

use super::{AlphaMode, BlendState, DrawCall};

/// Everything a backend needs to draw one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameSubmission<'a> {
    pub viewport: Viewport,
    pub alpha_mode: AlphaMode,
    pub blend: BlendState,
    pub vertices: &'a [Vertex],
    /// Draw calls in the order they must be drawn.
    pub calls: &'a [DrawCall],
}

/// GPU (or other) consumer of finished frames.
///
/// `submit` is called exactly once per `end_frame`, also for frames without
/// draw calls.
pub trait RenderBackend {
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), BackendError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    #[inline]
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), BackendError> {
        (**self).submit(frame)
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    #[inline]
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), BackendError> {
        (**self).submit(frame)
    }
}

/// Owned copy of a submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub viewport: Viewport,
    pub alpha_mode: AlphaMode,
    pub blend: BlendState,
    pub vertices: Vec<Vertex>,
    pub calls: Vec<DrawCall>,
}

impl RecordedFrame {
    fn capture(frame: &FrameSubmission<'_>) -> Self {
        Self {
            viewport: frame.viewport,
            alpha_mode: frame.alpha_mode,
            blend: frame.blend,
            vertices: frame.vertices.to_vec(),
            calls: frame.calls.to_vec(),
        }
    }

    pub fn call_vertices(&self, call: &DrawCall) -> &[Vertex] {
        &self.vertices[call.vertices.start as usize..call.vertices.end as usize]
    }
}

/// Backend that keeps submissions in memory.
///
/// Used for headless runs and for inspecting output in tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    frames: Vec<RecordedFrame>,
    fail_next: Option<BackendError>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    #[inline]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Makes the next `submit` fail with `err` without recording the frame.
    pub fn fail_next_submit(&mut self, err: BackendError) {
        self.fail_next = Some(err);
    }
}

impl RenderBackend for RecordingBackend {
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), BackendError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.frames.push(RecordedFrame::capture(frame));
        Ok(())
    }
}
