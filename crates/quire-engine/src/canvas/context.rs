use crate::coords::Viewport;
use crate::error::Error;
use crate::paint::{Paint, PaintState};
use crate::path::PathBuilder;
use crate::render::{AlphaMode, FrameRenderer, RenderBackend};

use super::{CanvasConfig, Frame, TransformStack};

/// Immediate-mode drawing context bound to one backend.
///
/// Paint values set during a frame persist into later frames. The transform,
/// the save stack and the path are reset by every `begin_frame`.
pub struct Canvas<B: RenderBackend> {
    pub(super) backend: B,
    pub(super) config: CanvasConfig,
    pub(super) transforms: TransformStack,
    pub(super) path: PathBuilder,
    pub(super) paint: PaintState,
    pub(super) renderer: FrameRenderer,
}

impl<B: RenderBackend> Canvas<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, CanvasConfig::default())
    }

    pub fn with_config(backend: B, config: CanvasConfig) -> Self {
        Self {
            backend,
            config,
            transforms: TransformStack::new(),
            path: PathBuilder::new(),
            paint: PaintState::new(),
            renderer: FrameRenderer::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Paint values that the next frame starts with.
    #[inline]
    pub fn paint(&self) -> &Paint {
        self.paint.current()
    }

    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.renderer.frames_submitted()
    }

    /// Opens a frame of `width x height` logical pixels.
    ///
    /// Resets the transform to identity, empties the save stack and discards
    /// any path left from the previous frame. Non-positive or non-finite
    /// arguments are rejected with [`Error::InvalidFrame`].
    pub fn begin_frame(
        &mut self,
        width: f32,
        height: f32,
        pixel_ratio: f32,
        alpha_mode: AlphaMode,
    ) -> Result<Frame<'_, B>, Error> {
        let viewport = Viewport::new(width, height, pixel_ratio);
        self.renderer.begin(viewport, alpha_mode)?;
        self.transforms.clear();
        self.paint.clear_saved();
        self.path.clear();
        Ok(Frame::new(self, viewport))
    }
}
