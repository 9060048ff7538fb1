//! Draw batching, blend selection and backends.
//!
//! Convention:
//! - vertices are in frame units (logical px, top-left origin, +Y down)
//! - one batch per frame; draw calls keep the order `fill`/`stroke` were issued
//! - backends map `[0, width] x [0, height]` to NDC with a viewport uniform

mod backend;
mod batch;
mod blend;
mod frame;
pub mod gpu;

pub use backend::{FrameSubmission, RecordedFrame, RecordingBackend, RenderBackend};
pub use batch::{DrawBatch, DrawCall, DrawKind};
pub use blend::{AlphaMode, BlendComponent, BlendFactor, BlendState};
pub use frame::{FrameRenderer, FrameState, FrameStats};
pub use gpu::WgpuBackend;
