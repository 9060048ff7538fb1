use thiserror::Error;

/// Errors returned by the drawing API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Frame dimensions or pixel ratio were non-positive or non-finite.
    #[error("invalid frame {width}x{height} at pixel ratio {pixel_ratio}")]
    InvalidFrame {
        width: f32,
        height: f32,
        pixel_ratio: f32,
    },

    /// A frame operation was issued while no frame was open.
    #[error("no frame in progress")]
    NotInFrame,

    /// The backend rejected the frame's batch.
    #[error("backend submission failed: {0}")]
    Backend(#[from] BackendError),
}

/// Failures reported by a [`RenderBackend`](crate::render::RenderBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("no render target bound")]
    NoTarget,

    #[error("vertex data needs {required} bytes, device limit is {limit}")]
    BufferTooLarge { required: u64, limit: u64 },

    #[error("submission rejected: {0}")]
    Rejected(String),
}
