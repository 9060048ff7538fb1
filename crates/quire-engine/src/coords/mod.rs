//! Coordinate and geometry types shared by the path, tessellation and render layers.
//!
//! Canonical CPU space ("frame units"):
//! - Logical pixels; one device pixel is `1 / pixel_ratio` frame units
//! - Origin top-left
//! - +X right, +Y down
//!
//! Path points are stored in frame units after the current transform is applied.
//! The GPU backend converts to NDC in the vertex shader using a viewport uniform.

mod rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
