//! Drawing context: the public immediate-mode API.
//!
//! A [`Canvas`] owns the backend and all persistent drawing state. Drawing
//! happens through the [`Frame`] returned by [`Canvas::begin_frame`]; path,
//! paint and transform calls only exist on that guard.

mod config;
mod context;
mod frame;
mod transform_stack;

pub use config::CanvasConfig;
pub use context::Canvas;
pub use frame::Frame;
pub use transform_stack::TransformStack;
