//! Quire engine crate.
//!
//! Immediate-mode 2D vector drawing: paths declared under an affine transform
//! are flattened, tessellated into anti-aliased triangle meshes (fill and
//! stroke), batched per frame and handed to a render backend in issue order.
//!
//! ```no_run
//! use quire_engine::{AlphaMode, Canvas, RecordingBackend};
//!
//! let mut canvas = Canvas::new(RecordingBackend::new());
//! let mut frame = canvas.begin_frame(100.0, 100.0, 1.0, AlphaMode::Straight)?;
//! frame.begin_path();
//! frame.ellipse(50.0, 50.0, 10.0, 10.0);
//! frame.fill_color(1.0, 0.0, 0.0, 1.0);
//! frame.fill();
//! frame.end()?;
//! # Ok::<(), quire_engine::Error>(())
//! ```

pub mod canvas;
pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod path;
pub mod render;
pub mod tess;

mod error;

pub use canvas::{Canvas, CanvasConfig, Frame};
pub use error::{BackendError, Error};
pub use paint::{Color, FillRule, LineCap, LineJoin};
pub use path::ArcDirection;
pub use render::{AlphaMode, FrameStats, RecordingBackend, RenderBackend, WgpuBackend};
