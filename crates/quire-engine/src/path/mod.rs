//! Path construction and flattening.
//!
//! Responsibilities:
//! - record move/line/curve/close commands in frame units (points are transformed
//!   by the transform current when they are declared)
//! - keep shape helpers isolated per shape file under `path::shapes`
//! - flatten curves into polylines within a chordal tolerance

mod builder;
mod flatten;

pub mod shapes;

pub use builder::{Path, PathBuilder, PathCommand};
pub use flatten::Subpath;
pub use shapes::ArcDirection;
