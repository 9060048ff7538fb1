//! Paint model: colors and the read-at-use paint state.
//!
//! Scope:
//! - color representation (straight alpha, premultiplied on demand)
//! - stroke/fill style values (width, caps, joins, fill rule, global alpha)
//!
//! Paint is independent of the path: values are read when `fill`/`stroke`
//! is issued, never when points are declared.

mod color;
mod state;

pub use color::Color;
pub use state::{FillRule, LineCap, LineJoin, Paint, PaintState};
