//! Shape helpers appended to the current path.
//!
//! Each helper lives in its own file as an `impl PathBuilder` block. Closed
//! shapes end with `Close`, so there is no active subpath afterwards.

mod arc;
mod ellipse;
mod rect;

pub use arc::ArcDirection;

/// Control-point offset factor for approximating a quarter circle with one cubic.
pub const KAPPA: f32 = 0.552_284_75;
