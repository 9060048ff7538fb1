/// Tessellation and state limits. Distances are in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Emit anti-aliasing fringes for fills and strokes.
    pub antialias: bool,

    /// Maximum distance between a curve and its flattened polyline.
    pub tessellation_tolerance: f32,

    /// Points closer than this to their predecessor are merged.
    pub distance_tolerance: f32,

    /// Width of the anti-aliasing fringe.
    pub fringe_width: f32,

    /// Maximum `save` depth; deeper saves are ignored.
    pub max_states: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            tessellation_tolerance: 0.25,
            distance_tolerance: 0.01,
            fringe_width: 1.0,
            max_states: 32,
        }
    }
}
