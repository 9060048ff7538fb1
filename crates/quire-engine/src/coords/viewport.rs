/// Frame viewport: logical size plus the device pixel ratio.
///
/// Vertices are produced in logical units; the backend maps `[0, width] x [0, height]`
/// to NDC. `pixel_ratio` converts device-pixel tolerances into logical units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self { width, height, pixel_ratio }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.pixel_ratio > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.pixel_ratio.is_finite()
    }

    /// Size of one device pixel in logical units.
    #[inline]
    pub fn device_pixel(self) -> f32 {
        1.0 / self.pixel_ratio
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}
