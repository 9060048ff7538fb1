/// Straight-alpha RGBA color with components in `[0, 1]`.
///
/// The alpha mode of the frame decides how this is uploaded: straight frames
/// upload it as-is, premultiplied frames upload [`Color::premultiplied`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from straight RGBA bytes (`0`–`255`).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a color from hue, saturation, lightness and alpha.
    ///
    /// `h` is in turns (`0.0..1.0` is one full revolution) and wraps; the other
    /// components are clamped to `[0, 1]`.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let mut h = h % 1.0;
        if h < 0.0 {
            h += 1.0;
        }
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0 * l - m2;

        Self::new(
            hue_channel(h + 1.0 / 3.0, m1, m2).clamp(0.0, 1.0),
            hue_channel(h, m1, m2).clamp(0.0, 1.0),
            hue_channel(h - 1.0 / 3.0, m1, m2).clamp(0.0, 1.0),
            a.clamp(0.0, 1.0),
        )
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Clamps every channel to `[0, 1]`. Non-finite channels become 0.
    #[inline]
    pub fn clamped(self) -> Self {
        let c = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// RGB multiplied by alpha.
    #[inline]
    pub fn premultiplied(self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }
}

fn hue_channel(mut h: f32, m1: f32, m2: f32) -> f32 {
    if h < 0.0 {
        h += 1.0;
    }
    if h > 1.0 {
        h -= 1.0;
    }
    if h < 1.0 / 6.0 {
        m1 + (m2 - m1) * h * 6.0
    } else if h < 3.0 / 6.0 {
        m2
    } else if h < 4.0 / 6.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - h) * 6.0
    } else {
        m1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Color, b: Color) -> bool {
        let (x, y) = (a.to_array(), b.to_array());
        x.iter().zip(y.iter()).all(|(p, q)| (p - q).abs() < 1e-4)
    }

    #[test]
    fn hsla_primaries() {
        assert!(approx(Color::hsla(0.0, 1.0, 0.5, 1.0), Color::new(1.0, 0.0, 0.0, 1.0)));
        assert!(approx(Color::hsla(1.0 / 3.0, 1.0, 0.5, 1.0), Color::new(0.0, 1.0, 0.0, 1.0)));
        assert!(approx(Color::hsla(2.0 / 3.0, 1.0, 0.5, 0.25), Color::new(0.0, 0.0, 1.0, 0.25)));
    }

    #[test]
    fn hsla_hue_wraps() {
        assert!(approx(Color::hsla(1.0, 1.0, 0.5, 1.0), Color::hsla(0.0, 1.0, 0.5, 1.0)));
        assert!(approx(Color::hsla(-2.0 / 3.0, 1.0, 0.5, 1.0), Color::hsla(1.0 / 3.0, 1.0, 0.5, 1.0)));
    }

    #[test]
    fn hsla_zero_saturation_is_gray() {
        assert!(approx(Color::hsla(0.4, 0.0, 0.3, 1.0), Color::new(0.3, 0.3, 0.3, 1.0)));
    }

    #[test]
    fn premultiplied_scales_rgb_only() {
        assert_eq!(Color::new(1.0, 0.5, 0.0, 0.5).premultiplied(), [0.5, 0.25, 0.0, 0.5]);
    }

    #[test]
    fn clamped_handles_out_of_range_and_nan() {
        let c = Color::new(2.0, -1.0, f32::NAN, 0.5).clamped();
        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 0.5));
    }
}
