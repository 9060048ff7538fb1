use crate::paint::Color;

/// How output colors relate to their alpha. Chosen once per frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AlphaMode {
    /// Color channels are not multiplied by alpha.
    #[default]
    Straight,
    /// Color channels are multiplied by alpha before blending.
    Premultiplied,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// `result = src * src_factor + dst * dst_factor`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendComponent {
    pub src_factor: BlendFactor,
    pub dst_factor: BlendFactor,
}

/// Blend equation pair handed to the backend with every frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendState {
    pub color: BlendComponent,
    pub alpha: BlendComponent,
}

const SOURCE_OVER_ALPHA: BlendComponent = BlendComponent {
    src_factor: BlendFactor::One,
    dst_factor: BlendFactor::OneMinusSrcAlpha,
};

impl AlphaMode {
    /// Source-over blending for this mode.
    ///
    /// The alpha channel always uses `(One, OneMinusSrcAlpha)`; only the color
    /// source factor differs.
    pub const fn blend_state(self) -> BlendState {
        let src_factor = match self {
            AlphaMode::Straight => BlendFactor::SrcAlpha,
            AlphaMode::Premultiplied => BlendFactor::One,
        };
        BlendState {
            color: BlendComponent {
                src_factor,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
            },
            alpha: SOURCE_OVER_ALPHA,
        }
    }

    /// Output color of a vertex: paint color with alpha scaled by the fringe
    /// coverage, premultiplied when the mode asks for it.
    #[inline]
    pub fn vertex_color(self, color: Color, coverage: f32) -> [f32; 4] {
        let c = color.with_alpha(color.a * coverage.clamp(0.0, 1.0));
        match self {
            AlphaMode::Straight => c.to_array(),
            AlphaMode::Premultiplied => c.premultiplied(),
        }
    }
}
