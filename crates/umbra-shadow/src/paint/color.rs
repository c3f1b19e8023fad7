use core::str::FromStr;

use crate::error::ShadowError;

/// Straight-alpha RGBA color, components in `[0, 1]`.
///
/// This is the representation used by configuration options. Values are not
/// validated; out-of-range components pass through to the shader unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Premultiplies the color: `(r·a, g·a, b·a, a)`.
    #[inline]
    pub fn premultiplied(self) -> PremulColor {
        PremulColor {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

/// Parses `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
impl FromStr for ColorRgba {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(ShadowError::InvalidColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ShadowError::InvalidColor(s.to_string()))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self::from_u8(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// Premultiplied RGBA color, as uploaded to the shader.
///
/// Invariant (for colors built by [`ColorRgba::premultiplied`]):
/// - `rgb` components are multiplied by the *original* alpha.
///
/// [`with_alpha_scale`](Self::with_alpha_scale) deliberately breaks the
/// `rgb <= a` relation to obtain additive blending.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PremulColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl PremulColor {
    /// Scales only the alpha channel.
    ///
    /// With `One, OneMinusSrcAlpha` blending an alpha of zero turns the draw
    /// into a pure add of `rgb`, an unscaled alpha is normal "over" blending.
    #[inline]
    pub fn with_alpha_scale(self, scale: f32) -> Self {
        Self { a: self.a * scale, ..self }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
