use core::fmt;
use core::str::FromStr;

use crate::error::ShadowError;

/// Falloff model used by the fragment stage.
///
/// Changing it requires recompiling both shader variants.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum LightType {
    /// Linear ramp from the projection edge to `radius`.
    Linear,
    /// Gaussian-blurred box (closed form via `erf`).
    #[default]
    Gaussian,
    /// Quarter-circle ramp.
    Circular,
    /// Box-blurred box.
    Box,
}

impl LightType {
    pub const ALL: [LightType; 4] = [
        LightType::Linear,
        LightType::Gaussian,
        LightType::Circular,
        LightType::Box,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LightType::Linear => "linear",
            LightType::Gaussian => "gaussian",
            LightType::Circular => "circular",
            LightType::Box => "box",
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightType {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LightType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ShadowError::InvalidLightType(s.to_string()))
    }
}
