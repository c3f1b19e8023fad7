//! WGSL composition and compile-time validation for the shadow programs.
//!
//! Every program pairs the same vertex stage with a fragment stage built from
//! the light model and a glow on/off switch. Sources are validated with naga
//! before they reach wgpu so a broken variant surfaces as a [`ShadowError`]
//! instead of an uncaptured device error.

use core::fmt;

use crate::config::LightType;
use crate::error::{ShadowError, ShadowResult};

const COMMON: &str = include_str!("shaders/shadow_common.wgsl");
const FRAGMENT: &str = include_str!("shaders/shadow_fragment.wgsl");
const GLOW_ON: &str = include_str!("shaders/glow_on.wgsl");
const GLOW_OFF: &str = include_str!("shaders/glow_off.wgsl");

/// Identifies one compiled program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderVariant {
    pub light: LightType,
    pub glow: bool,
}

impl ShaderVariant {
    #[inline]
    pub const fn new(light: LightType, glow: bool) -> Self {
        Self { light, glow }
    }

    /// Full WGSL module: shared vertex stage, falloff, glow term, fragment entry.
    pub fn source(self) -> String {
        let light = match self.light {
            LightType::Linear => include_str!("shaders/light_linear.wgsl"),
            LightType::Gaussian => include_str!("shaders/light_gaussian.wgsl"),
            LightType::Circular => include_str!("shaders/light_circular.wgsl"),
            LightType::Box => include_str!("shaders/light_box.wgsl"),
        };
        let glow = if self.glow { GLOW_ON } else { GLOW_OFF };

        [COMMON, light, glow, FRAGMENT].join("\n")
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.glow {
            write!(f, "{}+glow", self.light)
        } else {
            write!(f, "{}", self.light)
        }
    }
}

/// Parses and validates `source`, mapping failures to the variant that
/// produced them.
pub fn validate(variant: ShaderVariant, source: &str) -> ShadowResult<()> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShadowError::ShaderParse {
        variant,
        message: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| ShadowError::ShaderValidation {
        variant,
        message: e.as_inner().to_string(),
    })?;

    Ok(())
}

/// Composes and validates the variant, then creates the wgpu shader module.
pub fn compile(device: &wgpu::Device, variant: ShaderVariant) -> ShadowResult<wgpu::ShaderModule> {
    compile_source(device, variant, variant.source())
}

/// Validates `source` for `variant` and creates the wgpu shader module.
pub fn compile_source(
    device: &wgpu::Device,
    variant: ShaderVariant,
    source: String,
) -> ShadowResult<wgpu::ShaderModule> {
    if let Err(err) = validate(variant, &source) {
        log::error!("{err}");
        return Err(err);
    }

    let label = format!("umbra-shadow {variant} shader");
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}
