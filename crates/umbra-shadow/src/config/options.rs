use super::LightType;
use crate::paint::ColorRgba;

/// Every tunable of the shadow/glow effect.
///
/// Values are taken as-is; negative radii or offsets large enough to invert a
/// rectangle are the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowConfig {
    /// Falloff distance around the projection rect, in pixels.
    pub shadow_radius: i32,
    /// Straight-alpha shadow color.
    pub shadow_color: ColorRgba,
    pub horizontal_offset: i32,
    pub vertical_offset: i32,
    /// Symmetric growth of the projection rect, in percent of the frame size.
    pub overscale: f32,

    pub glow_enabled: bool,
    /// Straight-alpha glow color.
    pub glow_color: ColorRgba,
    /// `1.0` = purely additive glow, `0.0` = alpha-blended glow.
    pub glow_emissivity: f32,
    pub glow_spread: f32,
    pub glow_intensity: f32,
    pub glow_threshold: f32,
    /// How far the glow may reach past the projection rect, in pixels.
    pub glow_radius_limit: i32,

    pub light_type: LightType,
    /// Keep the effect's damage region off the frame itself.
    pub clip_shadow_inside: bool,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            shadow_radius: 40,
            shadow_color: ColorRgba::from_u8(0x00, 0x00, 0x00, 0x70),
            horizontal_offset: 0,
            vertical_offset: 0,
            overscale: 0.0,
            glow_enabled: false,
            glow_color: ColorRgba::from_u8(0x1c, 0x71, 0xd8, 0xff),
            glow_emissivity: 1.0,
            glow_spread: 10.0,
            glow_intensity: 0.6,
            glow_threshold: 0.03,
            glow_radius_limit: 100,
            light_type: LightType::Gaussian,
            clip_shadow_inside: true,
        }
    }
}

impl ShadowConfig {
    /// Glow participates only when switched on and able to produce light.
    #[inline]
    pub fn is_glow_enabled(&self) -> bool {
        self.glow_enabled && self.glow_radius_limit > 0 && self.glow_intensity > 0.0
    }

    /// Glow expansion used by the geometry engine (zero when glow is off).
    #[inline]
    pub fn effective_glow_radius(&self) -> i32 {
        if self.is_glow_enabled() { self.glow_radius_limit } else { 0 }
    }

    /// Classifies what a reload from `old` to `self` requires.
    pub fn changes_since(&self, old: &ShadowConfig) -> ConfigChanges {
        let geometry = self.shadow_radius != old.shadow_radius
            || self.horizontal_offset != old.horizontal_offset
            || self.vertical_offset != old.vertical_offset
            || self.overscale != old.overscale
            || self.glow_enabled != old.glow_enabled
            || self.glow_radius_limit != old.glow_radius_limit
            || self.glow_intensity != old.glow_intensity
            || self.clip_shadow_inside != old.clip_shadow_inside;

        let shaders = self.light_type != old.light_type;

        ConfigChanges {
            geometry,
            shaders,
            repaint: self != old,
        }
    }
}

/// Work implied by a configuration reload.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    /// Rectangles and damage region must be recomputed.
    pub geometry: bool,
    /// Both shader variants must be recompiled.
    pub shaders: bool,
    /// Anything changed at all; the bounding box needs a repaint.
    pub repaint: bool,
}

impl ConfigChanges {
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.geometry || self.shaders || self.repaint)
    }
}
