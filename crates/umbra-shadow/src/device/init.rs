/// Initialization parameters for a headless GPU context.
///
/// Keep this structure minimal. Add flags only when a concrete backend
/// requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the adapter may come from.
    pub backends: wgpu::Backends,

    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Allow a software adapter (useful on CI machines without a GPU).
    pub force_fallback_adapter: bool,

    /// Format of the textures the shadow will be composited into.
    ///
    /// Pipelines are built for exactly this format.
    pub target_format: wgpu::TextureFormat,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            target_format: wgpu::TextureFormat::Rgba8Unorm,
            required_limits: wgpu::Limits::downlevel_defaults(),
        }
    }
}
