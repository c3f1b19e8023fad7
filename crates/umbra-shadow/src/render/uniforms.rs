//! CPU-side data uploaded per draw.

use bytemuck::{Pod, Zeroable};

use crate::config::ShadowConfig;
use crate::coords::{Point, Rect, Viewport};
use crate::geometry::GeometrySnapshot;

// ── blend ─────────────────────────────────────────────────────────────────

/// `One, OneMinusSrcAlpha` on color and alpha; correct because every color
/// the shader emits is premultiplied.
pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2], // target texels
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// Four corners of `rect` in triangle-strip order.
    pub fn strip(rect: Rect) -> [QuadVertex; 4] {
        let left = rect.x as f32;
        let right = rect.right() as f32;
        let top = rect.y as f32;
        let bottom = rect.bottom() as f32;
        [
            QuadVertex { pos: [left, bottom] },
            QuadVertex { pos: [right, bottom] },
            QuadVertex { pos: [left, top] },
            QuadVertex { pos: [right, top] },
        ]
    }
}

// ── uniform block ─────────────────────────────────────────────────────────

/// Mirrors `ShadowUniforms` in `shadow_common.wgsl` (144 bytes):
///
///  offset   0  mvp             mat4x4<f32>
///  offset  64  color           vec4<f32>   premultiplied
///  offset  80  glow_color      vec4<f32>   premultiplied, alpha × (1 - emissivity)
///  offset  96  lower           vec2<f32>   shadow projection min
///  offset 104  upper           vec2<f32>   shadow projection max
///  offset 112  glow_lower      vec2<f32>   frame min
///  offset 120  glow_upper      vec2<f32>   frame max
///  offset 128  radius          f32
///  offset 132  glow_spread     f32
///  offset 136  glow_intensity  f32
///  offset 140  glow_threshold  f32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShadowUniforms {
    pub mvp: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub glow_color: [f32; 4],
    pub lower: [f32; 2],
    pub upper: [f32; 2],
    pub glow_lower: [f32; 2],
    pub glow_upper: [f32; 2],
    pub radius: f32,
    pub glow_spread: f32,
    pub glow_intensity: f32,
    pub glow_threshold: f32,
}

impl ShadowUniforms {
    pub(super) fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<ShadowUniforms>() as u64)
            .expect("ShadowUniforms has non-zero size by construction")
    }
}

// ── per-draw parameters ───────────────────────────────────────────────────

/// Everything one draw needs, resolved from config + geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawParams {
    /// Whether the glow program is used.
    pub use_glow: bool,
    pub uniforms: ShadowUniforms,
    /// Quad covering `outer`, in target texels.
    pub quad: [QuadVertex; 4],
}

impl DrawParams {
    /// Resolves a draw of the effect whose frame top-left sits at the global
    /// position `frame_origin`.
    ///
    /// Glow is used only when the caller asks for it (focused frame) and the
    /// config can actually produce glow.
    pub fn new(
        config: &ShadowConfig,
        geometry: &GeometrySnapshot,
        frame_origin: Point,
        viewport: Viewport,
        glow_requested: bool,
    ) -> Self {
        let use_glow = glow_requested && config.is_glow_enabled();
        let origin = frame_origin - viewport.origin;

        let color = config.shadow_color.premultiplied();
        let projection = geometry.shadow_projection + origin;
        let (lower, upper) = bounds(projection);

        let mut uniforms = ShadowUniforms {
            mvp: orthographic_projection(viewport),
            color: color.to_array(),
            glow_color: [0.0; 4],
            lower,
            upper,
            glow_lower: [0.0; 2],
            glow_upper: [0.0; 2],
            radius: config.shadow_radius as f32,
            glow_spread: 0.0,
            glow_intensity: 0.0,
            glow_threshold: 0.0,
        };

        if use_glow {
            let glow = config
                .glow_color
                .premultiplied()
                .with_alpha_scale(1.0 - config.glow_emissivity);
            let (glow_lower, glow_upper) = bounds(geometry.frame + origin);

            uniforms.glow_color = glow.to_array();
            uniforms.glow_lower = glow_lower;
            uniforms.glow_upper = glow_upper;
            uniforms.glow_spread = config.glow_spread;
            uniforms.glow_intensity = config.glow_intensity;
            uniforms.glow_threshold = config.glow_threshold;
        }

        Self {
            use_glow,
            uniforms,
            quad: QuadVertex::strip(geometry.outer + origin),
        }
    }
}

fn bounds(rect: Rect) -> ([f32; 2], [f32; 2]) {
    (
        [rect.x as f32, rect.y as f32],
        [rect.right() as f32, rect.bottom() as f32],
    )
}

/// Column-major orthographic projection mapping target texels
/// (top-left origin, +Y down) to wgpu clip space.
pub fn orthographic_projection(viewport: Viewport) -> [[f32; 4]; 4] {
    let w = viewport.width.max(1) as f32;
    let h = viewport.height.max(1) as f32;
    [
        [2.0 / w, 0.0, 0.0, 0.0],
        [0.0, -2.0 / h, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0, 1.0],
    ]
}
