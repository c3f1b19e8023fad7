//! Shadow render pipeline.
//!
//! Owns the GPU side of the effect: two programs (plain, glow) and a dither
//! texture. Each draw covers the `outer` rectangle with one quad and relies
//! on scissoring to touch only damaged pixels.
//!
//! Convention:
//! - CPU geometry is in target texels (top-left origin, +Y down).
//! - The vertex stage converts to clip space with an orthographic MVP.
//! - All colors reaching the blend stage are premultiplied.

mod ctx;
mod dither;
mod pipeline;
mod shader;
mod uniforms;

pub use ctx::RenderTarget;
pub use dither::{DitherPattern, DitherTexture, DITHER_SIZE};
pub use pipeline::{PipelineState, ShadowRenderer};
pub use shader::{compile, compile_source, validate, ShaderVariant};
pub use uniforms::{orthographic_projection, DrawParams, QuadVertex, ShadowUniforms};
