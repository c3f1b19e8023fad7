use crate::coords::Viewport;

/// Surface the effect is composited onto (color view + its global placement).
///
/// The renderer always loads existing contents; it never clears.
pub struct RenderTarget<'a> {
    pub color_view: &'a wgpu::TextureView,
    pub viewport: Viewport,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(color_view: &'a wgpu::TextureView, viewport: Viewport) -> Self {
        Self { color_view, viewport }
    }
}
