use std::sync::mpsc;

use anyhow::{anyhow, Context, Result};

use super::ContextGuard;
use crate::coords::Viewport;

/// Offscreen color target.
///
/// Holds the texture alive for as long as the view is in use.
pub struct OffscreenTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub viewport: Viewport,
}

impl OffscreenTarget {
    /// Creates a `width × height` render attachment in the scope's target format.
    pub fn new(guard: &mut ContextGuard<'_>, width: u32, height: u32) -> Self {
        let texture = guard.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra-shadow offscreen target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: guard.target_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            viewport: Viewport::new(width.max(1), height.max(1)),
        }
    }

    /// Copies the target back to the CPU as tightly packed RGBA rows.
    ///
    /// Submits everything recorded in `guard` so far and blocks until the
    /// copy completes. Only 4-byte-per-texel formats are supported.
    pub fn read_pixels(&self, guard: &mut ContextGuard<'_>) -> Result<Vec<u8>> {
        let Viewport { width, height, .. } = self.viewport;
        let unpadded = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = unpadded.div_ceil(align) * align;

        let readback = guard.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("umbra-shadow readback"),
            size: u64::from(padded) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        guard.encoder().copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        guard.flush();

        let slice = readback.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        guard
            .device()
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed during readback")?;
        receiver
            .recv()
            .map_err(|_| anyhow!("readback map callback never ran"))?
            .context("readback buffer mapping failed")?;

        let mapped = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((unpadded * height) as usize);
        for row in mapped.chunks(padded as usize) {
            pixels.extend_from_slice(&row[..unpadded as usize]);
        }
        drop(mapped);
        readback.unmap();

        Ok(pixels)
    }
}
