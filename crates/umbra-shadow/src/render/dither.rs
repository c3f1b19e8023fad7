use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::device::ContextGuard;

/// Edge length of the square dither pattern, in texels.
pub const DITHER_SIZE: u32 = 32;

/// Random RGBA8 noise used to break up banding in the falloff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DitherPattern {
    texels: Vec<u32>,
}

impl DitherPattern {
    /// Fresh pattern from an OS-seeded generator.
    ///
    /// Called once per renderer, never per frame, so the noise is stable
    /// while the renderer lives.
    pub fn random() -> Self {
        Self::generate(&mut StdRng::from_os_rng())
    }

    /// Fills every texel with a uniformly distributed 32-bit value.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let count = (DITHER_SIZE * DITHER_SIZE) as usize;
        Self {
            texels: (0..count).map(|_| rng.random::<u32>()).collect(),
        }
    }

    #[inline]
    pub fn texels(&self) -> &[u32] {
        &self.texels
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

/// GPU copy of a [`DitherPattern`] plus its nearest/repeat sampler.
pub struct DitherTexture {
    texture: wgpu::Texture,
    pub(super) view: wgpu::TextureView,
    pub(super) sampler: wgpu::Sampler,
}

impl DitherTexture {
    pub fn upload(guard: &mut ContextGuard<'_>, pattern: &DitherPattern) -> Self {
        let size = wgpu::Extent3d {
            width: DITHER_SIZE,
            height: DITHER_SIZE,
            depth_or_array_layers: 1,
        };

        let texture = guard.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("umbra-shadow dither texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        guard.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pattern.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * DITHER_SIZE),
                rows_per_image: Some(DITHER_SIZE),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = guard.device().create_sampler(&wgpu::SamplerDescriptor {
            label: Some("umbra-shadow dither sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }

    /// Frees the GPU memory now instead of waiting for the last reference.
    pub fn destroy(self, _guard: &mut ContextGuard<'_>) {
        self.texture.destroy();
    }
}
