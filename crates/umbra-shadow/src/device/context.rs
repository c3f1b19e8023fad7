use anyhow::{Context, Result};

use super::GpuInit;

/// Owns the wgpu device/queue used for shadow rendering.
///
/// All GPU work goes through [`acquire`](Self::acquire), which hands out a
/// [`ContextGuard`]. The guard borrows the context mutably, so at most one
/// scope is active at a time and nothing can mutate GPU resources outside one.
pub struct GpuContext {
    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Format of the textures the effect is drawn into.
    target_format: wgpu::TextureFormat,
}

impl GpuContext {
    /// Wraps a device/queue owned by the host compositor.
    pub fn from_parts(
        device: wgpu::Device,
        queue: wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        Self { device, queue, target_format }
    }

    /// Creates a context without a presentation surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn headless(init: GpuInit) -> Result<Self> {
        let GpuInit {
            backends,
            power_preference,
            force_fallback_adapter,
            target_format,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        log::debug!("shadow adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("umbra-shadow device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self::from_parts(device, queue, target_format))
    }

    /// Blocking variant of [`headless`](Self::headless).
    pub fn headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::headless(init))
    }

    /// Returns the format pipelines are built for.
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Enters a GPU scope.
    ///
    /// Work recorded through the guard is submitted when it is dropped.
    pub fn acquire(&mut self) -> ContextGuard<'_> {
        log::trace!("entering gpu context");
        ContextGuard { ctx: self, encoder: None }
    }
}

/// An active GPU scope.
///
/// Renderers receive `&mut ContextGuard` for every resource creation,
/// recompile, draw and teardown. Dropping the guard submits any command
/// buffer recorded during the scope, so no recorded work leaks past it.
pub struct ContextGuard<'a> {
    ctx: &'a GpuContext,
    encoder: Option<wgpu::CommandEncoder>,
}

impl<'a> ContextGuard<'a> {
    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.ctx.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.ctx.queue
    }

    #[inline]
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.ctx.target_format
    }

    /// Command encoder for this scope, created on first use.
    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        let ctx = self.ctx;
        self.encoder.get_or_insert_with(|| {
            ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("umbra-shadow scope encoder"),
            })
        })
    }

    /// Submits recorded work now; the scope stays open.
    pub fn flush(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.ctx.queue.submit(std::iter::once(encoder.finish()));
        }
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.flush();
        log::trace!("leaving gpu context");
    }
}
