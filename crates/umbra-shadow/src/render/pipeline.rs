use wgpu::util::DeviceExt;

use crate::config::LightType;
use crate::coords::Rect;
use crate::device::ContextGuard;
use crate::error::{ShadowError, ShadowResult};

use super::dither::{DitherPattern, DitherTexture};
use super::shader::{self, ShaderVariant};
use super::uniforms::{premul_alpha_blend, DrawParams, QuadVertex, ShadowUniforms};
use super::RenderTarget;

const UNIFORM_BYTES: u64 = std::mem::size_of::<ShadowUniforms>() as u64;
const QUAD_BYTES: u64 = std::mem::size_of::<[QuadVertex; 4]>() as u64;

/// Produces the WGSL for one program.
type SourceFn = fn(ShaderVariant) -> String;

/// Lifecycle of a [`ShadowRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PipelineState {
    /// Both programs compiled; draws are issued.
    Ready,
    /// The last recompile failed; draws are skipped until a recompile succeeds.
    Failed,
    /// Resources were released. Terminal.
    Destroyed,
}

/// The two compiled programs for one light model.
struct Programs {
    light: LightType,
    plain: wgpu::RenderPipeline,
    glow: wgpu::RenderPipeline,
}

/// Everything besides the programs; lives from construction to teardown.
struct Resources {
    pipeline_layout: wgpu::PipelineLayout,
    bind_group: wgpu::BindGroup,
    uniform_ubo: wgpu::Buffer,
    quad_vbo: wgpu::Buffer,
    dither: DitherTexture,
}

/// Renders the shadow (and optional glow) of one frame.
///
/// Every method takes the active [`ContextGuard`]; resources are only created,
/// replaced or released inside a GPU scope.
pub struct ShadowRenderer {
    state: PipelineState,
    resources: Option<Resources>,
    programs: Option<Programs>,
    warned_not_ready: bool,
}

impl ShadowRenderer {
    /// Generates the dither texture and compiles both programs.
    ///
    /// A compile failure is fatal: no renderer is returned.
    pub fn new(guard: &mut ContextGuard<'_>, light: LightType) -> ShadowResult<Self> {
        let dither = DitherTexture::upload(guard, &DitherPattern::random());
        let device = guard.device();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra-shadow bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(ShadowUniforms::min_binding_size()),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("umbra-shadow pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("umbra-shadow uniform ubo"),
            size: UNIFORM_BYTES,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("umbra-shadow quad vbo"),
            contents: bytemuck::cast_slice(&QuadVertex::strip(Rect::default())),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("umbra-shadow bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&dither.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&dither.sampler),
                },
            ],
        });

        let programs = build_programs(guard, &pipeline_layout, light, ShaderVariant::source)?;
        log::debug!("shadow pipeline ready ({light})");

        Ok(Self {
            state: PipelineState::Ready,
            resources: Some(Resources {
                pipeline_layout,
                bind_group,
                uniform_ubo,
                quad_vbo,
                dither,
            }),
            programs: Some(programs),
            warned_not_ready: false,
        })
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Light model of the current programs, if any are compiled.
    pub fn light_type(&self) -> Option<LightType> {
        self.programs.as_ref().map(|p| p.light)
    }

    /// Rebuilds both programs for `light`.
    ///
    /// The previous programs are released first. On failure the renderer
    /// stays alive but draws nothing until a later recompile succeeds.
    pub fn recompile(&mut self, guard: &mut ContextGuard<'_>, light: LightType) -> ShadowResult<()> {
        self.recompile_with(guard, light, ShaderVariant::source)
    }

    fn recompile_with(
        &mut self,
        guard: &mut ContextGuard<'_>,
        light: LightType,
        source: SourceFn,
    ) -> ShadowResult<()> {
        let Some(resources) = self.resources.as_ref() else {
            return Err(ShadowError::PipelineDestroyed);
        };

        self.programs = None;

        match build_programs(guard, &resources.pipeline_layout, light, source) {
            Ok(programs) => {
                self.programs = Some(programs);
                self.state = PipelineState::Ready;
                self.warned_not_ready = false;
                log::debug!("shadow programs recompiled ({light})");
                Ok(())
            }
            Err(err) => {
                self.state = PipelineState::Failed;
                Err(err)
            }
        }
    }

    /// Draws the effect clipped to a single damaged rectangle (global space).
    pub fn render(
        &mut self,
        guard: &mut ContextGuard<'_>,
        target: &RenderTarget<'_>,
        params: &DrawParams,
        scissor: Rect,
    ) {
        self.render_damage(guard, target, params, std::iter::once(scissor));
    }

    /// Draws the effect once per damaged rectangle (global space).
    ///
    /// Uniforms and the quad are staged per call and copied into place by the
    /// scope's encoder ahead of the pass, so several calls in one scope each
    /// draw with their own parameters. Each rectangle becomes a scissored draw
    /// in a single pass that loads the existing target contents. Rectangles
    /// outside the target are skipped.
    pub fn render_damage<I>(
        &mut self,
        guard: &mut ContextGuard<'_>,
        target: &RenderTarget<'_>,
        params: &DrawParams,
        damage: I,
    ) where
        I: IntoIterator<Item = Rect>,
    {
        let (Some(resources), Some(programs)) = (self.resources.as_ref(), self.programs.as_ref())
        else {
            if !self.warned_not_ready {
                log::warn!("shadow renderer is {:?}; skipping draw", self.state);
                self.warned_not_ready = true;
            }
            return;
        };

        let scissors: Vec<(u32, u32, u32, u32)> = damage
            .into_iter()
            .filter_map(|rect| target.viewport.scissor_for(rect))
            .collect();

        if scissors.is_empty() {
            log::trace!("shadow draw skipped: no visible damage");
            return;
        }

        let pipeline = if params.use_glow { &programs.glow } else { &programs.plain };
        log::trace!(
            "shadow draw: {} variant, {} scissor(s)",
            if params.use_glow { "glow" } else { "plain" },
            scissors.len()
        );

        let mut staged = Vec::with_capacity((UNIFORM_BYTES + QUAD_BYTES) as usize);
        staged.extend_from_slice(bytemuck::bytes_of(&params.uniforms));
        staged.extend_from_slice(bytemuck::cast_slice(&params.quad));
        let staging = guard.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("umbra-shadow draw staging"),
            contents: &staged,
            usage: wgpu::BufferUsages::COPY_SRC,
        });

        let encoder = guard.encoder();
        encoder.copy_buffer_to_buffer(&staging, 0, &resources.uniform_ubo, 0, UNIFORM_BYTES);
        encoder.copy_buffer_to_buffer(&staging, UNIFORM_BYTES, &resources.quad_vbo, 0, QUAD_BYTES);

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("umbra-shadow pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &resources.bind_group, &[]);
        rpass.set_vertex_buffer(0, resources.quad_vbo.slice(..));

        for (x, y, w, h) in scissors {
            rpass.set_scissor_rect(x, y, w, h);
            rpass.draw(0..4, 0..1);
        }
    }

    /// Releases programs, buffers and the dither texture.
    ///
    /// Runs once; later calls are no-ops.
    pub fn destroy(&mut self, guard: &mut ContextGuard<'_>) {
        if self.state == PipelineState::Destroyed {
            return;
        }

        self.programs = None;
        if let Some(resources) = self.resources.take() {
            resources.uniform_ubo.destroy();
            resources.quad_vbo.destroy();
            resources.dither.destroy(guard);
        }

        self.state = PipelineState::Destroyed;
        log::debug!("shadow pipeline destroyed");
    }
}

impl Drop for ShadowRenderer {
    fn drop(&mut self) {
        if self.state != PipelineState::Destroyed {
            log::debug!("shadow renderer dropped without teardown; wgpu releases resources lazily");
        }
    }
}

fn build_programs(
    guard: &mut ContextGuard<'_>,
    layout: &wgpu::PipelineLayout,
    light: LightType,
    source: SourceFn,
) -> ShadowResult<Programs> {
    Ok(Programs {
        light,
        plain: build_program(guard, layout, ShaderVariant::new(light, false), source)?,
        glow: build_program(guard, layout, ShaderVariant::new(light, true), source)?,
    })
}

fn build_program(
    guard: &mut ContextGuard<'_>,
    layout: &wgpu::PipelineLayout,
    variant: ShaderVariant,
    source: SourceFn,
) -> ShadowResult<wgpu::RenderPipeline> {
    let device = guard.device();
    let module = shader::compile_source(device, variant, source(variant))?;
    let label = format!("umbra-shadow {variant} pipeline");

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: guard.target_format(),
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    }))
}
