use std::num::NonZeroU64;

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::render::{QuadTexture, RenderCtx, RenderTarget, SamplerState};

use super::vertex::{ProjectionUniform, QuadVertex, QUAD_VERTICES};
use super::{
    FS_ENTRY, PROJECTION_BINDING, PROJECTION_GROUP, QUAD_WGSL, SAMPLER_BINDING, TEXTURE_BINDING,
    TEXTURE_GROUP, VS_ENTRY,
};

/// Draws one textured quad with `quad.wgsl`.
///
/// The quad covers clip space before projection; callers pass a projection
/// (for example [`super::aspect_fit`]) to place it. GPU objects are created
/// lazily and rebuilt when the surface format changes.
#[derive(Default)]
pub struct QuadRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    projection_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,

    projection_ubo: Option<wgpu::Buffer>,
    projection_bind_group: Option<wgpu::BindGroup>,

    sampler_state: SamplerState,
    sampler: Option<wgpu::Sampler>,

    texture_view: Option<wgpu::TextureView>,
    texture_size: Option<(u32, u32)>,
    texture_bind_group: Option<wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,

    warned_no_texture: bool,
}

impl QuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sampler(sampler_state: SamplerState) -> Self {
        Self {
            sampler_state,
            ..Self::default()
        }
    }

    /// Binds `texture` for subsequent draws.
    pub fn set_texture(&mut self, texture: &QuadTexture) {
        self.texture_view = Some(texture.view().clone());
        self.texture_size = Some(texture.size());
        self.texture_bind_group = None;
    }

    /// Size of the bound texture in texels.
    pub fn texture_size(&self) -> Option<(u32, u32)> {
        self.texture_size
    }

    pub fn sampler_state(&self) -> SamplerState {
        self.sampler_state
    }

    /// Switches sampler state; the sampler is recreated on the next draw.
    pub fn set_sampler(&mut self, state: SamplerState) {
        if state == self.sampler_state {
            return;
        }
        log::debug!("QuadRenderer: sampler {:?} -> {state:?}", self.sampler_state);
        self.sampler_state = state;
        self.sampler = None;
        self.texture_bind_group = None;
    }

    /// Records the quad draw into `target`, loading existing contents.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, projection: &Mat4) {
        if self.texture_view.is_none() {
            if !self.warned_no_texture {
                log::debug!("QuadRenderer: no texture bound; skipping draw");
                self.warned_no_texture = true;
            }
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_projection_binding(ctx);
        self.ensure_sampler(ctx);
        self.ensure_texture_binding(ctx);

        if let Some(ubo) = self.projection_ubo.as_ref() {
            ctx.queue
                .write_buffer(ubo, 0, bytemuck::bytes_of(&ProjectionUniform::from(*projection)));
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(projection_bg) = self.projection_bind_group.as_ref() else { return };
        let Some(texture_bg) = self.texture_bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen quad pass"),
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
        rpass.set_bind_group(PROJECTION_GROUP, projection_bg, &[]);
        rpass.set_bind_group(TEXTURE_GROUP, texture_bg, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen quad shader"),
            source: wgpu::ShaderSource::Wgsl(QUAD_WGSL.into()),
        });

        let projection_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen quad projection bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: PROJECTION_BINDING,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<ProjectionUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen quad texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: TEXTURE_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: SAMPLER_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen quad pipeline layout"),
            bind_group_layouts: &[&projection_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen quad pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VS_ENTRY),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            // Opaque: the sampled color is written as-is.
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FS_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
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
        });

        log::debug!("QuadRenderer: pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.projection_bgl = Some(projection_bgl);
        self.texture_bgl = Some(texture_bgl);

        // Bind groups reference the old layouts.
        self.projection_bind_group = None;
        self.projection_ubo = None;
        self.texture_bind_group = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn ensure_projection_binding(&mut self, ctx: &RenderCtx<'_>) {
        if self.projection_bind_group.is_some() && self.projection_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.projection_bgl.as_ref() else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen quad projection ubo"),
            size: std::mem::size_of::<ProjectionUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen quad projection bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: PROJECTION_BINDING,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.projection_ubo = Some(ubo);
        self.projection_bind_group = Some(bind_group);
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(
            ctx.device
                .create_sampler(&self.sampler_state.to_wgpu(Some("lumen quad sampler"))),
        );
        self.texture_bind_group = None;
    }

    fn ensure_texture_binding(&mut self, ctx: &RenderCtx<'_>) {
        if self.texture_bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.texture_bgl.as_ref() else { return };
        let Some(view) = self.texture_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        self.texture_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen quad texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
    }
}
