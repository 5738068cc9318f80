use std::ops::Range;

use anyhow::Result;

use crate::paint::color::{linear_to_srgb, srgb_to_linear};
use crate::paint::{Color, Paint, TextureId};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    create_viewport_ubo, premul_alpha_blend, triangle_list_primitive, viewport_ubo_entry,
    PipelineKey, ViewportUniform,
};
use super::tessellate::{self, Mesh, PolygonVertex};

/// Texture registered on the CPU side; uploaded on first use.
struct TextureSlot {
    label: String,
    width: u32,
    height: u32,
    pending: Option<Vec<u8>>,
    texture: Option<wgpu::Texture>,
    bind_group: Option<wgpu::BindGroup>,
}

/// Contiguous index range drawn with one texture binding.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    /// `None` binds the 1×1 white texture (solid fills and strokes).
    texture: Option<TextureId>,
    indices: Range<u32>,
}

/// Renderer for `DrawCmd::Polygon`.
///
/// Fills are triangulated with earcut and either flat-colored or textured
/// with the image stretched over the polygon's bounding box. Borders are
/// stroked on top of the fill, centered on the path.
///
/// Textures are handed over as RGBA8 bytes via [`PolygonRenderer::add_texture`]
/// before any GPU context exists and are uploaded lazily during the first
/// frame that uses them.
#[derive(Default)]
pub struct PolygonRenderer {
    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    viewport_layout: Option<wgpu::BindGroupLayout>,
    texture_layout: Option<wgpu::BindGroupLayout>,

    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,

    textures: Vec<TextureSlot>,
    white: Option<TextureSlot>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,

    mesh: Mesh,
    batches: Vec<Batch>,
    warned_unknown_texture: bool,
}

impl PolygonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an RGBA8 (straight alpha, sRGB) image for use with `Paint::Texture`.
    pub fn add_texture(
        &mut self,
        label: impl Into<String>,
        width: u32,
        height: u32,
        mut rgba: Vec<u8>,
    ) -> Result<TextureId> {
        let label = label.into();
        anyhow::ensure!(width > 0 && height > 0, "texture {label} has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            rgba.len() == expected,
            "texture {label}: expected {expected} bytes for {width}x{height}, got {}",
            rgba.len()
        );

        premultiply(&mut rgba);
        let id = TextureId(self.textures.len() as u32);
        log::debug!("registered texture {label} ({width}x{height}) as {id:?}");
        self.textures.push(TextureSlot::new(label, width, height, rgba));
        Ok(id)
    }

    /// Renders all polygons in `draw_list` into `target`, in paint order.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        self.build_mesh(draw_list);
        if self.batches.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_textures(ctx);
        self.write_viewport_uniform(ctx);
        self.ensure_buffer_capacity(ctx);

        let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.mesh.vertices));
        ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&self.mesh.indices));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(viewport_bg) = self.viewport_bind_group.as_ref() else { return };

        let attachment = target.load_attachment();
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mosaic polygon pass"),
            color_attachments: &[Some(attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bg, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

        for batch in &self.batches {
            let slot = match batch.texture {
                Some(id) => self.textures.get(id.index()),
                None => self.white.as_ref(),
            };
            let Some(bind_group) = slot.and_then(|s| s.bind_group.as_ref()) else { continue };
            rpass.set_bind_group(1, bind_group, &[]);
            rpass.draw_indexed(batch.indices.clone(), 0, 0..1);
        }
    }

    fn build_mesh(&mut self, draw_list: &mut DrawList) {
        self.mesh.clear();
        self.batches.clear();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Polygon(cmd) = &item.cmd else { continue };

            let (texture, color) = match &cmd.paint {
                Paint::Solid(c) => (None, c.to_array()),
                Paint::Texture(id) if id.index() < self.textures.len() => (Some(*id), [1.0; 4]),
                Paint::Texture(id) => {
                    if !self.warned_unknown_texture {
                        log::warn!("PolygonRenderer: unknown {id:?}; filling transparent");
                        self.warned_unknown_texture = true;
                    }
                    (None, Color::transparent().to_array())
                }
            };

            let start = self.mesh.indices.len() as u32;
            tessellate::fill(&mut self.mesh, &cmd.points, color);
            push_batch(&mut self.batches, texture, start..self.mesh.indices.len() as u32);

            if let Some(border) = &cmd.border {
                let start = self.mesh.indices.len() as u32;
                tessellate::stroke(&mut self.mesh, &cmd.points, border.width, border.color.to_array());
                push_batch(&mut self.batches, None, start..self.mesh.indices.len() as u32);
            }
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let key = PipelineKey::of(ctx);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mosaic polygon shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/polygon.wgsl").into()),
        });

        let viewport_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mosaic polygon viewport bgl"),
            entries: &[viewport_ubo_entry(0)],
        });

        let texture_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mosaic polygon texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mosaic polygon pipeline layout"),
            bind_group_layouts: &[&viewport_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mosaic polygon pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PolygonVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list_primitive(),
            depth_stencil: None,
            multisample: ctx.multisample_state(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.viewport_layout = Some(viewport_layout);
        self.texture_layout = Some(texture_layout);

        // Bind groups reference the old layouts.
        self.viewport_bind_group = None;
        self.viewport_ubo = None;
        self.white = None;
        for slot in &mut self.textures {
            slot.bind_group = None;
        }
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("mosaic polygon sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }

        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(layout) = self.viewport_layout.as_ref() else { return };

        let ubo = create_viewport_ubo(ctx.device, "mosaic polygon viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mosaic polygon viewport bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    /// Uploads pending textures referenced by this frame and the white fallback.
    fn ensure_textures(&mut self, ctx: &RenderCtx<'_>) {
        let (Some(layout), Some(sampler)) = (self.texture_layout.as_ref(), self.sampler.as_ref())
        else {
            return;
        };

        let white = self
            .white
            .get_or_insert_with(|| TextureSlot::new("white", 1, 1, vec![255; 4]));
        white.upload(ctx, layout, sampler);

        for batch in &self.batches {
            let Some(id) = batch.texture else { continue };
            if let Some(slot) = self.textures.get_mut(id.index()) {
                slot.upload(ctx, layout, sampler);
            }
        }
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
    }

    fn ensure_buffer_capacity(&mut self, ctx: &RenderCtx<'_>) {
        let vertices = self.mesh.vertices.len();
        if vertices > self.vbo_capacity || self.vbo.is_none() {
            let cap = vertices.next_power_of_two().max(256);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("mosaic polygon vbo"),
                size: (cap * std::mem::size_of::<PolygonVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = cap;
        }

        let indices = self.mesh.indices.len();
        if indices > self.ibo_capacity || self.ibo.is_none() {
            let cap = indices.next_power_of_two().max(512);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("mosaic polygon ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = cap;
        }
    }
}

impl TextureSlot {
    fn new(label: impl Into<String>, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            pending: Some(rgba),
            texture: None,
            bind_group: None,
        }
    }

    /// Creates the GPU texture on first call; rebuilds the bind group if the
    /// layout was recreated.
    fn upload(&mut self, ctx: &RenderCtx<'_>, layout: &wgpu::BindGroupLayout, sampler: &wgpu::Sampler) {
        if self.texture.is_none() {
            let Some(pixels) = self.pending.take() else { return };
            let size = wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            };
            let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(self.label.as_str()),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * self.width),
                    rows_per_image: Some(self.height),
                },
                size,
            );
            log::debug!("uploaded texture {} ({}x{})", self.label, self.width, self.height);
            self.texture = Some(texture);
            self.bind_group = None;
        }

        if self.bind_group.is_some() {
            return;
        }
        let Some(texture) = self.texture.as_ref() else { return };
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label.as_str()),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
    }
}

/// Appends `indices` to the batch list, merging with the previous batch when
/// it binds the same texture and is contiguous.
fn push_batch(batches: &mut Vec<Batch>, texture: Option<TextureId>, indices: Range<u32>) {
    if indices.is_empty() {
        return;
    }
    if let Some(last) = batches.last_mut() {
        if last.texture == texture && last.indices.end == indices.start {
            last.indices.end = indices.end;
            return;
        }
    }
    batches.push(Batch { texture, indices });
}

/// Premultiplies sRGB-encoded pixels in linear space.
///
/// Textures are sampled as `Rgba8UnormSrgb`, so the stored bytes must decode
/// to linear premultiplied values.
fn premultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        if px[3] == 255 {
            continue;
        }
        let a = px[3] as f32 / 255.0;
        for c in &mut px[..3] {
            let linear = srgb_to_linear(*c as f32 / 255.0) * a;
            *c = (linear_to_srgb(linear) * 255.0).round() as u8;
        }
    }
}
