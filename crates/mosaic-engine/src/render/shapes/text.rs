use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::shapes::TextCmd;
use crate::scene::{DrawCmd, DrawList};
use crate::text::{FontId, FontSystem, LineBitmap};

use super::common::{
    create_viewport_ubo, premul_alpha_blend, triangle_list_primitive, viewport_ubo_entry,
    PipelineKey, QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};

/// Cache key: the same string at another physical size is another bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LineKey {
    text: String,
    font: FontId,
    px_bits: u32,
}

impl LineKey {
    fn of(cmd: &TextCmd, scale: f32) -> Self {
        Self {
            text: cmd.text.clone(),
            font: cmd.font,
            px_bits: (cmd.size * scale).to_bits(),
        }
    }
}

/// Uploaded line bitmap.
struct CachedLine {
    width: u32,
    height: u32,
    offset: (i32, i32),
    bind_group: wgpu::BindGroup,
    used: bool,
}

/// Renderer for `DrawCmd::Text`.
///
/// Every distinct line is rasterized once at physical size into its own
/// R8 coverage texture and drawn as a single quad. Lines that no draw list
/// referenced during a frame are released at the end of it, so replacing
/// the info text does not grow GPU memory.
#[derive(Default)]
pub struct TextRenderer {
    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    viewport_layout: Option<wgpu::BindGroupLayout>,
    line_layout: Option<wgpu::BindGroupLayout>,

    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    lines: HashMap<LineKey, CachedLine>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list`, in paint order.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        let cmds: Vec<TextCmd> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect();

        for line in self.lines.values_mut() {
            line.used = false;
        }
        if cmds.is_empty() {
            self.lines.clear();
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);

        // Positions go back to logical pixels for the shader.
        let scale = ctx.scale_factor.max(0.01);

        let mut instances = Vec::with_capacity(cmds.len());
        let mut keys = Vec::with_capacity(cmds.len());
        for cmd in &cmds {
            let key = LineKey::of(cmd, scale);
            if !self.lines.contains_key(&key) {
                let Some(bitmap) = fonts.rasterize_line(cmd.font, &cmd.text, cmd.size * scale) else {
                    continue;
                };
                let Some(line) = self.upload_line(ctx, &bitmap) else { continue };
                log::debug!("text line {:?} rasterized ({}x{})", cmd.text, line.width, line.height);
                self.lines.insert(key.clone(), line);
            }
            let Some(line) = self.lines.get_mut(&key) else { continue };
            line.used = true;
            instances.push(LineInstance::place(cmd, (line.width, line.height), line.offset, scale));
            keys.push(key);
        }
        self.lines.retain(|_, line| line.used);

        if instances.is_empty() {
            return;
        }

        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(viewport_bg) = self.viewport_bind_group.as_ref() else { return };
        let (Some(quad_vbo), Some(quad_ibo)) = (self.quad_vbo.as_ref(), self.quad_ibo.as_ref()) else {
            return;
        };

        let attachment = target.load_attachment();
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mosaic text pass"),
            color_attachments: &[Some(attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bg, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (i, key) in keys.iter().enumerate() {
            let Some(line) = self.lines.get(key) else { continue };
            let i = i as u32;
            rpass.set_bind_group(1, &line.bind_group, &[]);
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, i..i + 1);
        }
    }

    fn upload_line(&self, ctx: &RenderCtx<'_>, bitmap: &LineBitmap) -> Option<CachedLine> {
        let layout = self.line_layout.as_ref()?;
        let sampler = self.sampler.as_ref()?;

        let size = wgpu::Extent3d {
            width: bitmap.width,
            height: bitmap.height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("mosaic text line"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
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
            &bitmap.coverage,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bitmap.width),
                rows_per_image: Some(bitmap.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mosaic text line bind group"),
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
        });

        Some(CachedLine {
            width: bitmap.width,
            height: bitmap.height,
            offset: bitmap.offset,
            bind_group,
            used: true,
        })
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let key = PipelineKey::of(ctx);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mosaic text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let viewport_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mosaic text viewport bgl"),
            entries: &[viewport_ubo_entry(0)],
        });

        let line_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mosaic text line bgl"),
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
            label: Some("mosaic text pipeline layout"),
            bind_group_layouts: &[&viewport_layout, &line_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mosaic text pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), LineInstance::layout()],
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
        self.line_layout = Some(line_layout);

        // Line bind groups were built against the old layout.
        self.viewport_bind_group = None;
        self.viewport_ubo = None;
        self.lines.clear();
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("mosaic text sampler"),
                mag_filter: wgpu::FilterMode::Nearest,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            }));
        }

        if self.quad_vbo.is_none() || self.quad_ibo.is_none() {
            self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mosaic text quad vbo"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            }));
            self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mosaic text quad ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }));
        }

        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(layout) = self.viewport_layout.as_ref() else { return };

        let ubo = create_viewport_ubo(ctx.device, "mosaic text viewport ubo");
        self.viewport_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mosaic text viewport bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        }));
        self.viewport_ubo = Some(ubo);
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let cap = required.next_power_of_two().max(8);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mosaic text instance vbo"),
            size: (cap * std::mem::size_of::<LineInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = cap;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Per-line instance (32 bytes): destination rect in logical px and the
/// premultiplied text color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct LineInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    color: [f32; 4],
}

impl LineInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x4
    ];

    /// Maps a physical-pixel bitmap back to logical pixels at `cmd.origin`.
    fn place(cmd: &TextCmd, (w, h): (u32, u32), (dx, dy): (i32, i32), scale: f32) -> Self {
        let x = cmd.origin.x + dx as f32 / scale;
        let y = cmd.origin.y + dy as f32 / scale;
        Self {
            dst_min: [x, y],
            dst_max: [x + w as f32 / scale, y + h as f32 / scale],
            color: cmd.color.to_array(),
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
