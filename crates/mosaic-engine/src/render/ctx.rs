use crate::coords::Viewport;

/// Renderer-facing context (device/queue + surface format + viewport).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
    /// MSAA sample count of the color target. Pipelines must match it.
    pub sample_count: u32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scale_factor: f32,
        sample_count: u32,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
            scale_factor,
            sample_count,
        }
    }

    #[inline]
    pub(crate) fn multisample_state(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count.max(1),
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }
}

/// Target for drawing (encoder + color view).
///
/// With MSAA, `color_view` is the multisampled texture and `resolve_view`
/// the swapchain view it resolves into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub resolve_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        resolve_view: Option<&'a wgpu::TextureView>,
    ) -> Self {
        Self { encoder, color_view, resolve_view }
    }

    /// Attachment that loads existing contents and stores the result.
    ///
    /// The returned value borrows the views, not `self`, so the encoder stays
    /// free for `begin_render_pass`.
    pub(crate) fn load_attachment(&self) -> wgpu::RenderPassColorAttachment<'a> {
        self.attachment(wgpu::LoadOp::Load)
    }

    pub(crate) fn attachment(
        &self,
        load: wgpu::LoadOp<wgpu::Color>,
    ) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: self.resolve_view,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }
}
