use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::window::Window;

use super::surface::{choose_alpha_mode, choose_surface_format, pick_sample_count, Swapchain};
use super::GpuInit;

/// One acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// frame, so submit promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What the frame loop should do after a failed acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; try again on the next redraw.
    Reconfigured,
    /// Transient error; skip this frame.
    SkipFrame,
    /// Out of memory; shut down.
    Fatal,
}

/// Device, queue and the window's swapchain.
///
/// The `'w` lifetime ties the surface to the window it was created from.
pub struct Gpu<'w> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    swapchain: Swapchain<'w>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to `window`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;
        let info = adapter.get_info();
        log::info!("adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("mosaic device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps, init.prefer_srgb)
            .context("surface reports no supported formats")?;

        let requested = init.sample_count.max(1);
        let flags = adapter.get_texture_format_features(format).flags;
        let sample_count = pick_sample_count(requested, |n| flags.sample_count_supported(n));
        if sample_count != requested {
            log::warn!("MSAA x{requested} unsupported for {format:?}; using x{sample_count}");
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode(),
            alpha_mode: choose_alpha_mode(&caps),
            view_formats: vec![],
            desired_maximum_frame_latency: init.frame_latency,
        };
        log::debug!("surface {format:?} {}x{}, MSAA x{sample_count}", size.width, size.height);

        let swapchain = Swapchain::new(surface, &device, config, sample_count);
        Ok(Gpu { device, queue, swapchain })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    /// Effective MSAA sample count (1 when disabled).
    pub fn sample_count(&self) -> u32 {
        self.swapchain.sample_count()
    }

    /// Multisampled color view to render into, if MSAA is active.
    pub fn msaa_view(&self) -> Option<&wgpu::TextureView> {
        self.swapchain.msaa_view()
    }

    /// Reconfigures the swapchain after a resize. Ignored for 0×0.
    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.swapchain.resize(&self.device, size);
    }

    /// Acquires the next swapchain image and opens an encoder for it.
    pub fn begin_frame(&self) -> Result<GpuFrame, SurfaceError> {
        let surface_texture = self.swapchain.acquire()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mosaic frame encoder"),
            });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        self.swapchain.recover(&self.device, err)
    }
}
