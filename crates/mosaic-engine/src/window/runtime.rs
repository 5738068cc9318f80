use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "mosaic".to_string(),
            initial_size: LogicalSize::new(1000.0, 800.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Opens one window and drives an [`App`] until the app exits or the window
/// is closed. Redraw is invalidation-based: a frame is produced when the
/// window is first shown, resized, rescaled, or receives input the engine
/// translates. Between those the loop sleeps.
pub struct Runtime;

impl Runtime {
    /// Returns the error that stopped the window from opening, if any.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut host = Host {
            config,
            gpu_init,
            app,
            slot: None,
            fatal: None,
        };
        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        host.fatal.map_or(Ok(()), Err)
    }
}

/// The window, its GPU surface and the input accumulated for the next frame.
#[self_referencing]
struct WindowSlot {
    input_state: InputState,
    input_frame: InputFrame,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowSlot {
    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }
}

struct Host<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    slot: Option<WindowSlot>,
    fatal: Option<anyhow::Error>,
}

impl<A: App> Host<A> {
    fn open(&self, event_loop: &ActiveEventLoop) -> Result<WindowSlot> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        WindowSlotTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn frame(&mut self) -> AppControl {
        let Some(slot) = self.slot.as_mut() else { return AppControl::Continue };
        let app = &mut self.app;

        slot.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: fields.window },
                gpu: fields.gpu,
                input_frame: fields.input_frame,
            };
            let control = app.on_frame(&mut ctx);

            // Events are consumed by exactly one frame.
            fields.input_frame.clear();
            control
        })
    }
}

impl<A: App> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(slot) = &self.slot {
            slot.request_redraw();
            return;
        }

        match self.open(event_loop) {
            Ok(slot) => {
                slot.request_redraw();
                self.slot = Some(slot);
            }
            Err(e) => {
                log::error!("failed to open window: {e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(slot) = self.slot.as_mut() else { return };

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.slot = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                log::debug!("window resized to {}x{}", size.width, size.height);
                slot.with_gpu_mut(|gpu| gpu.resize(*size));
                slot.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::debug!("scale factor changed to {scale_factor}");
                let size = slot.with_window(|w| w.inner_size());
                slot.with_gpu_mut(|gpu| gpu.resize(size));
                slot.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    log::info!("exit requested");
                    self.slot = None;
                    event_loop.exit();
                }
            }

            _ => {
                let translated = slot.with_mut(|fields| {
                    match translate_window_event(fields.window, fields.input_state, &event) {
                        Some(ev) => {
                            fields.input_state.apply_event(fields.input_frame, ev);
                            true
                        }
                        None => false,
                    }
                });
                if translated {
                    slot.request_redraw();
                }
            }
        }
    }
}
