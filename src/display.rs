use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

use crate::gpu::GpuContext;
use crate::runner::{RenderHost, ServiceOutcome};
use crate::scenes::Scene;

/// Everything a scene needs to record one frame
pub struct FrameContext<'a> {
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
}

/// Window-side state fed by the event pump
#[derive(Default)]
struct WindowState {
    window: Option<Arc<Window>>,
    close_requested: bool,
    pending_resize: Option<(u32, u32)>,
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("framebench")
            .with_fullscreen(Some(Fullscreen::Borderless(None)));

        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.pending_resize = Some((size.width, size.height)),
            _ => {}
        }
    }
}

/// Fullscreen window plus its configured render surface
///
/// The event loop is owned here and pumped non-blockingly once per frame
/// from the runner's loop, instead of the loop owning the application.
pub struct DisplayContext {
    event_loop: EventLoop<()>,
    state: WindowState,
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl DisplayContext {
    pub fn new() -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = WindowState::default();

        // The window arrives through `resumed` on an early pump
        for _ in 0..100 {
            let status = event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut state);
            if state.window.is_some() || matches!(status, PumpStatus::Exit(_)) {
                break;
            }
        }
        let window = state
            .window
            .clone()
            .ok_or_else(|| anyhow!("the event loop never delivered a window"))?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create render surface")?;
        let gpu = pollster::block_on(GpuContext::new(&instance, &surface))?;

        let size = window.inner_size();
        let config = Self::surface_config(&surface, &gpu, size.width, size.height);
        surface.configure(gpu.device(), &config);

        Ok(Self {
            event_loop,
            state,
            gpu,
            surface,
            config,
        })
    }

    fn surface_config(
        surface: &wgpu::Surface,
        gpu: &GpuContext,
        width: u32,
        height: u32,
    ) -> wgpu::SurfaceConfiguration {
        let caps = surface.get_capabilities(gpu.adapter());
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            // The benchmark measures raw throughput, so vsync stays off
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(self.gpu.device(), &self.config);
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

impl RenderHost for DisplayContext {
    fn service_events(&mut self) -> ServiceOutcome {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);

        if let Some((width, height)) = self.state.pending_resize.take() {
            if width > 0 && height > 0 {
                self.config.width = width;
                self.config.height = height;
                self.reconfigure();
            }
        }

        if self.state.close_requested || matches!(status, PumpStatus::Exit(_)) {
            ServiceOutcome::CloseRequested
        } else {
            ServiceOutcome::Continue
        }
    }

    fn render(&mut self, scene: &mut dyn Scene) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface frame acquisition timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to acquire surface frame"),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.gpu
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });

        {
            let mut frame = FrameContext {
                queue: self.gpu.queue(),
                encoder: &mut encoder,
                view: &view,
            };
            scene.draw(&mut frame);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
