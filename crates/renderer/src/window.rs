use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use rig::{ControlLatch, FrameDriver, SeedSource};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::keymap::control_for_key;
use crate::types::{HostMode, RendererConfig};

/// Window, GPU state and the frame driver for one run.
pub(crate) struct WindowState {
    // Declared before `window` so the surface is dropped first.
    gpu: GpuState,
    window: Arc<Window>,
    latch: ControlLatch,
    driver: FrameDriver,
    launch: Instant,
}

pub(crate) enum FrameOutcome {
    Presented,
    Quit,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let gpu = GpuState::new(window.as_ref(), window.inner_size(), config)?;

        let seeds = match config.seed.fixed {
            Some(seed) => SeedSource::fixed(seed, config.seed.max),
            None => SeedSource::from_entropy(config.seed.max),
        };
        let (camera_enabled, time_steps) = match config.mode {
            HostMode::Raymarch => (true, config.time_steps),
            HostMode::Screen | HostMode::Template => (false, None),
        };
        let driver = FrameDriver::new(config.camera.clone(), camera_enabled, time_steps, seeds, 0);

        Ok(Self {
            gpu,
            window,
            latch: ControlLatch::new(),
            driver,
            launch: Instant::now(),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    pub(crate) fn handle_key(&mut self, event: &KeyEvent) {
        if event.repeat {
            return;
        }
        let Some(control) = control_for_key(event.physical_key) else {
            return;
        };
        match event.state {
            ElementState::Pressed => self.latch.press(control),
            ElementState::Released => self.latch.release(control),
        }
    }

    pub(crate) fn focus_lost(&mut self) {
        self.latch.reset();
    }

    fn now_ms(&self) -> i64 {
        i64::try_from(self.launch.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    /// Evaluates the controls collected since the last frame, advances the
    /// rig and presents.
    pub(crate) fn render_frame(&mut self) -> Result<FrameOutcome, wgpu::SurfaceError> {
        let controls = self.latch.snapshot();
        if FrameDriver::quit_requested(&controls) {
            return Ok(FrameOutcome::Quit);
        }

        let frame = self.driver.advance(&controls, self.now_ms());
        self.latch.end_frame();
        self.gpu.render(&frame)?;
        Ok(FrameOutcome::Presented)
    }
}

pub(crate) fn run_window(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state =
        WindowState::new(window.clone(), config).context("failed to initialise renderer")?;
    tracing::info!(
        mode = ?config.mode,
        title = %config.title,
        width,
        height,
        "window ready"
    );

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                    WindowEvent::KeyboardInput { event, .. } => state.handle_key(&event),
                    WindowEvent::Focused(false) => state.focus_lost(),
                    WindowEvent::Resized(new_size) => state.resize(new_size),
                    WindowEvent::ScaleFactorChanged {
                        mut inner_size_writer,
                        ..
                    } => {
                        let _ = inner_size_writer.request_inner_size(state.size());
                    }
                    WindowEvent::RedrawRequested => match state.render_frame() {
                        Ok(FrameOutcome::Presented) => {}
                        Ok(FrameOutcome::Quit) => {
                            tracing::info!("quit requested");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = state.size();
                            state.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("surface out of memory; exiting");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            tracing::warn!("surface timeout; retrying next frame");
                        }
                        Err(other) => {
                            tracing::warn!(error = ?other, "surface error; retrying next frame");
                        }
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => state.window().request_redraw(),
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
