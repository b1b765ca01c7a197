//! wgpu/winit host for marchview scenes.
//!
//! ```text
//!   marchview (CLI)
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!                          │                                   │
//!                          └─ ControlLatch ─▶ FrameDriver ─────┴─▶ GpuState::render
//! ```
//!
//! `WindowState` owns the GPU resources and the rig's `FrameDriver`.
//! Fragment shaders are wrapped at load time (see [`wrap_fragment`]) so they
//! only have to define `mainImage` and can read `uCamera`, `uFocus`,
//! `uResolution`, `uTime` and friends.

mod compile;
mod gpu;
mod keymap;
mod types;
mod window;

use anyhow::Result;

pub use compile::{check_shader, wrap_fragment, wrap_vertex, ShaderError, ShaderKind};
pub use keymap::{control_for_key, DEFAULT_BINDINGS};
pub use types::*;

/// Entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and blocks until it is closed or Escape is pressed.
    pub fn run(&mut self) -> Result<()> {
        if self.config.mode != HostMode::Template && self.config.shaders.is_none() {
            anyhow::bail!("{:?} mode needs a fragment shader", self.config.mode);
        }
        window::run_window(&self.config)
    }
}
