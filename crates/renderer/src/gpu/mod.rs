//! GPU side of the host.
//!
//! - `context` owns the wgpu instance/device/surface and reconfigures the
//!   swapchain on resize.
//! - `channels` loads channel textures and cubemaps, substituting
//!   placeholders when files are missing.
//! - `pipeline` compiles the wrapped GLSL into a render pipeline and knows
//!   whether to draw the quad buffer or the built-in triangle.
//! - `uniforms` mirrors the injected `FrameParams` block.
//! - `state` glues everything together behind `GpuState::render`.

mod channels;
mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
