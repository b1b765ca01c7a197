//! Camera and time-scrub state for the raymarching host.
//!
//! Nothing in here touches the GPU or the window system. The renderer turns
//! key events into a [`ControlSet`], hands it to [`FrameDriver::advance`] once
//! per redraw, and packs the returned [`FrameState`] into uniforms:
//!
//! ```text
//!   key events ─▶ ControlLatch ─▶ ControlSet ─▶ FrameDriver::advance
//!                                                   │
//!                        TimeControl::apply/flow_step/sample
//!                        Camera::update                │
//!                        SeedSource::next              ▼
//!                                                 FrameState
//! ```

mod camera;
mod control;
mod driver;
mod seed;
mod time;

pub use camera::{Camera, CameraModel, EulerCamera, FreeFlyCamera, MovementTuning};
pub use control::{Control, ControlLatch, ControlSet};
pub use driver::{FrameDriver, FrameState};
pub use seed::{SeedSource, DEFAULT_SEED_MAX};
pub use time::{Flow, TimeControl, TimeSteps};

pub use glam::Vec3;
