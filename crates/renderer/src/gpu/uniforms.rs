use bytemuck::{Pod, Zeroable};
use rig::FrameState;
use winit::dpi::PhysicalSize;

use crate::types::CHANNEL_COUNT;

/// Mirror of the `FrameParams` std140 block injected by the shader wrapper.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub camera: [f32; 3],
    pub time_seconds: f32,
    pub focus: [f32; 3],
    pub seed: f32,
    pub up: [f32; 3],
    pub time_ms: i32,
    pub resolution: [f32; 2],
    pub flow: i32,
    pub delta: f32,
    pub channel_resolution: [[f32; 4]; CHANNEL_COUNT],
}

impl FrameUniforms {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        let mut uniforms = Self::zeroed();
        uniforms.set_resolution(size);
        uniforms
    }

    pub fn set_resolution(&mut self, size: PhysicalSize<u32>) {
        self.resolution = [size.width as f32, size.height as f32];
    }

    pub fn set_channel_resolution(&mut self, index: usize, resolution: [f32; 4]) {
        if let Some(slot) = self.channel_resolution.get_mut(index) {
            *slot = resolution;
        }
    }

    pub fn apply_frame(&mut self, frame: &FrameState) {
        self.camera = frame.camera.to_array();
        self.focus = frame.focus.to_array();
        self.up = frame.up.to_array();
        self.time_ms = frame.time_ms;
        self.time_seconds = frame.time_seconds;
        self.seed = frame.seed;
        self.flow = frame.flow.as_scroll();
        self.delta = frame.dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig::{Flow, Vec3};
    use std::mem::{offset_of, size_of};

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(offset_of!(FrameUniforms, camera), 0);
        assert_eq!(offset_of!(FrameUniforms, time_seconds), 12);
        assert_eq!(offset_of!(FrameUniforms, focus), 16);
        assert_eq!(offset_of!(FrameUniforms, seed), 28);
        assert_eq!(offset_of!(FrameUniforms, up), 32);
        assert_eq!(offset_of!(FrameUniforms, time_ms), 44);
        assert_eq!(offset_of!(FrameUniforms, resolution), 48);
        assert_eq!(offset_of!(FrameUniforms, flow), 56);
        assert_eq!(offset_of!(FrameUniforms, delta), 60);
        assert_eq!(offset_of!(FrameUniforms, channel_resolution), 64);
        assert_eq!(size_of::<FrameUniforms>(), 128);
    }

    #[test]
    fn frame_state_is_copied_into_uniforms() {
        let mut uniforms = FrameUniforms::new(PhysicalSize::new(1080, 720));
        uniforms.apply_frame(&FrameState {
            camera: Vec3::new(0.0, 0.0, -8.0),
            focus: Vec3::new(0.0, 0.0, -7.0),
            up: Vec3::Y,
            time_ms: 1_500,
            time_seconds: 1.5,
            seed: 42.0,
            flow: Flow::RewindFast,
            dt: 0.016,
        });
        assert_eq!(uniforms.resolution, [1080.0, 720.0]);
        assert_eq!(uniforms.focus, [0.0, 0.0, -7.0]);
        assert_eq!(uniforms.time_ms, 1_500);
        assert_eq!(uniforms.flow, -2);
        assert_eq!(uniforms.seed, 42.0);
    }

    #[test]
    fn out_of_range_channel_resolution_is_ignored() {
        let mut uniforms = FrameUniforms::new(PhysicalSize::new(1, 1));
        uniforms.set_channel_resolution(CHANNEL_COUNT, [9.0; 4]);
        assert!(uniforms.channel_resolution.iter().all(|r| *r == [0.0; 4]));
    }
}
