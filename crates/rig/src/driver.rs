use glam::Vec3;

use crate::camera::Camera;
use crate::control::{Control, ControlSet};
use crate::seed::SeedSource;
use crate::time::{Flow, TimeControl, TimeSteps};

/// Values produced for one frame, ready to be packed into uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub camera: Vec3,
    pub focus: Vec3,
    pub up: Vec3,
    /// Shader time in milliseconds.
    pub time_ms: i32,
    pub time_seconds: f32,
    pub seed: f32,
    pub flow: Flow,
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// Runs the per-frame input → time → camera → seed sequence.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    camera: Camera,
    camera_enabled: bool,
    time: Option<TimeControl>,
    seeds: SeedSource,
    launch_ms: i64,
    last_ms: i64,
    frames: u64,
}

impl FrameDriver {
    /// `time_steps` of `None` disables the time keys; shader time then
    /// simply counts from `now_ms`.
    pub fn new(
        camera: Camera,
        camera_enabled: bool,
        time_steps: Option<TimeSteps>,
        seeds: SeedSource,
        now_ms: i64,
    ) -> Self {
        Self {
            camera,
            camera_enabled,
            time: time_steps.map(|steps| TimeControl::new(now_ms, steps)),
            seeds,
            launch_ms: now_ms,
            last_ms: now_ms,
            frames: 0,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn time_control(&self) -> Option<&TimeControl> {
        self.time.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn quit_requested(controls: &ControlSet) -> bool {
        controls.contains(Control::Quit)
    }

    pub fn advance(&mut self, controls: &ControlSet, now_ms: i64) -> FrameState {
        let dt = (now_ms.saturating_sub(self.last_ms)).max(0) as f32 * 0.001;
        self.last_ms = now_ms;

        if let Some(time) = self.time.as_mut() {
            time.apply(controls, now_ms);
            time.flow_step();
        }

        if self.camera_enabled {
            self.camera.update(controls, dt);
        }

        let (time_ms, flow) = match self.time.as_mut() {
            Some(time) => (time.sample(now_ms), time.flow()),
            None => {
                let elapsed = now_ms.saturating_sub(self.launch_ms);
                let clamped = elapsed.clamp(0, i64::from(i32::MAX)) as i32;
                (clamped, Flow::Normal)
            }
        };

        self.frames = self.frames.saturating_add(1);

        FrameState {
            camera: self.camera.position(),
            focus: self.camera.focus(),
            up: self.camera.up(),
            time_ms,
            time_seconds: time_ms as f32 * 0.001,
            seed: self.seeds.next_seed(),
            flow,
            dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraModel, MovementTuning};

    fn raymarch_driver(now_ms: i64) -> FrameDriver {
        FrameDriver::new(
            Camera::default(),
            true,
            Some(TimeSteps::default()),
            SeedSource::fixed(3, 100.0),
            now_ms,
        )
    }

    fn controls(list: &[Control]) -> ControlSet {
        list.iter().copied().collect()
    }

    #[test]
    fn first_frame_has_zero_dt_and_launch_pose() {
        let mut driver = raymarch_driver(5_000);
        let frame = driver.advance(&ControlSet::new(), 5_000);
        assert_eq!(frame.dt, 0.0);
        assert_eq!(frame.time_ms, 0);
        assert_eq!(frame.camera, Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(frame.focus, Vec3::new(0.0, 0.0, -7.0));
        assert!((0.0..100.0).contains(&frame.seed));
    }

    #[test]
    fn camera_moves_with_elapsed_time() {
        let mut driver = raymarch_driver(0);
        driver.advance(&ControlSet::new(), 0);
        let frame = driver.advance(&controls(&[Control::MoveForward]), 500);
        assert!((frame.dt - 0.5).abs() < 1e-6);
        assert!((frame.camera.z - (-2.0)).abs() < 1e-4);
    }

    #[test]
    fn paused_frames_keep_time_while_camera_still_moves() {
        let mut driver = raymarch_driver(0);
        driver.advance(&ControlSet::new(), 1_000);
        let paused = driver.advance(&controls(&[Control::Pause]), 1_200);
        assert_eq!(paused.flow, Flow::Paused);
        assert_eq!(paused.time_ms, 1_000);

        let moving = driver.advance(&controls(&[Control::MoveForward]), 2_200);
        assert_eq!(moving.time_ms, 1_000);
        assert!(moving.camera.z > -8.0);
    }

    #[test]
    fn clock_going_backwards_never_yields_negative_dt() {
        let mut driver = raymarch_driver(1_000);
        let frame = driver.advance(&ControlSet::new(), 900);
        assert_eq!(frame.dt, 0.0);
    }

    #[test]
    fn screen_mode_ignores_time_keys_and_camera() {
        let camera = Camera::new(
            CameraModel::Euler,
            Vec3::ZERO,
            Vec3::Z,
            MovementTuning::euler(),
        );
        let mut driver = FrameDriver::new(camera, false, None, SeedSource::fixed(1, 10.0), 0);
        let frame = driver.advance(&controls(&[Control::RewindFast, Control::MoveForward]), 750);
        assert_eq!(frame.time_ms, 750);
        assert_eq!(frame.flow, Flow::Normal);
        assert_eq!(frame.camera, Vec3::ZERO);
        assert!(driver.time_control().is_none());
    }

    #[test]
    fn quit_is_reported() {
        assert!(FrameDriver::quit_requested(&controls(&[Control::Quit])));
        assert!(!FrameDriver::quit_requested(&ControlSet::new()));
    }
}
