use std::f32::consts::PI;

use glam::Vec3;

use crate::control::{Control, ControlSet};

/// Fixed per-frame yaw step of the free-fly camera.
const FREE_FLY_TURN_ANGLE: f32 = PI / 264.0;
/// Angle used to shape the free-fly pitch nudge.
const FREE_FLY_PITCH_ANGLE: f32 = PI / 512.0;
const FREE_FLY_PITCH_SCALE: f32 = 0.05;

/// Which camera model drives the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraModel {
    #[default]
    FreeFly,
    Euler,
}

/// Speeds shared by both camera models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementTuning {
    /// Translation speed in world units per second.
    pub move_speed: f32,
    /// Free-fly: pitch nudge speed. Euler: turn rate in radians per second.
    pub turn_speed: f32,
    /// Free-fly: bound on `look.y`. Euler: bound on pitch in radians.
    pub pitch_limit: f32,
}

impl MovementTuning {
    pub fn free_fly() -> Self {
        Self {
            move_speed: 12.0,
            turn_speed: 20.0,
            pitch_limit: 1.2,
        }
    }

    pub fn euler() -> Self {
        Self {
            move_speed: 12.0,
            turn_speed: 1.5,
            pitch_limit: 89.0_f32.to_radians(),
        }
    }

    pub fn for_model(model: CameraModel) -> Self {
        match model {
            CameraModel::FreeFly => Self::free_fly(),
            CameraModel::Euler => Self::euler(),
        }
    }
}

/// Look-vector camera: the look vector is rotated and nudged in place and
/// is not renormalised, so the focus point is always `position + look`.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeFlyCamera {
    pub position: Vec3,
    pub look: Vec3,
    pub tuning: MovementTuning,
}

impl Default for FreeFlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -8.0),
            look: Vec3::Z,
            tuning: MovementTuning::free_fly(),
        }
    }
}

impl FreeFlyCamera {
    pub fn new(position: Vec3, look: Vec3, tuning: MovementTuning) -> Self {
        let mut camera = Self {
            position,
            look,
            tuning,
        };
        camera.clamp_pitch();
        camera
    }

    pub fn right(&self) -> Vec3 {
        self.look.cross(Vec3::Y)
    }

    pub fn up(&self) -> Vec3 {
        -self.look.cross(self.right())
    }

    pub fn update(&mut self, controls: &ControlSet, dt: f32) {
        self.clamp_pitch();

        let step = self.tuning.move_speed * dt;
        let (forward, right, up) = (self.look, self.right(), self.up());
        translate(&mut self.position, controls, step, forward, right, up);

        match controls.first_of(&[Control::TurnRight, Control::TurnLeft]) {
            Some(Control::TurnRight) => self.look = yaw_look(self.look, FREE_FLY_TURN_ANGLE),
            Some(Control::TurnLeft) => self.look = yaw_look(self.look, -FREE_FLY_TURN_ANGLE),
            _ => {}
        }

        let nudge = self.tuning.turn_speed * dt * FREE_FLY_PITCH_SCALE;
        let (s, c) = FREE_FLY_PITCH_ANGLE.sin_cos();
        match controls.first_of(&[Control::LookUp, Control::LookDown]) {
            Some(Control::LookUp) => self.look += Vec3::new(0.0, c * nudge, -s * nudge),
            Some(Control::LookDown) => self.look += Vec3::new(0.0, -c * nudge, s * nudge),
            _ => {}
        }
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        let limit = self.tuning.pitch_limit;
        self.look.y = self.look.y.clamp(-limit, limit);
    }
}

/// Rotates `look` about world Y; positive angles turn right.
fn yaw_look(look: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * look.x - s * look.z, look.y, s * look.x + c * look.z)
}

/// Yaw/pitch camera with a unit-length basis.
#[derive(Debug, Clone, PartialEq)]
pub struct EulerCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub tuning: MovementTuning,
}

impl Default for EulerCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -8.0),
            yaw: PI / 2.0,
            pitch: 0.0,
            tuning: MovementTuning::euler(),
        }
    }
}

impl EulerCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, tuning: MovementTuning) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch,
            tuning,
        };
        camera.clamp_pitch();
        camera
    }

    /// Builds a camera facing `look`, which need not be normalised.
    pub fn looking_at(position: Vec3, look: Vec3, tuning: MovementTuning) -> Self {
        let dir = look.try_normalize().unwrap_or(Vec3::Z);
        let yaw = dir.z.atan2(dir.x);
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        Self::new(position, yaw, pitch, tuning)
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        -self.forward().cross(self.right())
    }

    pub fn update(&mut self, controls: &ControlSet, dt: f32) {
        let step = self.tuning.move_speed * dt;
        let (forward, right, up) = (self.forward(), self.right(), self.up());
        translate(&mut self.position, controls, step, forward, right, up);

        let turn = self.tuning.turn_speed * dt;
        match controls.first_of(&[Control::TurnRight, Control::TurnLeft]) {
            Some(Control::TurnRight) => self.yaw += turn,
            Some(Control::TurnLeft) => self.yaw -= turn,
            _ => {}
        }
        match controls.first_of(&[Control::LookUp, Control::LookDown]) {
            Some(Control::LookUp) => self.pitch += turn,
            Some(Control::LookDown) => self.pitch -= turn,
            _ => {}
        }
        self.yaw = self.yaw.rem_euclid(2.0 * PI);
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        let limit = self.tuning.pitch_limit;
        self.pitch = self.pitch.clamp(-limit, limit);
    }
}

fn translate(
    position: &mut Vec3,
    controls: &ControlSet,
    step: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
) {
    match controls.first_of(&[Control::StrafeRight, Control::StrafeLeft]) {
        Some(Control::StrafeRight) => *position += right * step,
        Some(Control::StrafeLeft) => *position -= right * step,
        _ => {}
    }
    match controls.first_of(&[Control::MoveForward, Control::MoveBack]) {
        Some(Control::MoveForward) => *position += forward * step,
        Some(Control::MoveBack) => *position -= forward * step,
        _ => {}
    }
    match controls.first_of(&[Control::Rise, Control::Sink]) {
        Some(Control::Rise) => *position += up * step,
        Some(Control::Sink) => *position -= up * step,
        _ => {}
    }
}

/// The camera currently driving the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    FreeFly(FreeFlyCamera),
    Euler(EulerCamera),
}

impl Camera {
    /// Builds a camera of the given model at `position` facing `look`.
    pub fn new(model: CameraModel, position: Vec3, look: Vec3, tuning: MovementTuning) -> Self {
        match model {
            CameraModel::FreeFly => Camera::FreeFly(FreeFlyCamera::new(position, look, tuning)),
            CameraModel::Euler => Camera::Euler(EulerCamera::looking_at(position, look, tuning)),
        }
    }

    pub fn model(&self) -> CameraModel {
        match self {
            Camera::FreeFly(_) => CameraModel::FreeFly,
            Camera::Euler(_) => CameraModel::Euler,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Camera::FreeFly(camera) => camera.position,
            Camera::Euler(camera) => camera.position,
        }
    }

    pub fn forward(&self) -> Vec3 {
        match self {
            Camera::FreeFly(camera) => camera.look,
            Camera::Euler(camera) => camera.forward(),
        }
    }

    pub fn right(&self) -> Vec3 {
        match self {
            Camera::FreeFly(camera) => camera.right(),
            Camera::Euler(camera) => camera.right(),
        }
    }

    pub fn up(&self) -> Vec3 {
        match self {
            Camera::FreeFly(camera) => camera.up(),
            Camera::Euler(camera) => camera.up(),
        }
    }

    pub fn focus(&self) -> Vec3 {
        self.position() + self.forward()
    }

    pub fn update(&mut self, controls: &ControlSet, dt: f32) {
        match self {
            Camera::FreeFly(camera) => camera.update(controls, dt),
            Camera::Euler(camera) => camera.update(controls, dt),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::FreeFly(FreeFlyCamera::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(list: &[Control]) -> ControlSet {
        list.iter().copied().collect()
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn free_fly_defaults_match_launch_pose() {
        let camera = FreeFlyCamera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(camera.look, Vec3::Z);
        assert!(close(camera.right(), Vec3::new(-1.0, 0.0, 0.0)));
        assert!(close(camera.up(), Vec3::Y));
    }

    #[test]
    fn free_fly_moves_along_look_scaled_by_dt() {
        let mut camera = FreeFlyCamera::default();
        camera.update(&controls(&[Control::MoveForward]), 0.5);
        assert!(close(camera.position, Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn opposite_keys_resolve_by_priority() {
        let mut camera = FreeFlyCamera::default();
        camera.update(
            &controls(&[Control::MoveForward, Control::MoveBack, Control::Rise, Control::Sink]),
            0.25,
        );
        assert!(close(camera.position, Vec3::new(0.0, 3.0, -5.0)));

        let mut camera = FreeFlyCamera::default();
        camera.update(&controls(&[Control::StrafeLeft, Control::StrafeRight]), 0.25);
        assert!(close(camera.position, Vec3::new(-3.0, 0.0, -8.0)));
    }

    #[test]
    fn free_fly_turn_is_a_fixed_angle_per_frame() {
        let mut camera = FreeFlyCamera::default();
        camera.update(&controls(&[Control::TurnRight]), 0.0);
        let (s, c) = FREE_FLY_TURN_ANGLE.sin_cos();
        assert!(close(camera.look, Vec3::new(-s, 0.0, c)));

        camera.update(&controls(&[Control::TurnLeft]), 1.0);
        assert!(close(camera.look, Vec3::Z));
    }

    #[test]
    fn free_fly_turns_preserve_length() {
        let mut camera = FreeFlyCamera::default();
        for _ in 0..500 {
            camera.update(&controls(&[Control::TurnRight]), 0.016);
        }
        assert!((camera.look.length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn free_fly_pitch_stays_clamped() {
        let mut camera = FreeFlyCamera::default();
        for _ in 0..1_000 {
            camera.update(&controls(&[Control::LookUp]), 0.1);
            assert!(camera.look.y <= 1.2 + f32::EPSILON);
        }
        for _ in 0..2_000 {
            camera.update(&controls(&[Control::LookDown]), 0.1);
            assert!(camera.look.y >= -1.2 - f32::EPSILON);
        }
    }

    #[test]
    fn free_fly_pitch_nudge_matches_formula() {
        let mut camera = FreeFlyCamera::default();
        camera.update(&controls(&[Control::LookUp]), 0.1);
        let k = 20.0 * 0.1 * 0.05;
        let (s, c) = FREE_FLY_PITCH_ANGLE.sin_cos();
        assert!(close(camera.look, Vec3::new(0.0, c * k, 1.0 - s * k)));
    }

    #[test]
    fn euler_default_faces_positive_z() {
        let camera = EulerCamera::default();
        assert!(close(camera.forward(), Vec3::Z));
        assert!((camera.right().length() - 1.0).abs() < 1e-5);
        assert!((camera.up().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn euler_pitch_is_clamped_and_basis_stays_unit() {
        let mut camera = EulerCamera::default();
        for _ in 0..200 {
            camera.update(&controls(&[Control::LookUp, Control::TurnLeft]), 0.05);
            assert!(camera.pitch <= camera.tuning.pitch_limit);
            assert!((camera.forward().length() - 1.0).abs() < 1e-4);
            assert!((camera.right().length() - 1.0).abs() < 1e-4);
        }
        assert!((camera.pitch - 89.0_f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn euler_translates_along_its_basis() {
        let mut camera = EulerCamera::default();
        camera.update(
            &controls(&[Control::MoveForward, Control::StrafeRight, Control::Rise]),
            0.5,
        );
        assert!(close(camera.position, Vec3::new(-6.0, 6.0, -2.0)));
    }

    #[test]
    fn euler_looking_at_recovers_direction() {
        let target = Vec3::new(1.0, 0.5, 1.0);
        let camera = EulerCamera::looking_at(Vec3::ZERO, target, MovementTuning::euler());
        assert!(close(camera.forward(), target.normalize()));
    }

    #[test]
    fn camera_focus_is_position_plus_forward() {
        let camera = Camera::new(
            CameraModel::FreeFly,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, 2.0),
            MovementTuning::free_fly(),
        );
        assert!(close(camera.focus(), Vec3::new(1.0, 2.0, 5.0)));
        assert_eq!(camera.model(), CameraModel::FreeFly);
    }
}
