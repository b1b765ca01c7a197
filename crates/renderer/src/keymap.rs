use rig::Control;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Default bindings. Keys are physical positions, so the layout does not
/// move them.
pub const DEFAULT_BINDINGS: [(KeyCode, Control); 16] = [
    (KeyCode::KeyW, Control::MoveForward),
    (KeyCode::KeyS, Control::MoveBack),
    (KeyCode::KeyA, Control::StrafeLeft),
    (KeyCode::KeyD, Control::StrafeRight),
    (KeyCode::Space, Control::Rise),
    (KeyCode::ShiftLeft, Control::Sink),
    (KeyCode::ArrowLeft, Control::TurnLeft),
    (KeyCode::ArrowRight, Control::TurnRight),
    (KeyCode::ArrowUp, Control::LookUp),
    (KeyCode::ArrowDown, Control::LookDown),
    (KeyCode::Digit2, Control::RewindFast),
    (KeyCode::Digit3, Control::SlowMotion),
    (KeyCode::KeyE, Control::Pause),
    (KeyCode::Digit4, Control::Play),
    (KeyCode::Digit5, Control::FastForward),
    (KeyCode::Escape, Control::Quit),
];

pub fn control_for_key(key: PhysicalKey) -> Option<Control> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    DEFAULT_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == code)
        .map(|(_, control)| *control)
}
