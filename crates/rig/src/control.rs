/// Everything the keyboard can ask of the rig in a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    Rise,
    Sink,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
    RewindFast,
    SlowMotion,
    Pause,
    Play,
    FastForward,
    Quit,
}

impl Control {
    pub const COUNT: usize = 16;

    pub const ALL: [Control; Control::COUNT] = [
        Control::MoveForward,
        Control::MoveBack,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::Rise,
        Control::Sink,
        Control::TurnLeft,
        Control::TurnRight,
        Control::LookUp,
        Control::LookDown,
        Control::RewindFast,
        Control::SlowMotion,
        Control::Pause,
        Control::Play,
        Control::FastForward,
        Control::Quit,
    ];

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Set of controls held during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlSet {
    bits: u32,
}

impl ControlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the control was not already present.
    pub fn insert(&mut self, control: Control) -> bool {
        let added = !self.contains(control);
        self.bits |= control.bit();
        added
    }

    pub fn remove(&mut self, control: Control) -> bool {
        let present = self.contains(control);
        self.bits &= !control.bit();
        present
    }

    pub fn contains(&self, control: Control) -> bool {
        self.bits & control.bit() != 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn union(&self, other: &ControlSet) -> ControlSet {
        ControlSet {
            bits: self.bits | other.bits,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Control> + '_ {
        Control::ALL
            .iter()
            .copied()
            .filter(move |control| self.contains(*control))
    }

    /// First control of `preferred` that is held, in order.
    pub(crate) fn first_of(&self, preferred: &[Control]) -> Option<Control> {
        preferred
            .iter()
            .copied()
            .find(|control| self.contains(*control))
    }
}

impl FromIterator<Control> for ControlSet {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        let mut set = ControlSet::new();
        for control in iter {
            set.insert(control);
        }
        set
    }
}

/// Sticky key tracking.
///
/// A control pressed and released between two redraws would otherwise be
/// missed entirely; the latch keeps reporting it until the next
/// [`ControlLatch::end_frame`].
#[derive(Debug, Clone, Default)]
pub struct ControlLatch {
    held: ControlSet,
    latched: ControlSet,
}

impl ControlLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
        self.latched.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(control);
    }

    /// Controls to evaluate this frame: everything held plus everything
    /// pressed since the previous frame.
    pub fn snapshot(&self) -> ControlSet {
        self.held.union(&self.latched)
    }

    pub fn end_frame(&mut self) {
        self.latched.clear();
    }

    /// Forgets all state, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.held.clear();
        self.latched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_control_has_a_distinct_bit() {
        let all: ControlSet = Control::ALL.iter().copied().collect();
        assert_eq!(all.len(), Control::COUNT);
    }

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = ControlSet::new();
        assert!(set.insert(Control::MoveForward));
        assert!(!set.insert(Control::MoveForward));
        assert!(set.contains(Control::MoveForward));
        assert!(set.remove(Control::MoveForward));
        assert!(!set.remove(Control::MoveForward));
        assert!(set.is_empty());
    }

    #[test]
    fn first_of_respects_preference_order() {
        let set: ControlSet = [Control::Play, Control::SlowMotion].into_iter().collect();
        let picked = set.first_of(&[Control::RewindFast, Control::SlowMotion, Control::Play]);
        assert_eq!(picked, Some(Control::SlowMotion));
    }

    #[test]
    fn tap_between_frames_is_seen_once() {
        let mut latch = ControlLatch::new();
        latch.press(Control::Pause);
        latch.release(Control::Pause);
        assert!(latch.snapshot().contains(Control::Pause));
        latch.end_frame();
        assert!(!latch.snapshot().contains(Control::Pause));
    }

    #[test]
    fn held_control_survives_end_frame() {
        let mut latch = ControlLatch::new();
        latch.press(Control::MoveForward);
        latch.end_frame();
        assert!(latch.snapshot().contains(Control::MoveForward));
        latch.release(Control::MoveForward);
        assert!(latch.snapshot().is_empty());
    }

    #[test]
    fn reset_forgets_held_and_latched_controls() {
        let mut latch = ControlLatch::new();
        latch.press(Control::MoveForward);
        latch.press(Control::Pause);
        latch.release(Control::Pause);
        latch.reset();
        assert!(latch.snapshot().is_empty());
        latch.end_frame();
        assert!(latch.snapshot().is_empty());
    }
}
