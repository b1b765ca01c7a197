use std::time::Duration;

use crate::control::{Control, ControlSet};

/// Time-scrub state selected from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    RewindFast,
    SlowMotion,
    Paused,
    Normal,
    FastForward,
}

impl Flow {
    /// Signed speed label pushed to shaders (`-2..=2`, `0` when paused).
    pub fn as_scroll(self) -> i32 {
        match self {
            Flow::RewindFast => -2,
            Flow::SlowMotion => -1,
            Flow::Paused => 0,
            Flow::Normal => 1,
            Flow::FastForward => 2,
        }
    }
}

/// Per-frame epoch shifts applied while a flow is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSteps {
    /// Added to the epoch each frame while rewinding.
    pub rewind_fast: Duration,
    /// Added to the epoch each frame in slow motion.
    pub slow_motion: Duration,
    /// Subtracted from the epoch each frame while fast-forwarding.
    pub fast_forward: Duration,
}

impl Default for TimeSteps {
    fn default() -> Self {
        Self {
            rewind_fast: Duration::from_millis(25),
            slow_motion: Duration::from_millis(10),
            fast_forward: Duration::from_millis(10),
        }
    }
}

/// Epoch-shifting clock behind the shader's time uniform.
///
/// Shader time is `now - epoch`. Nudging the epoch forward a little every
/// frame slows time down or runs it backwards; nudging it back speeds it up.
#[derive(Debug, Clone)]
pub struct TimeControl {
    flow: Flow,
    epoch_ms: i64,
    paused_at: Option<i64>,
    last_time_ms: i32,
    steps: TimeSteps,
}

const KEY_PRIORITY: [Control; 5] = [
    Control::RewindFast,
    Control::SlowMotion,
    Control::Pause,
    Control::Play,
    Control::FastForward,
];

impl TimeControl {
    pub fn new(now_ms: i64, steps: TimeSteps) -> Self {
        Self {
            flow: Flow::Normal,
            epoch_ms: now_ms,
            paused_at: None,
            last_time_ms: 0,
            steps,
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn epoch_ms(&self) -> i64 {
        self.epoch_ms
    }

    pub fn last_time_ms(&self) -> i32 {
        self.last_time_ms
    }

    pub fn steps(&self) -> TimeSteps {
        self.steps
    }

    /// Reacts to the time keys held this frame. At most one transition
    /// happens per call; Pause is skipped while already paused.
    pub fn apply(&mut self, controls: &ControlSet, now_ms: i64) {
        let paused = self.is_paused();
        let selected = KEY_PRIORITY
            .iter()
            .copied()
            .filter(|control| !(paused && *control == Control::Pause))
            .find(|control| controls.contains(*control));

        let next = match selected {
            Some(Control::RewindFast) => Flow::RewindFast,
            Some(Control::SlowMotion) => Flow::SlowMotion,
            Some(Control::Pause) => {
                self.paused_at = Some(now_ms);
                self.transition(Flow::Paused);
                return;
            }
            Some(Control::Play) => Flow::Normal,
            Some(Control::FastForward) => Flow::FastForward,
            _ => return,
        };

        self.resume(now_ms);
        self.transition(next);
    }

    /// Shifts the epoch by the step of the current flow.
    pub fn flow_step(&mut self) {
        let shift = match self.flow {
            Flow::RewindFast => millis(self.steps.rewind_fast),
            Flow::SlowMotion => millis(self.steps.slow_motion),
            Flow::Paused | Flow::Normal => 0,
            Flow::FastForward => -millis(self.steps.fast_forward),
        };
        self.epoch_ms = self.epoch_ms.saturating_add(shift);
    }

    /// Shader time in milliseconds. Frozen while paused.
    pub fn sample(&mut self, now_ms: i64) -> i32 {
        if self.flow != Flow::Paused {
            let elapsed = now_ms.saturating_sub(self.epoch_ms);
            self.last_time_ms = elapsed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        }
        self.last_time_ms
    }

    fn resume(&mut self, now_ms: i64) {
        if let Some(paused_at) = self.paused_at.take() {
            let frozen_for = now_ms.saturating_sub(paused_at);
            self.epoch_ms = self.epoch_ms.saturating_add(frozen_for);
            tracing::debug!(frozen_for_ms = frozen_for, "resuming time");
        }
    }

    fn transition(&mut self, next: Flow) {
        if self.flow != next {
            tracing::debug!(from = ?self.flow, to = ?next, "time flow changed");
            self.flow = next;
        }
    }
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
