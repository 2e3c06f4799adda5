//! Value animators
//!
//! A [`ValueAnimator`] turns host frame deltas into an eased 0..1 fraction.
//! It never calls back into its owner; every `tick` reports what happened
//! on that frame so the owner can dispatch start, update and end work
//! itself.

use crate::easing::Easing;

/// How many extra passes run after the first one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatCount {
    #[default]
    Once,
    Times(u32),
    Infinite,
}

/// What a repeat does with the direction of travel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Restart,
    Reverse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimatorStatus {
    #[default]
    Idle,
    Running,
    Finished,
    Cancelled,
}

/// Result of advancing an animator by one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorTick {
    /// Eased fraction for this frame
    pub fraction: f32,
    /// First frame since `start`
    pub started: bool,
    /// The animator reached its final value on this frame
    pub ended: bool,
}

/// Frame-driven 0..1 animator
#[derive(Clone, Debug)]
pub struct ValueAnimator {
    duration_ms: f32,
    easing: Easing,
    repeat: RepeatCount,
    repeat_mode: RepeatMode,
    elapsed_ms: f32,
    iteration: u32,
    status: AnimatorStatus,
    pending_start: bool,
}

impl ValueAnimator {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms: duration_ms as f32,
            easing: Easing::Linear,
            repeat: RepeatCount::Once,
            repeat_mode: RepeatMode::Restart,
            elapsed_ms: 0.0,
            iteration: 0,
            status: AnimatorStatus::Idle,
            pending_start: false,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatCount) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_repeat_mode(mut self, mode: RepeatMode) -> Self {
        self.repeat_mode = mode;
        self
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn status(&self) -> AnimatorStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == AnimatorStatus::Running
    }

    /// Completed passes since `start`
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Start (or restart) from the beginning
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.iteration = 0;
        self.status = AnimatorStatus::Running;
        self.pending_start = true;
    }

    /// Current eased fraction
    pub fn fraction(&self) -> f32 {
        let raw = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        };
        let raw = match self.repeat_mode {
            RepeatMode::Reverse if self.iteration % 2 == 1 => 1.0 - raw,
            _ => raw,
        };
        self.easing.apply(raw)
    }

    /// Advance by `dt_ms`; `None` unless running
    pub fn tick(&mut self, dt_ms: f32) -> Option<AnimatorTick> {
        if self.status != AnimatorStatus::Running {
            return None;
        }

        let started = std::mem::take(&mut self.pending_start);
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }

        if self.duration_ms <= 0.0 {
            return Some(self.finish(started));
        }

        if self.elapsed_ms >= self.duration_ms {
            let completed = (self.elapsed_ms / self.duration_ms).floor();
            let repeats_left = match self.repeat {
                RepeatCount::Once => Some(0),
                RepeatCount::Times(n) => Some(n.saturating_sub(self.iteration)),
                RepeatCount::Infinite => None,
            };
            match repeats_left {
                Some(left) if completed as u32 > left => return Some(self.finish(started)),
                _ => {
                    self.iteration = self.iteration.wrapping_add(completed as u32);
                    self.elapsed_ms -= completed * self.duration_ms;
                }
            }
        }

        Some(AnimatorTick {
            fraction: self.fraction(),
            started,
            ended: false,
        })
    }

    /// Jump to the final value; returns the closing tick if it was running
    pub fn end(&mut self) -> Option<AnimatorTick> {
        if self.status != AnimatorStatus::Running {
            return None;
        }
        let started = std::mem::take(&mut self.pending_start);
        Some(self.finish(started))
    }

    /// Stop where it is without reaching the final value
    pub fn cancel(&mut self) {
        if self.status == AnimatorStatus::Running {
            self.status = AnimatorStatus::Cancelled;
            self.pending_start = false;
        }
    }

    fn finish(&mut self, started: bool) -> AnimatorTick {
        self.elapsed_ms = self.duration_ms.max(0.0);
        self.status = AnimatorStatus::Finished;
        AnimatorTick {
            fraction: self.fraction(),
            started,
            ended: true,
        }
    }
}
