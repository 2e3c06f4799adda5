//! Animation scheduler
//!
//! Owns a set of animators and advances them together each frame.

use std::time::Instant;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::animator::{AnimatorTick, ValueAnimator};

new_key_type! {
    pub struct AnimatorId;
}

/// Measures the time between host frames
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last_frame: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call; zero on the first frame
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32() * 1000.0)
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        dt
    }

    /// Forget the last frame, e.g. after the loop was paused
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}

/// The animation scheduler that ticks all registered animators
#[derive(Default)]
pub struct AnimationScheduler {
    animators: SlotMap<AnimatorId, ValueAnimator>,
    clock: FrameClock,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            animators: SlotMap::with_key(),
            clock: FrameClock::new(),
        }
    }

    pub fn add(&mut self, animator: ValueAnimator) -> AnimatorId {
        self.animators.insert(animator)
    }

    pub fn get(&self, id: AnimatorId) -> Option<&ValueAnimator> {
        self.animators.get(id)
    }

    pub fn get_mut(&mut self, id: AnimatorId) -> Option<&mut ValueAnimator> {
        self.animators.get_mut(id)
    }

    pub fn remove(&mut self, id: AnimatorId) -> Option<ValueAnimator> {
        self.animators.remove(id)
    }

    pub fn clear(&mut self) {
        if !self.animators.is_empty() {
            tracing::trace!(count = self.animators.len(), "clearing animators");
        }
        self.animators.clear();
    }

    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    /// Tick all animators by `dt_ms`, reporting the ones that produced a frame
    pub fn tick(&mut self, dt_ms: f32) -> SmallVec<[(AnimatorId, AnimatorTick); 4]> {
        self.animators
            .iter_mut()
            .filter_map(|(id, animator)| animator.tick(dt_ms).map(|tick| (id, tick)))
            .collect()
    }

    /// Tick using wall-clock time between calls
    pub fn tick_at(&mut self, now: Instant) -> SmallVec<[(AnimatorId, AnimatorTick); 4]> {
        let dt = self.clock.tick(now);
        self.tick(dt)
    }

    /// Check if any animators are still running
    pub fn has_active_animations(&self) -> bool {
        self.animators.values().any(ValueAnimator::is_running)
    }
}
