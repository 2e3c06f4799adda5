//! Bones Animation System
//!
//! Frame-driven animators for shimmer sweeps and cross-fades.
//!
//! # Features
//!
//! - **Easing**: CSS-style curves plus the interpolators mobile toolkits ship
//! - **Value animators**: 0..1 fractions advanced by host frame deltas, with
//!   repeat modes, `end` and `cancel`
//! - **Scheduler**: ticks a set of animators together from one frame clock

pub mod animator;
pub mod easing;
pub mod math;
pub mod scheduler;

pub use animator::{AnimatorStatus, AnimatorTick, RepeatCount, RepeatMode, ValueAnimator};
pub use easing::{Easing, ParseEasingError};
pub use math::map_range;
pub use scheduler::{AnimationScheduler, AnimatorId, FrameClock};
