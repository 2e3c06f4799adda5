//! Shimmer ray properties

use bones_animation::Easing;
use bones_paint::MutableColor;

use crate::config::{LoaderConfig, ShimmerConfig};

/// Tunables for the light rays swept across a placeholder
#[derive(Clone, Debug, PartialEq)]
pub struct ShimmerRayProperties {
    pub color: MutableColor,
    /// Horizontal skew applied to every ray
    pub tilt: f32,
    /// Number of rays per sweep; zero disables the shimmer
    pub count: usize,
    /// Absolute ray thickness; overrides `thickness_ratio` when set
    pub thickness: Option<f32>,
    /// Ray thickness as a fraction of the swept width
    pub thickness_ratio: f32,
    pub animation_duration_ms: u64,
    pub easing: Easing,
    /// One easing for the whole sweep instead of one per ray
    pub shared_easing: bool,
    pub(crate) speed_multiplier: f32,
}

impl ShimmerRayProperties {
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::from_shimmer_config(&config.shimmer)
    }

    fn from_shimmer_config(shimmer: &ShimmerConfig) -> Self {
        Self {
            color: MutableColor::from_argb(shimmer.color),
            tilt: shimmer.tilt,
            count: shimmer.count,
            thickness: None,
            thickness_ratio: shimmer.thickness_ratio,
            animation_duration_ms: shimmer.duration_ms,
            easing: shimmer.easing(),
            shared_easing: shimmer.shared_easing,
            speed_multiplier: 1.0,
        }
    }

    /// Stored multiplier; higher input speeds produce a smaller value
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Speed up (`> 1`) or slow down (`< 1`) the sweep
    pub fn set_speed_multiplier(&mut self, speed: f32) {
        let speed = if speed.is_finite() { speed } else { 1.0 };
        self.speed_multiplier = 2.0 - speed;
    }

    /// Duration of one full sweep, never below one millisecond
    pub fn cycle_duration_ms(&self) -> u64 {
        let scaled = self.animation_duration_ms as f32 * self.speed_multiplier;
        if scaled.is_finite() {
            scaled.round().max(1.0) as u64
        } else {
            1
        }
    }
}

impl Default for ShimmerRayProperties {
    fn default() -> Self {
        Self::from_shimmer_config(&ShimmerConfig::default())
    }
}
