//! Loader configuration (bones.toml)
//!
//! Every field has a default, so an empty document is a valid
//! configuration and equals [`LoaderConfig::default`]. Lengths are in
//! density-independent pixels and converted with [`LoaderConfig::dp`].

use std::fs;
use std::path::Path;

use bones_animation::Easing;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse loader config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read loader config: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown easing: {0}")]
    UnknownEasing(String),

    #[error("invalid loader config: {0}")]
    Invalid(String),
}

/// Top-level loader configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// Pixels per density-independent pixel
    #[serde(default = "default_density")]
    pub density: f32,
    #[serde(default)]
    pub bone: BoneConfig,
    #[serde(default)]
    pub skeleton: SkeletonConfig,
    #[serde(default)]
    pub shimmer: ShimmerConfig,
}

fn default_density() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

/// Defaults for individual bones
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BoneConfig {
    #[serde(default = "default_thickness")]
    pub min_thickness_dp: f32,
    #[serde(default = "default_thickness")]
    pub max_thickness_dp: f32,
    /// Gap between the lines of a dissected bone
    #[serde(default = "default_section_distance")]
    pub section_distance_dp: f32,
    /// Inner height must reach `max_thickness * overflow` to dissect
    #[serde(default = "default_overflow_threshold")]
    pub overflow_threshold: f32,
    /// Inner height must exceed `(max_thickness + distance) * height` to dissect
    #[serde(default = "default_height_threshold")]
    pub height_threshold: f32,
    /// Fill used when neither the bone nor its owner provides a color
    #[serde(default = "default_bone_color")]
    pub color: u32,
    #[serde(default = "default_bone_transition")]
    pub transition_duration_ms: u64,
}

fn default_thickness() -> f32 {
    10.0
}

fn default_section_distance() -> f32 {
    10.0
}

fn default_overflow_threshold() -> f32 {
    2.5
}

fn default_height_threshold() -> f32 {
    1.5
}

fn default_bone_color() -> u32 {
    0xFFE0_E0E0
}

fn default_bone_transition() -> u64 {
    2000
}

impl Default for BoneConfig {
    fn default() -> Self {
        Self {
            min_thickness_dp: default_thickness(),
            max_thickness_dp: default_thickness(),
            section_distance_dp: default_section_distance(),
            overflow_threshold: default_overflow_threshold(),
            height_threshold: default_height_threshold(),
            color: default_bone_color(),
            transition_duration_ms: default_bone_transition(),
        }
    }
}

/// Defaults for whole-container skeletons
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SkeletonConfig {
    #[serde(default = "default_state_transition")]
    pub state_transition_duration_ms: u64,
    #[serde(default = "default_true")]
    pub use_state_transition: bool,
    #[serde(default = "default_true")]
    pub allow_shadows: bool,
    #[serde(default = "default_shadow_color")]
    pub shadow_color: u32,
    /// Elevation at which shadows stop growing
    #[serde(default = "default_max_elevation")]
    pub max_elevation_dp: f32,
    #[serde(default)]
    pub animate_restored_bounds: bool,
}

fn default_state_transition() -> u64 {
    250
}

fn default_shadow_color() -> u32 {
    0x3000_0000
}

fn default_max_elevation() -> f32 {
    24.0
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            state_transition_duration_ms: default_state_transition(),
            use_state_transition: true,
            allow_shadows: true,
            shadow_color: default_shadow_color(),
            max_elevation_dp: default_max_elevation(),
            animate_restored_bounds: false,
        }
    }
}

/// Defaults for shimmer rays
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ShimmerConfig {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "default_tilt")]
    pub tilt: f32,
    /// Ray thickness as a fraction of the swept width
    #[serde(default = "default_thickness_ratio")]
    pub thickness_ratio: f32,
    #[serde(default = "default_shimmer_duration")]
    pub duration_ms: u64,
    #[serde(default = "default_easing")]
    pub easing: String,
    #[serde(default = "default_true")]
    pub shared_easing: bool,
    #[serde(default = "default_ray_color")]
    pub color: u32,
}

fn default_tilt() -> f32 {
    -0.3
}

fn default_thickness_ratio() -> f32 {
    0.45
}

fn default_shimmer_duration() -> u64 {
    2000
}

fn default_easing() -> String {
    "fast_out_slow_in".to_string()
}

fn default_ray_color() -> u32 {
    0xFFFF_FFFF
}

impl Default for ShimmerConfig {
    fn default() -> Self {
        Self {
            count: 0,
            tilt: default_tilt(),
            thickness_ratio: default_thickness_ratio(),
            duration_ms: default_shimmer_duration(),
            easing: default_easing(),
            shared_easing: true,
            color: default_ray_color(),
        }
    }
}

impl ShimmerConfig {
    /// The configured easing, or fast-out-slow-in when the name is unknown
    pub fn easing(&self) -> Easing {
        match self.easing.parse() {
            Ok(easing) => easing,
            Err(err) => {
                tracing::warn!(%err, "falling back to fast_out_slow_in");
                Easing::FAST_OUT_SLOW_IN
            }
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            bone: BoneConfig::default(),
            skeleton: SkeletonConfig::default(),
            shimmer: ShimmerConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LoaderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading loader config");
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Convert density-independent pixels to pixels
    pub fn dp(&self, value: f32) -> f32 {
        value * self.density
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if self.shimmer.easing.parse::<Easing>().is_err() {
            return Err(ConfigError::UnknownEasing(self.shimmer.easing.clone()));
        }
        if self.bone.min_thickness_dp > self.bone.max_thickness_dp {
            tracing::warn!(
                min = self.bone.min_thickness_dp,
                max = self.bone.max_thickness_dp,
                "min thickness above max, max will be raised"
            );
        }
        Ok(())
    }
}
