//! Per-bone properties

use std::fmt;
use std::rc::Rc;

use bones_paint::{CornerRadii, MutableColor};

use crate::config::LoaderConfig;
use crate::properties::shimmer::ShimmerRayProperties;
use crate::properties::state::StateBridge;

/// Outline of a bone
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeType {
    #[default]
    Rectangular,
    Circular,
}

/// Ratios deciding when a text bone is split into lines
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DissectionThresholds {
    /// Inner height must reach `max_thickness * overflow`
    pub overflow: f32,
    /// Inner height must exceed `(max_thickness + section_distance) * height`
    pub height: f32,
}

impl Default for DissectionThresholds {
    fn default() -> Self {
        Self {
            overflow: 2.5,
            height: 1.5,
        }
    }
}

/// Styling and sizing of one placeholder shape
///
/// `None` on the inheritable fields (`color`, `shape_type`,
/// `corner_radii`) means "take it from the owner's background".
pub struct BoneProperties {
    pub color: Option<MutableColor>,
    pub shape_type: Option<ShapeType>,
    pub corner_radii: Option<CornerRadii>,
    pub min_thickness: f32,
    pub max_thickness: f32,
    /// Gap between the lines of a dissected bone
    pub section_distance: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Minimum size installed while repairing a zero-sized owner
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub dissect_bones: Option<bool>,
    /// RGB scale applied to the resolved color
    pub shade_multiplier: f32,
    /// Cover the owner's padded box instead of a clamped bar
    pub match_owners_bounds: bool,
    pub translation_x: f32,
    pub translation_y: f32,
    /// Hide the owner's content while the bone is shown
    pub toggle_view: bool,
    pub allow_saved_state: bool,
    pub allow_weak_saved_state: bool,
    pub transition_duration_ms: u64,
    pub thresholds: DissectionThresholds,
    /// Color used when neither `color` nor the owner provides one
    pub fallback_color: MutableColor,
    shimmer: Option<ShimmerRayProperties>,
    enabled: bool,
    disposed: bool,
    bridge: Option<Rc<dyn StateBridge>>,
}

impl BoneProperties {
    pub fn new() -> Self {
        Self::from_config(&LoaderConfig::default())
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            color: None,
            shape_type: None,
            corner_radii: None,
            min_thickness: config.dp(config.bone.min_thickness_dp),
            max_thickness: config.dp(config.bone.max_thickness_dp),
            section_distance: config.dp(config.bone.section_distance_dp),
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            dissect_bones: None,
            shade_multiplier: 1.0,
            match_owners_bounds: false,
            translation_x: 0.0,
            translation_y: 0.0,
            toggle_view: true,
            allow_saved_state: false,
            allow_weak_saved_state: false,
            transition_duration_ms: config.bone.transition_duration_ms,
            thresholds: DissectionThresholds {
                overflow: config.bone.overflow_threshold,
                height: config.bone.height_threshold,
            },
            fallback_color: MutableColor::from_argb(config.bone.color),
            shimmer: None,
            enabled: true,
            disposed: false,
            bridge: None,
        }
    }

    // === Enabled state ===

    pub fn enabled(&self) -> bool {
        match &self.bridge {
            Some(bridge) => bridge.enabled(),
            None => self.enabled,
        }
    }

    /// Routed to the attached loader if there is one
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if let Some(bridge) = &self.bridge {
            bridge.set_enabled(enabled);
        }
    }

    /// Route `enabled` through a loader from now on
    pub fn attach_bridge(&mut self, bridge: Rc<dyn StateBridge>) {
        self.enabled = bridge.enabled();
        self.bridge = Some(bridge);
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(crate) fn mark_disposed(&mut self) {
        self.disposed = true;
    }

    // === Shimmer ===

    pub fn shimmer_ray_properties(&self) -> Option<&ShimmerRayProperties> {
        self.shimmer.as_ref()
    }

    /// Created on first access
    pub fn shimmer_ray_properties_mut(&mut self) -> &mut ShimmerRayProperties {
        self.shimmer.get_or_insert_with(ShimmerRayProperties::default)
    }

    pub fn set_shimmer_ray_properties(&mut self, shimmer: Option<ShimmerRayProperties>) {
        self.shimmer = shimmer;
    }

    /// `(min, max)` thickness with bad input corrected
    pub fn thickness_range(&self) -> (f32, f32) {
        let sanitize = |value: f32, name: &str| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                tracing::warn!(value, name, "invalid bone thickness, using 0");
                0.0
            }
        };
        let min = sanitize(self.min_thickness, "min_thickness");
        let max = sanitize(self.max_thickness, "max_thickness");
        if max < min {
            tracing::warn!(min, max, "max thickness below min, raising max");
            (min, min)
        } else {
            (min, max)
        }
    }

    // === Lifecycle ===

    /// Detached copy for the saved-state store
    pub fn snapshot(&self) -> BoneSnapshot {
        BoneSnapshot(self.clone())
    }

    /// Take every stored value from `snapshot`, keeping the current bridge
    pub fn restore(&mut self, snapshot: &BoneSnapshot) {
        let bridge = self.bridge.take();
        let enabled = self.enabled();
        *self = snapshot.0.clone();
        self.enabled = enabled;
        self.bridge = bridge;
    }

    /// Forget loader bindings so the properties can serve another element
    pub fn reset_for_reuse(&mut self) {
        self.bridge = None;
        self.enabled = true;
        self.disposed = false;
    }
}

impl Default for BoneProperties {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies are detached: they carry the current enabled value, not the bridge
impl Clone for BoneProperties {
    fn clone(&self) -> Self {
        Self {
            color: self.color.clone(),
            shape_type: self.shape_type,
            corner_radii: self.corner_radii,
            min_thickness: self.min_thickness,
            max_thickness: self.max_thickness,
            section_distance: self.section_distance,
            width: self.width,
            height: self.height,
            min_width: self.min_width,
            min_height: self.min_height,
            dissect_bones: self.dissect_bones,
            shade_multiplier: self.shade_multiplier,
            match_owners_bounds: self.match_owners_bounds,
            translation_x: self.translation_x,
            translation_y: self.translation_y,
            toggle_view: self.toggle_view,
            allow_saved_state: self.allow_saved_state,
            allow_weak_saved_state: self.allow_weak_saved_state,
            transition_duration_ms: self.transition_duration_ms,
            thresholds: self.thresholds,
            fallback_color: self.fallback_color.clone(),
            shimmer: self.shimmer.clone(),
            enabled: self.enabled(),
            disposed: self.disposed,
            bridge: None,
        }
    }
}

impl fmt::Debug for BoneProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoneProperties")
            .field("color", &self.color)
            .field("shape_type", &self.shape_type)
            .field("min_thickness", &self.min_thickness)
            .field("max_thickness", &self.max_thickness)
            .field("dissect_bones", &self.dissect_bones)
            .field("match_owners_bounds", &self.match_owners_bounds)
            .field("enabled", &self.enabled())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

/// Saved copy of [`BoneProperties`]
#[derive(Clone, Debug)]
pub struct BoneSnapshot(BoneProperties);

impl BoneSnapshot {
    pub fn properties(&self) -> &BoneProperties {
        &self.0
    }
}
