//! Skeleton-wide properties

use std::fmt;
use std::rc::Rc;

use bones_core::ElementId;
use bones_paint::{CornerRadii, MutableColor};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::config::LoaderConfig;
use crate::properties::bone::BoneProperties;
use crate::properties::shimmer::ShimmerRayProperties;
use crate::properties::state::StateBridge;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Properties of a whole-container skeleton and of its bones
///
/// Bones without an entry of their own read the bone template; the first
/// mutable access copies the template into a per-element entry.
pub struct SkeletonProperties {
    pub allow_shadows: bool,
    /// Draw bones; when false only the background and rays are drawn
    pub allow_bone_generation: bool,
    pub shadow_color: MutableColor,
    /// Elevation, in pixels, at which shadows stop growing
    pub max_shadow_elevation: f32,
    pub shimmer_ray_properties: ShimmerRayProperties,
    pub state_transition_duration_ms: u64,
    pub use_state_transition: bool,
    pub background_color: Option<MutableColor>,
    pub corner_radii: Option<CornerRadii>,
    pub allow_saved_state: bool,
    pub allow_weak_saved_state: bool,
    /// Animate the parent while temporary minimum sizes are in place
    pub animate_restored_bounds: bool,
    template: BoneProperties,
    bones: FxIndexMap<ElementId, BoneProperties>,
    ignored: FxHashSet<ElementId>,
    disposed: FxHashSet<ElementId>,
    state_owners: FxIndexMap<ElementId, bool>,
    waiting: bool,
    enabled: bool,
    bridge: Option<Rc<dyn StateBridge>>,
}

impl SkeletonProperties {
    pub fn new() -> Self {
        Self::from_config(&LoaderConfig::default())
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            allow_shadows: config.skeleton.allow_shadows,
            allow_bone_generation: true,
            shadow_color: MutableColor::from_argb(config.skeleton.shadow_color),
            max_shadow_elevation: config.dp(config.skeleton.max_elevation_dp),
            shimmer_ray_properties: ShimmerRayProperties::from_config(config),
            state_transition_duration_ms: config.skeleton.state_transition_duration_ms,
            use_state_transition: config.skeleton.use_state_transition,
            background_color: None,
            corner_radii: None,
            allow_saved_state: false,
            allow_weak_saved_state: false,
            animate_restored_bounds: config.skeleton.animate_restored_bounds,
            template: BoneProperties::from_config(config),
            bones: FxIndexMap::default(),
            ignored: FxHashSet::default(),
            disposed: FxHashSet::default(),
            state_owners: FxIndexMap::default(),
            waiting: false,
            enabled: false,
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

    /// Request a state change
    ///
    /// Disabling is deferred while any state owner is registered; the
    /// loader retries on every frame until the owners are gone.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled || self.state_owners.is_empty() {
            self.waiting = false;
            self.write_enabled(enabled);
        } else {
            tracing::debug!(owners = self.state_owners.len(), "disable deferred until state owners drain");
            self.waiting = true;
        }
    }

    fn write_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if let Some(bridge) = &self.bridge {
            bridge.set_enabled(enabled);
        }
    }

    /// A disable request is parked behind state owners
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn attach_bridge(&mut self, bridge: Rc<dyn StateBridge>) {
        self.enabled = bridge.enabled();
        self.bridge = Some(bridge);
    }

    // === Bone properties ===

    /// Defaults for bones without their own entry
    pub fn bone_template(&self) -> &BoneProperties {
        &self.template
    }

    pub fn bone_template_mut(&mut self) -> &mut BoneProperties {
        &mut self.template
    }

    /// Entry for `id`, or the template; never inserts
    pub fn get_or_default(&self, id: ElementId) -> &BoneProperties {
        self.bones.get(&id).unwrap_or(&self.template)
    }

    /// Entry for `id`, copied from the template on first access
    pub fn get_or_create_mut(&mut self, id: ElementId) -> &mut BoneProperties {
        let template = &self.template;
        self.bones.entry(id).or_insert_with(|| template.clone())
    }

    pub fn has_bone_properties(&self, id: ElementId) -> bool {
        self.bones.contains_key(&id)
    }

    pub fn set_bone_properties(&mut self, id: ElementId, props: BoneProperties) {
        self.bones.insert(id, props);
    }

    pub fn remove_bone_properties(&mut self, id: ElementId) -> Option<BoneProperties> {
        self.bones.shift_remove(&id)
    }

    pub fn bone_properties(&self) -> impl Iterator<Item = (ElementId, &BoneProperties)> {
        self.bones.iter().map(|(id, props)| (*id, props))
    }

    // === Ignored and disposed elements ===

    pub fn add_ignored(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ignored.extend(ids);
    }

    pub fn remove_ignored(&mut self, id: ElementId) -> bool {
        self.ignored.remove(&id)
    }

    pub fn is_ignored(&self, id: ElementId) -> bool {
        self.ignored.contains(&id)
    }

    pub(crate) fn add_disposed(&mut self, id: ElementId) {
        self.disposed.insert(id);
    }

    pub fn is_disposed(&self, id: ElementId) -> bool {
        self.disposed.contains(&id)
    }

    pub fn disposed_count(&self) -> usize {
        self.disposed.len()
    }

    /// Whether a bone may be generated for `id`
    pub fn is_eligible(&self, id: ElementId) -> bool {
        !self.ignored.contains(&id) && !self.disposed.contains(&id)
    }

    // === State owners ===

    /// Register (`true`) or drop (`false`) an element whose own loading
    /// must finish before this skeleton may disable
    pub fn set_state_owner(&mut self, id: ElementId, owner: bool) {
        if owner {
            self.state_owners.insert(id, true);
        } else {
            self.state_owners.shift_remove(&id);
        }
    }

    pub fn has_state_owner(&self, id: ElementId) -> bool {
        self.state_owners.contains_key(&id)
    }

    pub fn remove_state_owner(&mut self, id: ElementId) {
        self.state_owners.shift_remove(&id);
    }

    pub fn clear_state_owners(&mut self) {
        self.state_owners.clear();
    }

    pub fn state_owner_count(&self) -> usize {
        self.state_owners.len()
    }

    // === Lifecycle ===

    /// Detached copy of the configuration
    ///
    /// Runtime bookkeeping (state owners, disposed ids, a parked disable)
    /// belongs to the current attachment and is not saved.
    pub fn snapshot(&self) -> SkeletonSnapshot {
        SkeletonSnapshot(self.detached_copy())
    }

    /// Take every saved value from `snapshot`, keeping the bridge and
    /// this instance's runtime bookkeeping
    pub fn restore(&mut self, snapshot: &SkeletonSnapshot) {
        let saved = snapshot.0.detached_copy();
        self.allow_shadows = saved.allow_shadows;
        self.allow_bone_generation = saved.allow_bone_generation;
        self.shadow_color = saved.shadow_color;
        self.max_shadow_elevation = saved.max_shadow_elevation;
        self.shimmer_ray_properties = saved.shimmer_ray_properties;
        self.state_transition_duration_ms = saved.state_transition_duration_ms;
        self.use_state_transition = saved.use_state_transition;
        self.background_color = saved.background_color;
        self.corner_radii = saved.corner_radii;
        self.allow_saved_state = saved.allow_saved_state;
        self.allow_weak_saved_state = saved.allow_weak_saved_state;
        self.animate_restored_bounds = saved.animate_restored_bounds;
        self.template = saved.template;
        self.bones = saved.bones;
        self.ignored = saved.ignored;
    }

    /// Forget everything tied to the current container
    pub fn reset_for_reuse(&mut self) {
        self.bones.clear();
        self.ignored.clear();
        self.disposed.clear();
        self.state_owners.clear();
        self.waiting = false;
        self.enabled = false;
        self.bridge = None;
        self.template.reset_for_reuse();
    }

    fn detached_copy(&self) -> Self {
        let bones = self
            .bones
            .iter()
            .map(|(id, props)| {
                let mut props = props.clone();
                props.reset_for_reuse();
                (*id, props)
            })
            .collect();
        Self {
            allow_shadows: self.allow_shadows,
            allow_bone_generation: self.allow_bone_generation,
            shadow_color: self.shadow_color.clone(),
            max_shadow_elevation: self.max_shadow_elevation,
            shimmer_ray_properties: self.shimmer_ray_properties.clone(),
            state_transition_duration_ms: self.state_transition_duration_ms,
            use_state_transition: self.use_state_transition,
            background_color: self.background_color.clone(),
            corner_radii: self.corner_radii,
            allow_saved_state: self.allow_saved_state,
            allow_weak_saved_state: self.allow_weak_saved_state,
            animate_restored_bounds: self.animate_restored_bounds,
            template: self.template.clone(),
            bones,
            ignored: self.ignored.clone(),
            disposed: FxHashSet::default(),
            state_owners: FxIndexMap::default(),
            waiting: false,
            enabled: false,
            bridge: None,
        }
    }
}

impl Default for SkeletonProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SkeletonProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkeletonProperties")
            .field("enabled", &self.enabled())
            .field("waiting", &self.waiting)
            .field("bones", &self.bones.len())
            .field("ignored", &self.ignored.len())
            .field("disposed", &self.disposed.len())
            .field("state_owners", &self.state_owners.len())
            .field("use_state_transition", &self.use_state_transition)
            .finish_non_exhaustive()
    }
}

/// Saved copy of [`SkeletonProperties`]
#[derive(Debug)]
pub struct SkeletonSnapshot(SkeletonProperties);

impl Clone for SkeletonSnapshot {
    fn clone(&self) -> Self {
        Self(self.0.detached_copy())
    }
}

impl SkeletonSnapshot {
    pub fn properties(&self) -> &SkeletonProperties {
        &self.0
    }
}
