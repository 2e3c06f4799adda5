//! Whole-container skeletons
//!
//! A [`Skeleton`] walks the leaf descendants of its container, keeps one
//! [`SkeletonBone`] per eligible leaf, and paints the container background,
//! the bones and the skeleton-level shimmer.
//!
//! Leaves measuring zero are repaired first (see [`BoundsRepair`]); the
//! build then waits for the host's next layout pass.

mod bone;
mod repair;

pub use bone::SkeletonBone;
pub use repair::BoundsRepair;

use bones_core::ElementId;
use bones_layout::{ElementKind, LayoutHost};
use bones_paint::{Bounds, CornerRadii, MutableColor, PaintContext, Path};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;

use crate::properties::SkeletonProperties;
use crate::shimmer::{ShimmerRay, ShimmerRays};

/// What a `compute` call did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputeOutcome {
    Built,
    /// Bounds were repaired; the build runs on the next layout completion
    Deferred,
}

#[derive(Debug, Default)]
pub struct Skeleton {
    container: Option<ElementId>,
    bounds: Bounds,
    background: Option<MutableColor>,
    corner_radii: CornerRadii,
    bones: IndexMap<ElementId, SkeletonBone, FxBuildHasher>,
    rays: ShimmerRays,
    repair: BoundsRepair,
    pending_build: bool,
    opacity: f32,
}

impl Skeleton {
    pub fn new() -> Self {
        Self {
            opacity: 1.0,
            ..Default::default()
        }
    }

    pub fn container(&self) -> Option<ElementId> {
        self.container
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_pending(&self) -> bool {
        self.pending_build
    }

    pub fn bone(&self, id: ElementId) -> Option<&SkeletonBone> {
        self.bones.get(&id)
    }

    pub fn bones(&self) -> impl Iterator<Item = &SkeletonBone> {
        self.bones.values()
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn rays(&self) -> &[ShimmerRay] {
        &self.rays
    }

    pub fn repair(&self) -> &BoundsRepair {
        &self.repair
    }

    fn eligible_leaves(host: &dyn LayoutHost, container: ElementId, props: &SkeletonProperties) -> Vec<ElementId> {
        host.descendant_leaves(container)
            .into_iter()
            .filter(|id| props.is_eligible(*id))
            .collect()
    }

    /// Repair zero-sized leaves, then build unless a layout pass is needed
    pub fn compute(
        &mut self,
        host: &mut dyn LayoutHost,
        container: ElementId,
        props: &mut SkeletonProperties,
    ) -> ComputeOutcome {
        self.container = Some(container);
        self.retain_bones(host, |id| props.is_eligible(id));

        let animate_with = props
            .animate_restored_bounds
            .then_some(props.state_transition_duration_ms);
        let mut repaired = 0usize;
        for id in Self::eligible_leaves(host, container, props) {
            if BoundsRepair::needs_repair(host, id) {
                self.repair.apply(host, id, props.get_or_default(id), animate_with);
                repaired += 1;
            }
        }

        if repaired > 0 {
            tracing::debug!(%container, repaired, "skeleton build deferred to next layout");
            self.pending_build = true;
            ComputeOutcome::Deferred
        } else {
            self.build(host, container, props);
            ComputeOutcome::Built
        }
    }

    /// Run a deferred build; returns true if one ran
    pub fn on_layout_complete(&mut self, host: &mut dyn LayoutHost, props: &mut SkeletonProperties) -> bool {
        match self.container {
            Some(container) if self.pending_build => {
                self.pending_build = false;
                self.build(host, container, props);
                true
            }
            _ => false,
        }
    }

    fn build(&mut self, host: &mut dyn LayoutHost, container: ElementId, props: &mut SkeletonProperties) {
        let (width, height) = host.measured_size(container);
        self.bounds = Bounds::new(0.0, 0.0, width.max(0.0), height.max(0.0));
        self.background = props.background_color.clone();
        self.corner_radii = props.corner_radii.unwrap_or(CornerRadii::ZERO);
        self.rays = ShimmerRay::build_rays(self.bounds, &props.shimmer_ray_properties);
        self.opacity = 1.0;

        if !props.allow_bone_generation {
            self.retain_bones(host, |_| false);
            return;
        }

        let leaves = Self::eligible_leaves(host, container, props);
        let eligible: FxHashSet<ElementId> = leaves.iter().copied().collect();
        self.retain_bones(host, |id| eligible.contains(&id));
        for id in leaves {
            let (width, height) = host.measured_size(id);
            if !(width > 0.0 && height > 0.0) || !props.get_or_default(id).enabled() {
                if let Some(bone) = self.bones.shift_remove(&id) {
                    bone.reveal_content(host);
                }
                continue;
            }

            if !self.bones.contains_key(&id) {
                let fresh = !props.has_bone_properties(id);
                let bone_props = props.get_or_create_mut(id);
                if fresh && host.kind(id) == ElementKind::Image {
                    bone_props.match_owners_bounds = true;
                }
                self.bones.insert(id, SkeletonBone::new(id, bone_props));
            }
            let props: &SkeletonProperties = props;
            if let Some(bone) = self.bones.get_mut(&id) {
                bone.compute(host, container, props.get_or_default(id), props);
            }
        }
        tracing::debug!(%container, bones = self.bones.len(), rays = self.rays.len(), "skeleton built");
    }

    /// Drop bones failing `keep`, handing their content back to the host
    fn retain_bones(&mut self, host: &mut dyn LayoutHost, mut keep: impl FnMut(ElementId) -> bool) {
        self.bones.retain(|id, bone| {
            let kept = keep(*id);
            if !kept {
                bone.reveal_content(host);
            }
            kept
        });
    }

    // === Owner content ===

    pub fn conceal_content(&self, host: &mut dyn LayoutHost) {
        for bone in self.bones.values() {
            bone.conceal_content(host);
        }
    }

    pub fn reveal_content(&self, host: &mut dyn LayoutHost) {
        for bone in self.bones.values() {
            bone.reveal_content(host);
        }
    }

    pub fn prepare_content_fade(&self, host: &mut dyn LayoutHost) {
        for bone in self.bones.values() {
            bone.prepare_content_fade(host);
        }
    }

    pub fn fade_content(&self, host: &mut dyn LayoutHost, fraction: f32) {
        for bone in self.bones.values() {
            bone.fade_content(host, fraction);
        }
    }

    /// Put back minimum sizes and parent transitions changed by repair
    pub fn restore(&mut self, host: &mut dyn LayoutHost) {
        self.repair.restore(host);
    }

    // === Per-bone disposal ===

    /// Bones whose properties asked to be disabled since the last call
    pub fn take_disable_requests(&self) -> SmallVec<[ElementId; 4]> {
        self.bones
            .values()
            .filter(|bone| bone.take_disable_request())
            .map(SkeletonBone::id)
            .collect()
    }

    pub fn bone_mut(&mut self, id: ElementId) -> Option<&mut SkeletonBone> {
        self.bones.get_mut(&id)
    }

    pub fn remove_bone(&mut self, host: &mut dyn LayoutHost, id: ElementId) -> Option<SkeletonBone> {
        self.repair.restore_one(host, id);
        self.bones.shift_remove(&id)
    }

    // === Animation ===

    pub fn on_update(&mut self, fraction: f32) {
        for ray in self.rays.iter_mut() {
            ray.on_update(fraction);
        }
        for bone in self.bones.values_mut() {
            bone.on_update(fraction);
        }
    }

    pub fn on_fade(&mut self, fraction: f32) {
        self.opacity = (1.0 - fraction).clamp(0.0, 1.0);
        for ray in self.rays.iter_mut() {
            ray.on_fade(fraction);
        }
        for bone in self.bones.values_mut() {
            bone.on_fade(fraction);
        }
    }

    // === Rendering ===

    /// Outline of the container, rounded by the skeleton's corner radii
    pub fn shape_path(&self) -> Path {
        let mut path = Path::new();
        if !self.bounds.is_empty() {
            path.add_round_rect(self.bounds, self.corner_radii);
        }
        path
    }

    /// Paint background, bones and rays
    ///
    /// Skeleton rays are clipped to the union of bone outlines, or to the
    /// container when bones are not generated.
    pub fn on_render(&self, ctx: &mut PaintContext, allow_bone_generation: bool) {
        let outline = self.shape_path();
        if let Some(background) = &self.background {
            let mut color = background.to_color();
            color.a *= self.opacity;
            ctx.fill_path(&outline, color);
        }

        if !allow_bone_generation {
            for ray in &self.rays {
                ray.render(ctx, &outline);
            }
            return;
        }

        let mut ray_clip = Path::new();
        for bone in self.bones.values() {
            if let Some(path) = bone.render(ctx) {
                ray_clip.add_path(&path);
            }
        }
        for ray in &self.rays {
            ray.render(ctx, &ray_clip);
        }
    }

    /// Drop every bone and ray; repaired bounds must be restored first
    pub fn dispose(&mut self) {
        self.bones.clear();
        self.rays.clear();
        self.pending_build = false;
        self.opacity = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bones_layout::{ElementTree, Visibility};

    struct Fixture {
        tree: ElementTree,
        container: ElementId,
        title: ElementId,
        body: ElementId,
        image: ElementId,
    }

    fn fixture() -> Fixture {
        let mut tree = ElementTree::new();
        let container = tree.insert_root(ElementKind::Generic);
        let title = tree.insert(container, ElementKind::Text).unwrap();
        let body = tree.insert(container, ElementKind::Text).unwrap();
        let image = tree.insert(container, ElementKind::Image).unwrap();
        tree.set_size(container, 200.0, 120.0);
        tree.set_size(title, 200.0, 8.0);
        tree.set_position(body, 0.0, 10.0);
        tree.set_size(body, 200.0, 40.0);
        tree.set_position(image, 0.0, 56.0);
        tree.set_size(image, 64.0, 64.0);
        tree.layout_pass();
        Fixture {
            tree,
            container,
            title,
            body,
            image,
        }
    }

    #[test]
    fn test_one_bone_per_leaf() {
        let mut f = fixture();
        let mut props = SkeletonProperties::new();
        let mut skeleton = Skeleton::new();
        assert_eq!(skeleton.compute(&mut f.tree, f.container, &mut props), ComputeOutcome::Built);
        assert_eq!(skeleton.bone_count(), 3);
        assert_eq!(skeleton.bone(f.title).and_then(SkeletonBone::bounds).map(|b| b.height), Some(10.0));
        assert_eq!(skeleton.bone(f.body).and_then(SkeletonBone::bounds).map(|b| b.height), Some(10.0));
        assert_eq!(
            skeleton.bone(f.image).and_then(SkeletonBone::bounds),
            Some(Bounds::new(0.0, 56.0, 64.0, 64.0))
        );
        assert!(props.get_or_default(f.image).match_owners_bounds);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut f = fixture();
        let mut props = SkeletonProperties::new();
        let mut skeleton = Skeleton::new();
        skeleton.compute(&mut f.tree, f.container, &mut props);
        let first: Vec<_> = skeleton.bones().map(|b| (b.id(), b.bounds())).collect();
        let signal = skeleton.bone(f.body).map(|b| b.signal().clone());

        skeleton.compute(&mut f.tree, f.container, &mut props);
        let second: Vec<_> = skeleton.bones().map(|b| (b.id(), b.bounds())).collect();
        assert_eq!(first, second);
        let again = skeleton.bone(f.body).map(|b| b.signal().clone());
        assert!(matches!((signal, again), (Some(a), Some(b)) if std::rc::Rc::ptr_eq(&a, &b)));
    }

    #[test]
    fn test_ignored_and_gone_leaves_skipped() {
        let mut f = fixture();
        let mut props = SkeletonProperties::new();
        let mut skeleton = Skeleton::new();
        skeleton.compute(&mut f.tree, f.container, &mut props);

        props.add_ignored([f.title]);
        f.tree.set_visibility(f.image, Visibility::Gone);
        skeleton.compute(&mut f.tree, f.container, &mut props);
        assert_eq!(skeleton.bone_count(), 1);
        assert!(skeleton.bone(f.title).is_none());
        assert!(skeleton.bone(f.body).is_some());
    }

    #[test]
    fn test_dropped_bone_hands_content_back() {
        let mut f = fixture();
        let mut props = SkeletonProperties::new();
        let mut skeleton = Skeleton::new();
        skeleton.compute(&mut f.tree, f.container, &mut props);
        skeleton.prepare_content_fade(&mut f.tree);
        skeleton.fade_content(&mut f.tree, 0.2);

        props.add_ignored([f.title]);
        props.get_or_create_mut(f.image).set_enabled(false);
        skeleton.compute(&mut f.tree, f.container, &mut props);
        skeleton.conceal_content(&mut f.tree);

        for id in [f.title, f.image] {
            assert_eq!(f.tree.visibility(id), Visibility::Visible);
            assert_eq!(f.tree.alpha(id), 1.0);
        }
        assert_eq!(f.tree.visibility(f.body), Visibility::Invisible);

        props.allow_bone_generation = false;
        skeleton.compute(&mut f.tree, f.container, &mut props);
        assert_eq!(f.tree.visibility(f.body), Visibility::Visible);
    }

    #[test]
    fn test_zero_sized_leaf_defers_build() {
        let mut f = fixture();
        f.tree.set_size(f.title, 200.0, 0.0);
        f.tree.layout_pass();
        let mut props = SkeletonProperties::new();
        let mut skeleton = Skeleton::new();

        assert_eq!(skeleton.compute(&mut f.tree, f.container, &mut props), ComputeOutcome::Deferred);
        assert!(skeleton.is_pending());
        assert_eq!(skeleton.bone_count(), 0);

        f.tree.layout_pass();
        assert!(skeleton.on_layout_complete(&mut f.tree, &mut props));
        assert_eq!(skeleton.bone_count(), 3);
        assert_eq!(f.tree.measured_size(f.title), (200.0, 10.0));

        skeleton.restore(&mut f.tree);
        f.tree.layout_pass();
        assert_eq!(f.tree.measured_size(f.title), (200.0, 0.0));
        assert!(!skeleton.on_layout_complete(&mut f.tree, &mut props));
    }

    #[test]
    fn test_without_bone_generation_only_rays() {
        let mut f = fixture();
        let mut props = SkeletonProperties::new();
        props.allow_bone_generation = false;
        props.shimmer_ray_properties.count = 1;
        props.background_color = Some(MutableColor::rgb(240, 240, 240));
        let mut skeleton = Skeleton::new();
        skeleton.compute(&mut f.tree, f.container, &mut props);
        assert_eq!(skeleton.bone_count(), 0);
        assert_eq!(skeleton.rays().len(), 1);

        let mut ctx = PaintContext::new();
        skeleton.on_render(&mut ctx, false);
        // background fill plus one balanced ray
        assert_eq!(ctx.commands().len(), 5);
        assert_eq!(ctx.save_count(), 0);
    }

    #[test]
    fn test_disabled_bone_properties_get_no_bone() {
        let mut f = fixture();
        let mut props = SkeletonProperties::new();
        props.get_or_create_mut(f.image).set_enabled(false);
        let mut skeleton = Skeleton::new();
        skeleton.compute(&mut f.tree, f.container, &mut props);
        assert!(skeleton.bone(f.image).is_none());
        assert_eq!(skeleton.bone_count(), 2);
    }

    #[test]
    fn test_fade_reaches_every_bone() {
        let mut f = fixture();
        let mut props = SkeletonProperties::new();
        let mut skeleton = Skeleton::new();
        skeleton.compute(&mut f.tree, f.container, &mut props);
        skeleton.on_fade(1.0);
        assert!(skeleton.bones().all(|b| b.shape().opacity() == 0.0));
    }
}
