//! A bone inside a skeleton

use std::rc::Rc;

use bones_core::ElementId;
use bones_layout::{LayoutHost, Visibility};
use bones_paint::{Bounds, PaintContext, Path};

use crate::geometry::{compute_bone_geometry, OwnerMetrics};
use crate::properties::{BoneProperties, EnabledSignal, SkeletonProperties};
use crate::shadow::elevation_shadow;
use crate::shape::{resolve_color, resolve_corner_radii, resolve_shape_type, BoneShape};
use crate::shimmer::ShimmerRay;

/// Placeholder for one leaf element, positioned in container coordinates
///
/// The bone owns the enabled signal its properties read through, so a
/// per-bone disable request can be picked up by the skeleton's manager.
#[derive(Debug)]
pub struct SkeletonBone {
    id: ElementId,
    shape: BoneShape,
    signal: Rc<EnabledSignal>,
    toggle_view: bool,
}

impl SkeletonBone {
    pub fn new(id: ElementId, props: &mut BoneProperties) -> Self {
        let signal = EnabledSignal::new(props.enabled());
        props.attach_bridge(signal.clone());
        Self {
            id,
            shape: BoneShape::new(),
            signal,
            toggle_view: props.toggle_view,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn shape(&self) -> &BoneShape {
        &self.shape
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.shape.bounds()
    }

    pub fn is_computed(&self) -> bool {
        self.shape.is_computed()
    }

    pub fn signal(&self) -> &Rc<EnabledSignal> {
        &self.signal
    }

    /// Consume a pending request to disable this bone
    pub fn take_disable_request(&self) -> bool {
        matches!(self.signal.take_request(), Some(false))
    }

    pub fn compute(
        &mut self,
        host: &dyn LayoutHost,
        container: ElementId,
        props: &BoneProperties,
        skeleton: &SkeletonProperties,
    ) -> bool {
        let id = self.id;
        let origin = host
            .offset_within(container, id)
            .unwrap_or_else(|| host.position(id));
        let metrics = OwnerMetrics::new(origin, host.measured_size(id), host.padding(id), host.kind(id));
        self.toggle_view = props.toggle_view;

        let Some(geometry) = compute_bone_geometry(&metrics, props) else {
            tracing::trace!(%id, "skipping bone without area");
            self.shape.clear();
            return false;
        };

        let background = host.background(id);
        let shadow = if skeleton.allow_shadows && props.toggle_view {
            elevation_shadow(host.elevation(id), skeleton.max_shadow_elevation, &skeleton.shadow_color)
        } else {
            None
        };
        let rays = props
            .shimmer_ray_properties()
            .map(|shimmer| ShimmerRay::build_rays(geometry.bounds, shimmer))
            .unwrap_or_default();
        tracing::trace!(%id, bounds = ?geometry.bounds, "computed skeleton bone");
        self.shape.apply(
            geometry,
            resolve_shape_type(props, background.as_ref()),
            resolve_corner_radii(props, background.as_ref()),
            resolve_color(props, background.as_ref()),
            shadow,
            rays,
        );
        true
    }

    // === Owner content ===

    pub fn conceal_content(&self, host: &mut dyn LayoutHost) {
        if self.toggle_view {
            host.set_alpha(self.id, 0.0);
            host.set_visibility(self.id, Visibility::Invisible);
        }
    }

    pub fn reveal_content(&self, host: &mut dyn LayoutHost) {
        if self.toggle_view {
            host.set_alpha(self.id, 1.0);
            host.set_visibility(self.id, Visibility::Visible);
        }
    }

    /// Make content visible at zero alpha so it can fade in under the bone
    pub fn prepare_content_fade(&self, host: &mut dyn LayoutHost) {
        if self.toggle_view {
            host.set_visibility(self.id, Visibility::Visible);
            host.set_alpha(self.id, 0.0);
        }
    }

    pub fn fade_content(&self, host: &mut dyn LayoutHost, fraction: f32) {
        if self.toggle_view {
            host.set_alpha(self.id, fraction);
        }
    }

    // === Animation ===

    pub fn on_update(&mut self, fraction: f32) {
        self.shape.on_update(fraction);
    }

    pub fn on_fade(&mut self, fraction: f32) {
        self.shape.on_fade(fraction);
    }

    pub fn render(&self, ctx: &mut PaintContext) -> Option<Path> {
        self.shape.render(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bones_layout::{ElementKind, ElementTree};

    #[test]
    fn test_position_in_container_space() {
        let mut tree = ElementTree::new();
        let container = tree.insert_root(ElementKind::Generic);
        let row = tree.insert(container, ElementKind::Generic).unwrap();
        let label = tree.insert(row, ElementKind::Text).unwrap();
        tree.set_position(row, 0.0, 30.0);
        tree.set_position(label, 12.0, 0.0);
        tree.set_size(label, 80.0, 10.0);

        let skeleton = SkeletonProperties::new();
        let mut props = BoneProperties::new();
        let mut bone = SkeletonBone::new(label, &mut props);
        assert!(bone.compute(&tree, container, &props, &skeleton));
        assert_eq!(bone.bounds(), Some(Bounds::new(12.0, 30.0, 80.0, 10.0)));
    }

    #[test]
    fn test_shadow_only_for_elevated_owners() {
        let mut tree = ElementTree::new();
        let container = tree.insert_root(ElementKind::Generic);
        let card = tree.insert(container, ElementKind::Generic).unwrap();
        tree.set_size(card, 80.0, 10.0);

        let mut skeleton = SkeletonProperties::new();
        let mut props = BoneProperties::new();
        let mut bone = SkeletonBone::new(card, &mut props);
        bone.compute(&tree, container, &props, &skeleton);
        assert!(bone.shape().shadow().is_none());

        tree.set_elevation(card, 4.0);
        bone.compute(&tree, container, &props, &skeleton);
        assert!(bone.shape().shadow().is_some());

        skeleton.allow_shadows = false;
        bone.compute(&tree, container, &props, &skeleton);
        assert!(bone.shape().shadow().is_none());
    }

    #[test]
    fn test_visible_content_casts_no_shadow() {
        let mut tree = ElementTree::new();
        let container = tree.insert_root(ElementKind::Generic);
        let card = tree.insert(container, ElementKind::Generic).unwrap();
        tree.set_size(card, 80.0, 10.0);
        tree.set_elevation(card, 4.0);

        let skeleton = SkeletonProperties::new();
        let mut props = BoneProperties::new();
        props.toggle_view = false;
        let mut bone = SkeletonBone::new(card, &mut props);
        assert!(bone.compute(&tree, container, &props, &skeleton));
        assert!(bone.shape().shadow().is_none());

        props.toggle_view = true;
        bone.compute(&tree, container, &props, &skeleton);
        assert!(bone.shape().shadow().is_some());
    }

    #[test]
    fn test_content_toggling() {
        let mut tree = ElementTree::new();
        let container = tree.insert_root(ElementKind::Generic);
        let label = tree.insert(container, ElementKind::Text).unwrap();
        let mut props = BoneProperties::new();
        let bone = SkeletonBone::new(label, &mut props);

        bone.conceal_content(&mut tree);
        assert_eq!(tree.visibility(label), Visibility::Invisible);
        assert_eq!(tree.alpha(label), 0.0);

        bone.prepare_content_fade(&mut tree);
        assert_eq!(tree.visibility(label), Visibility::Visible);
        bone.fade_content(&mut tree, 0.4);
        assert_eq!(tree.alpha(label), 0.4);
    }

    #[test]
    fn test_untoggled_content_left_alone() {
        let mut tree = ElementTree::new();
        let container = tree.insert_root(ElementKind::Generic);
        let label = tree.insert(container, ElementKind::Text).unwrap();
        let mut props = BoneProperties::new();
        props.toggle_view = false;
        let bone = SkeletonBone::new(label, &mut props);
        bone.conceal_content(&mut tree);
        assert_eq!(tree.visibility(label), Visibility::Visible);
        assert_eq!(tree.alpha(label), 1.0);
    }

    #[test]
    fn test_disable_request_through_properties() {
        let mut props = BoneProperties::new();
        let bone = SkeletonBone::new(ElementId::new(3), &mut props);
        assert!(!bone.take_disable_request());
        props.set_enabled(false);
        assert!(bone.take_disable_request());
        assert!(!bone.take_disable_request());
    }
}
