//! Standalone bone
//!
//! A single placeholder drawn in its owner's own coordinate space.

use bones_core::ElementId;
use bones_layout::{LayoutHost, Visibility};
use bones_paint::{Bounds, PaintContext, Path, Point};

use crate::geometry::{compute_bone_geometry, OwnerMetrics};
use crate::properties::BoneProperties;
use crate::shape::{resolve_color, resolve_corner_radii, resolve_shape_type, BoneShape};
use crate::shimmer::ShimmerRay;

#[derive(Clone, Debug)]
pub struct Bone {
    owner: ElementId,
    shape: BoneShape,
}

impl Bone {
    pub fn new(owner: ElementId) -> Self {
        Self {
            owner,
            shape: BoneShape::new(),
        }
    }

    pub fn owner(&self) -> ElementId {
        self.owner
    }

    pub fn shape(&self) -> &BoneShape {
        &self.shape
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.shape.bounds()
    }

    /// Recompute from the owner's current measurements
    ///
    /// Returns false, leaving nothing to draw, when the owner has no area.
    pub fn compute(&mut self, host: &dyn LayoutHost, props: &BoneProperties) -> bool {
        let owner = self.owner;
        let metrics = OwnerMetrics::new(
            Point::ZERO,
            host.measured_size(owner),
            host.padding(owner),
            host.kind(owner),
        );
        let Some(geometry) = compute_bone_geometry(&metrics, props) else {
            tracing::trace!(%owner, "bone owner has no area");
            self.shape.clear();
            return false;
        };

        let background = host.background(owner);
        let rays = props
            .shimmer_ray_properties()
            .map(|shimmer| ShimmerRay::build_rays(geometry.bounds, shimmer))
            .unwrap_or_default();
        self.shape.apply(
            geometry,
            resolve_shape_type(props, background.as_ref()),
            resolve_corner_radii(props, background.as_ref()),
            resolve_color(props, background.as_ref()),
            None,
            rays,
        );
        true
    }

    // === Owner content ===

    /// Show the owner at zero alpha so it fades in under the bone
    pub fn prepare_content_fade(&self, host: &mut dyn LayoutHost) {
        host.set_visibility(self.owner, Visibility::Visible);
        host.set_alpha(self.owner, 0.0);
    }

    pub fn fade_content(&self, host: &mut dyn LayoutHost, fraction: f32) {
        host.set_alpha(self.owner, fraction.clamp(0.0, 1.0));
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

    pub fn dispose(&mut self) {
        self.shape.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bones_layout::{Background, BackgroundShape, ElementKind, ElementTree};
    use bones_paint::MutableColor;

    use crate::properties::ShapeType;

    #[test]
    fn test_standalone_bone_covers_owner() {
        let mut tree = ElementTree::new();
        let avatar = tree.insert_root(ElementKind::Image);
        tree.set_size(avatar, 48.0, 48.0);
        tree.set_background(
            avatar,
            Some(Background::solid(MutableColor::rgb(9, 9, 9)).with_shape(BackgroundShape::Oval)),
        );

        let mut props = BoneProperties::new();
        props.match_owners_bounds = true;
        let mut bone = Bone::new(avatar);
        assert!(bone.compute(&tree, &props));
        assert_eq!(bone.bounds(), Some(Bounds::new(0.0, 0.0, 48.0, 48.0)));
        assert_eq!(bone.shape().shape_type(), ShapeType::Circular);
        assert_eq!(*bone.shape().color(), MutableColor::rgb(9, 9, 9));
    }

    #[test]
    fn test_zero_sized_owner_draws_nothing() {
        let mut tree = ElementTree::new();
        let label = tree.insert_root(ElementKind::Text);
        let mut bone = Bone::new(label);
        assert!(!bone.compute(&tree, &BoneProperties::new()));
        let mut ctx = PaintContext::new();
        assert!(bone.render(&mut ctx).is_none());
    }

    #[test]
    fn test_own_shimmer_builds_rays() {
        let mut tree = ElementTree::new();
        let label = tree.insert_root(ElementKind::Text);
        tree.set_size(label, 120.0, 16.0);
        let mut props = BoneProperties::new();
        props.shimmer_ray_properties_mut().count = 2;
        let mut bone = Bone::new(label);
        bone.compute(&tree, &props);
        assert_eq!(bone.shape().rays().len(), 2);
    }
}
