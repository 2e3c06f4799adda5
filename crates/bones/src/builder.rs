//! Fluent property builders
//!
//! Builders borrow the properties they edit and hand themselves back from
//! every setter, so a configuration reads as one chain:
//!
//! ```ignore
//! drawable
//!     .builder()
//!     .shadows(false)
//!     .with_shimmer_builder(|rays| rays.count(2).tilt(-0.2))
//!     .with_bone_builder(title, |bone| bone.dissect(true).max_thickness(12.0));
//! ```

use bones_animation::Easing;
use bones_core::ElementId;
use bones_paint::{CornerRadii, MutableColor};

use crate::properties::{BoneProperties, ShapeType, ShimmerRayProperties, SkeletonProperties};

/// Edits shimmer ray properties in place
pub struct ShimmerRayBuilder<'a> {
    props: &'a mut ShimmerRayProperties,
}

impl<'a> ShimmerRayBuilder<'a> {
    pub fn new(props: &'a mut ShimmerRayProperties) -> Self {
        Self { props }
    }

    pub fn color(self, color: MutableColor) -> Self {
        self.props.color = color;
        self
    }

    pub fn tilt(self, tilt: f32) -> Self {
        self.props.tilt = tilt;
        self
    }

    /// Number of rays; zero disables the shimmer
    pub fn count(self, count: usize) -> Self {
        self.props.count = count;
        self
    }

    /// Fixed ray thickness in pixels, overriding the ratio
    pub fn thickness(self, thickness: f32) -> Self {
        self.props.thickness = Some(thickness);
        self
    }

    pub fn thickness_ratio(self, ratio: f32) -> Self {
        self.props.thickness_ratio = ratio;
        self
    }

    pub fn duration_ms(self, duration_ms: u64) -> Self {
        self.props.animation_duration_ms = duration_ms;
        self
    }

    pub fn speed(self, multiplier: f32) -> Self {
        self.props.set_speed_multiplier(multiplier);
        self
    }

    pub fn easing(self, easing: Easing) -> Self {
        self.props.easing = easing;
        self
    }

    /// Drive every ray with one eased animator instead of easing each ray
    pub fn shared_easing(self, shared: bool) -> Self {
        self.props.shared_easing = shared;
        self
    }

    pub fn properties(&self) -> &ShimmerRayProperties {
        self.props
    }
}

/// Edits bone properties in place
pub struct BoneBuilder<'a> {
    props: &'a mut BoneProperties,
}

impl<'a> BoneBuilder<'a> {
    pub fn new(props: &'a mut BoneProperties) -> Self {
        Self { props }
    }

    pub fn color(self, color: MutableColor) -> Self {
        self.props.color = Some(color);
        self
    }

    pub fn shape(self, shape: ShapeType) -> Self {
        self.props.shape_type = Some(shape);
        self
    }

    pub fn corner_radii(self, radii: CornerRadii) -> Self {
        self.props.corner_radii = Some(radii);
        self
    }

    pub fn rounded(self, radius: f32) -> Self {
        self.corner_radii(CornerRadii::uniform(radius))
    }

    pub fn min_thickness(self, thickness: f32) -> Self {
        self.props.min_thickness = thickness;
        self
    }

    pub fn max_thickness(self, thickness: f32) -> Self {
        self.props.max_thickness = thickness;
        self
    }

    /// Set both thickness bounds, fixing the bar height
    pub fn thickness(self, thickness: f32) -> Self {
        self.min_thickness(thickness).max_thickness(thickness)
    }

    pub fn section_distance(self, distance: f32) -> Self {
        self.props.section_distance = distance;
        self
    }

    pub fn width(self, width: f32) -> Self {
        self.props.width = Some(width);
        self
    }

    pub fn height(self, height: f32) -> Self {
        self.props.height = Some(height);
        self
    }

    pub fn min_size(self, width: f32, height: f32) -> Self {
        self.props.min_width = Some(width);
        self.props.min_height = Some(height);
        self
    }

    pub fn dissect(self, dissect: bool) -> Self {
        self.props.dissect_bones = Some(dissect);
        self
    }

    pub fn shade(self, multiplier: f32) -> Self {
        self.props.shade_multiplier = multiplier;
        self
    }

    pub fn match_owners_bounds(self, matching: bool) -> Self {
        self.props.match_owners_bounds = matching;
        self
    }

    pub fn translate(self, x: f32, y: f32) -> Self {
        self.props.translation_x = x;
        self.props.translation_y = y;
        self
    }

    pub fn toggle_view(self, toggle: bool) -> Self {
        self.props.toggle_view = toggle;
        self
    }

    pub fn saved_state(self, allow: bool) -> Self {
        self.props.allow_saved_state = allow;
        self
    }

    pub fn weak_saved_state(self, allow: bool) -> Self {
        self.props.allow_weak_saved_state = allow;
        self
    }

    pub fn transition_duration_ms(self, duration_ms: u64) -> Self {
        self.props.transition_duration_ms = duration_ms;
        self
    }

    pub fn enabled(self, enabled: bool) -> Self {
        self.props.set_enabled(enabled);
        self
    }

    /// Give this bone rays of its own
    pub fn with_shimmer_builder(self, build: impl FnOnce(ShimmerRayBuilder<'_>) -> ShimmerRayBuilder<'_>) -> Self {
        build(ShimmerRayBuilder::new(self.props.shimmer_ray_properties_mut()));
        self
    }

    pub fn properties(&self) -> &BoneProperties {
        self.props
    }
}

/// Edits skeleton properties in place
pub struct SkeletonBuilder<'a> {
    props: &'a mut SkeletonProperties,
}

impl<'a> SkeletonBuilder<'a> {
    pub fn new(props: &'a mut SkeletonProperties) -> Self {
        Self { props }
    }

    pub fn shadows(self, allow: bool) -> Self {
        self.props.allow_shadows = allow;
        self
    }

    pub fn shadow_color(self, color: MutableColor) -> Self {
        self.props.shadow_color = color;
        self
    }

    pub fn bone_generation(self, allow: bool) -> Self {
        self.props.allow_bone_generation = allow;
        self
    }

    pub fn state_transition_duration_ms(self, duration_ms: u64) -> Self {
        self.props.state_transition_duration_ms = duration_ms;
        self
    }

    pub fn state_transition(self, enabled: bool) -> Self {
        self.props.use_state_transition = enabled;
        self
    }

    pub fn background(self, color: MutableColor) -> Self {
        self.props.background_color = Some(color);
        self
    }

    pub fn corner_radii(self, radii: CornerRadii) -> Self {
        self.props.corner_radii = Some(radii);
        self
    }

    pub fn saved_state(self, allow: bool) -> Self {
        self.props.allow_saved_state = allow;
        self
    }

    pub fn weak_saved_state(self, allow: bool) -> Self {
        self.props.allow_weak_saved_state = allow;
        self
    }

    pub fn animate_restored_bounds(self, animate: bool) -> Self {
        self.props.animate_restored_bounds = animate;
        self
    }

    pub fn ignore(self, ids: impl IntoIterator<Item = ElementId>) -> Self {
        self.props.add_ignored(ids);
        self
    }

    pub fn state_owner(self, id: ElementId, owner: bool) -> Self {
        self.props.set_state_owner(id, owner);
        self
    }

    pub fn with_shimmer_builder(self, build: impl FnOnce(ShimmerRayBuilder<'_>) -> ShimmerRayBuilder<'_>) -> Self {
        build(ShimmerRayBuilder::new(&mut self.props.shimmer_ray_properties));
        self
    }

    /// Edit the defaults every bone without its own entry starts from
    pub fn with_bone_template(self, build: impl FnOnce(BoneBuilder<'_>) -> BoneBuilder<'_>) -> Self {
        build(BoneBuilder::new(self.props.bone_template_mut()));
        self
    }

    /// Edit the bone of one element, creating its entry if needed
    pub fn with_bone_builder(self, id: ElementId, build: impl FnOnce(BoneBuilder<'_>) -> BoneBuilder<'_>) -> Self {
        build(BoneBuilder::new(self.props.get_or_create_mut(id)));
        self
    }

    pub fn properties(&self) -> &SkeletonProperties {
        self.props
    }
}
