//! Shimmer rays
//!
//! A sweep of `count` tilted gradient bands across a placeholder. One
//! animator fraction drives every ray; each ray owns a sub-range of it so
//! rays enter one after another:
//!
//! ```text
//! ray i covers [end(i-1) / 2, (i + 1) / count]
//! ```

use bones_animation::{map_range, Easing};
use bones_paint::{
    Bounds, Color, FillStyle, GradientDirection, LinearGradient, MutableColor, PaintContext, Path,
    Transform2D,
};
use smallvec::SmallVec;

use crate::properties::ShimmerRayProperties;

/// Alpha profile across a ray, from its leading to its trailing edge
const RAY_ALPHAS: [f32; 3] = [0.0, 0.35, 0.0];

pub type ShimmerRays = SmallVec<[ShimmerRay; 2]>;

/// One light band
#[derive(Clone, Debug, PartialEq)]
pub struct ShimmerRay {
    start_offset: f32,
    end_offset: f32,
    /// Ray rectangle at the start of its travel, fully left of the parent
    origin: Bounds,
    travel: f32,
    tilt: f32,
    color: MutableColor,
    /// Set when every ray eases its own sub-range
    easing: Option<Easing>,
    translation: f32,
    opacity: f32,
}

impl ShimmerRay {
    /// Rays sweeping `parent`; empty when `count` is zero or `parent` has no area
    pub fn build_rays(parent: Bounds, props: &ShimmerRayProperties) -> ShimmerRays {
        if props.count == 0 || parent.is_empty() {
            return ShimmerRays::new();
        }

        let thickness = props
            .thickness
            .unwrap_or(props.thickness_ratio * parent.width);
        let thickness = if thickness.is_finite() { thickness.max(0.0) } else { 0.0 };
        let tilt = if props.tilt.is_finite() { props.tilt } else { 0.0 };
        let span = thickness + parent.height * tilt.abs();
        let origin = Bounds::new(parent.left() - span, parent.top(), thickness, parent.height);
        let travel = parent.width + 2.0 * span;
        let easing = (!props.shared_easing).then_some(props.easing);

        let count = props.count;
        let mut rays = ShimmerRays::with_capacity(count);
        let mut previous_end = 0.0;
        for i in 0..count {
            let end_offset = (i + 1) as f32 / count as f32;
            rays.push(ShimmerRay {
                start_offset: previous_end / 2.0,
                end_offset,
                origin,
                travel,
                tilt,
                color: props.color.clone(),
                easing,
                translation: 0.0,
                opacity: 1.0,
            });
            previous_end = end_offset;
        }
        tracing::trace!(count, thickness, travel, "built shimmer rays");
        rays
    }

    /// `(start, end)` sub-range of the sweep fraction this ray reacts to
    pub fn offsets(&self) -> (f32, f32) {
        (self.start_offset, self.end_offset)
    }

    pub fn translation(&self) -> f32 {
        self.translation
    }

    /// Leftmost x of the ray's travel
    pub fn start_x(&self) -> f32 {
        self.origin.x
    }

    /// Full horizontal travel of one sweep
    pub fn travel(&self) -> f32 {
        self.travel
    }

    pub fn on_update(&mut self, fraction: f32) {
        let local = map_range(fraction, self.start_offset, self.end_offset, 0.0, 1.0);
        let local = match self.easing {
            Some(easing) => easing.apply(local),
            None => local,
        };
        self.translation = self.travel * local;
    }

    /// Dim the ray as the placeholder fades out
    pub fn on_fade(&mut self, fraction: f32) {
        self.opacity = (1.0 - fraction).clamp(0.0, 1.0);
    }

    /// Local transform: tilt about the ray's own center, then slide
    pub fn transform(&self) -> Transform2D {
        Transform2D::skew_about(self.tilt, 0.0, self.origin.center())
            .then(&Transform2D::translate(self.translation, 0.0))
    }

    pub fn gradient(&self) -> LinearGradient {
        let base = self.color.to_color();
        let colors: [Color; 3] = RAY_ALPHAS.map(|alpha| base.with_alpha(base.a * alpha * self.opacity));
        LinearGradient::across(&self.origin, GradientDirection::LeftToRight, &colors)
    }

    /// Paint the ray, confined to `clip`
    pub fn render(&self, ctx: &mut PaintContext, clip: &Path) {
        if self.opacity <= 0.0 || clip.is_empty() {
            return;
        }
        ctx.save();
        ctx.clip_path(clip);
        ctx.fill_path(
            clip,
            FillStyle::Gradient {
                gradient: self.gradient(),
                transform: self.transform(),
            },
        );
        ctx.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bones_paint::{PaintCommand, Point};

    fn props(count: usize) -> ShimmerRayProperties {
        ShimmerRayProperties {
            count,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_count_builds_nothing() {
        let rays = ShimmerRay::build_rays(Bounds::new(0.0, 0.0, 100.0, 20.0), &props(0));
        assert!(rays.is_empty());
    }

    #[test]
    fn test_offsets_partition() {
        let rays = ShimmerRay::build_rays(Bounds::new(0.0, 0.0, 100.0, 20.0), &props(3));
        let offsets: Vec<_> = rays.iter().map(ShimmerRay::offsets).collect();
        let third = 1.0 / 3.0;
        assert_eq!(offsets[0], (0.0, third));
        assert!((offsets[1].0 - third / 2.0).abs() < 1e-6);
        assert!((offsets[1].1 - 2.0 * third).abs() < 1e-6);
        assert!((offsets[2].0 - third).abs() < 1e-6);
        assert_eq!(offsets[2].1, 1.0);
    }

    #[test]
    fn test_thickness_from_ratio_or_explicit() {
        let parent = Bounds::new(0.0, 0.0, 200.0, 10.0);
        let rays = ShimmerRay::build_rays(parent, &props(1));
        // 0.45 * 200 thick plus 10 * 0.3 of tilt on both sides
        assert!((rays[0].travel() - (200.0 + 2.0 * 93.0)).abs() < 1e-3);
        assert!((rays[0].start_x() + 93.0).abs() < 1e-3);

        let mut explicit = props(1);
        explicit.thickness = Some(20.0);
        let rays = ShimmerRay::build_rays(parent, &explicit);
        assert!((rays[0].travel() - 246.0).abs() < 1e-3);
    }

    #[test]
    fn test_update_sweeps_across() {
        let mut props = props(1);
        props.shared_easing = true;
        let mut rays = ShimmerRay::build_rays(Bounds::new(0.0, 0.0, 100.0, 10.0), &props);
        let ray = &mut rays[0];
        ray.on_update(0.0);
        assert_eq!(ray.translation(), 0.0);
        ray.on_update(0.5);
        assert!((ray.translation() - ray.travel() / 2.0).abs() < 1e-3);
        ray.on_update(1.0);
        assert!((ray.translation() - ray.travel()).abs() < 1e-3);
    }

    #[test]
    fn test_per_ray_easing() {
        let mut props = props(1);
        props.shared_easing = false;
        props.easing = Easing::EaseInQuad;
        let mut rays = ShimmerRay::build_rays(Bounds::new(0.0, 0.0, 100.0, 10.0), &props);
        rays[0].on_update(0.5);
        assert!((rays[0].translation() - rays[0].travel() * 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_fade_dims_gradient() {
        let mut rays = ShimmerRay::build_rays(Bounds::new(0.0, 0.0, 100.0, 10.0), &props(1));
        let peak = rays[0].gradient().stops[1].color.a;
        assert!((peak - 0.35).abs() < 1e-4);
        rays[0].on_fade(0.5);
        let peak = rays[0].gradient().stops[1].color.a;
        assert!((peak - 0.175).abs() < 1e-4);
    }

    #[test]
    fn test_transform_tilts_about_center() {
        let rays = ShimmerRay::build_rays(Bounds::new(0.0, 0.0, 100.0, 10.0), &props(1));
        let ray = &rays[0];
        let center = ray.origin.center();
        assert_eq!(ray.transform().apply(center), center);
        let above = ray.transform().apply(Point::new(center.x, center.y - 5.0));
        assert!((above.x - (center.x + 1.5)).abs() < 1e-4);
    }

    #[test]
    fn test_render_is_balanced() {
        let rays = ShimmerRay::build_rays(Bounds::new(0.0, 0.0, 100.0, 10.0), &props(1));
        let mut clip = Path::new();
        clip.add_rect(Bounds::new(0.0, 0.0, 100.0, 10.0));
        let mut ctx = PaintContext::new();
        rays[0].render(&mut ctx, &clip);
        assert_eq!(ctx.save_count(), 0);
        assert!(matches!(
            ctx.commands()[2],
            PaintCommand::FillPath {
                style: FillStyle::Gradient { .. },
                ..
            }
        ));
    }
}
