//! Resolved bone shape
//!
//! What a computed bone paints: its geometry plus the styling resolved
//! against the owner, and the transient fade/shimmer state.

use bones_layout::{Background, BackgroundShape};
use bones_paint::{Bounds, CornerRadii, MutableColor, PaintContext, Path, Shadow};

use crate::geometry::BoneGeometry;
use crate::properties::{BoneProperties, ShapeType};
use crate::shimmer::{ShimmerRay, ShimmerRays};

/// Shape type, falling back to the owner's background outline
pub fn resolve_shape_type(props: &BoneProperties, background: Option<&Background>) -> ShapeType {
    props.shape_type.unwrap_or(match background.map(|b| b.shape) {
        Some(BackgroundShape::Oval) => ShapeType::Circular,
        _ => ShapeType::Rectangular,
    })
}

pub fn resolve_corner_radii(props: &BoneProperties, background: Option<&Background>) -> CornerRadii {
    props
        .corner_radii
        .or_else(|| background.and_then(|b| b.corner_radii))
        .unwrap_or(CornerRadii::ZERO)
}

/// Fill color: own color, then the owner's background, then the fallback,
/// shaded by `shade_multiplier`
pub fn resolve_color(props: &BoneProperties, background: Option<&Background>) -> MutableColor {
    let color = props
        .color
        .clone()
        .or_else(|| background.and_then(|b| b.color.clone()))
        .unwrap_or_else(|| props.fallback_color.clone());
    if props.shade_multiplier != 1.0 {
        color.adjust(props.shade_multiplier)
    } else {
        color
    }
}

/// A bone ready to paint
#[derive(Clone, Debug, Default)]
pub struct BoneShape {
    geometry: Option<BoneGeometry>,
    shape_type: ShapeType,
    corner_radii: CornerRadii,
    color: MutableColor,
    shadow: Option<Shadow>,
    rays: ShimmerRays,
    opacity: f32,
}

impl BoneShape {
    pub fn new() -> Self {
        Self {
            opacity: 1.0,
            ..Default::default()
        }
    }

    /// Install freshly computed geometry and styling, resetting any fade
    pub fn apply(
        &mut self,
        geometry: BoneGeometry,
        shape_type: ShapeType,
        corner_radii: CornerRadii,
        color: MutableColor,
        shadow: Option<Shadow>,
        rays: ShimmerRays,
    ) {
        self.geometry = Some(geometry);
        self.shape_type = shape_type;
        self.corner_radii = corner_radii;
        self.color = color;
        self.shadow = shadow;
        self.rays = rays;
        self.opacity = 1.0;
    }

    pub fn clear(&mut self) {
        self.geometry = None;
        self.shadow = None;
        self.rays.clear();
        self.opacity = 1.0;
    }

    pub fn is_computed(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.geometry.as_ref().map(|g| g.bounds)
    }

    pub fn sections(&self) -> &[Bounds] {
        self.geometry.as_ref().map(|g| g.sections.as_slice()).unwrap_or(&[])
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    pub fn color(&self) -> &MutableColor {
        &self.color
    }

    pub fn corner_radii(&self) -> CornerRadii {
        self.corner_radii
    }

    pub fn shadow(&self) -> Option<Shadow> {
        self.shadow
    }

    pub fn rays(&self) -> &[ShimmerRay] {
        &self.rays
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Outline of every section, or the inscribed circle for circular bones
    pub fn path(&self) -> Path {
        let mut path = Path::new();
        let Some(geometry) = &self.geometry else {
            return path;
        };
        match self.shape_type {
            ShapeType::Circular => {
                let bounds = geometry.bounds;
                let center = bounds.center();
                path.add_circle(center.x, center.y, (bounds.width + bounds.height) / 4.0);
            }
            ShapeType::Rectangular => {
                for section in &geometry.sections {
                    path.add_round_rect(*section, self.corner_radii);
                }
            }
        }
        path
    }

    pub fn on_update(&mut self, fraction: f32) {
        for ray in self.rays.iter_mut() {
            ray.on_update(fraction);
        }
    }

    pub fn on_fade(&mut self, fraction: f32) {
        self.opacity = (1.0 - fraction).clamp(0.0, 1.0);
        for ray in self.rays.iter_mut() {
            ray.on_fade(fraction);
        }
    }

    /// Paint shadow, fill and own rays; returns the outline for reuse as a clip
    pub fn render(&self, ctx: &mut PaintContext) -> Option<Path> {
        self.geometry.as_ref()?;
        let path = self.path();
        if let Some(mut shadow) = self.shadow {
            shadow.color.a *= self.opacity;
            ctx.draw_shadow(&path, shadow);
        }
        let mut color = self.color.to_color();
        color.a *= self.opacity;
        ctx.fill_path(&path, color);
        for ray in &self.rays {
            ray.render(ctx, &path);
        }
        Some(path)
    }
}
