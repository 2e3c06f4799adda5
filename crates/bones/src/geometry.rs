//! Bone geometry
//!
//! Turns an owner's measured box and a bone's properties into the bone's
//! bounds, and for dissected text, the bounds of each line.
//!
//! Height is resolved in order:
//!
//! 1. an explicit `height`
//! 2. the inner height when the bone matches its owner's bounds
//! 3. the inner height when a text owner is tall enough to dissect
//! 4. the inner height clamped to `[min_thickness, max_thickness]`
//!
//! A dissected bone of height `h` holds `floor((h - M) / (D + M)) + 1`
//! lines of thickness `M` spaced `D` apart, where `M` is the max
//! thickness and `D` the section distance.

use bones_layout::{ElementKind, Padding};
use bones_paint::{Bounds, Point};
use smallvec::{smallvec, SmallVec};

use crate::properties::BoneProperties;

/// The owner's box as seen from the surface the bone is drawn on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OwnerMetrics {
    /// Owner's top-left corner in drawing coordinates
    pub origin: Point,
    pub width: f32,
    pub height: f32,
    pub padding: Padding,
    pub kind: ElementKind,
}

impl OwnerMetrics {
    pub fn new(origin: Point, size: (f32, f32), padding: Padding, kind: ElementKind) -> Self {
        Self {
            origin,
            width: size.0,
            height: size.1,
            padding,
            kind,
        }
    }
}

/// Computed placement of a bone
#[derive(Clone, Debug, PartialEq)]
pub struct BoneGeometry {
    pub bounds: Bounds,
    /// One entry per drawn line; a single entry equal to `bounds` unless dissected
    pub sections: SmallVec<[Bounds; 4]>,
}

impl BoneGeometry {
    pub fn is_dissected(&self) -> bool {
        self.sections.len() > 1 || self.sections.first() != Some(&self.bounds)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Place a bone inside its owner; `None` when either side has no area
pub fn compute_bone_geometry(owner: &OwnerMetrics, props: &BoneProperties) -> Option<BoneGeometry> {
    let owner_width = sanitize(owner.width);
    let owner_height = sanitize(owner.height);
    if owner_width <= 0.0 || owner_height <= 0.0 {
        return None;
    }

    let (min, max) = props.thickness_range();
    let distance = sanitize(props.section_distance);
    let thresholds = props.thresholds;
    let dissect = props.dissect_bones == Some(true);

    let padding = owner.padding;
    let width = match props.width {
        Some(width) => sanitize(width),
        None if dissect => sanitize(owner_width - padding.horizontal()),
        None => owner_width,
    };
    let inner_height = sanitize(owner_height - padding.vertical());
    let dissectable = dissect && owner.kind == ElementKind::Text && props.height.is_none();
    let tall_enough = |height: f32| height >= max * thresholds.overflow;

    let height = match props.height {
        Some(height) => sanitize(height),
        None if props.match_owners_bounds => inner_height,
        None if dissectable
            && tall_enough(inner_height)
            && inner_height > (max + distance) * thresholds.height =>
        {
            inner_height
        }
        None => inner_height.clamp(min, max),
    };
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let x = owner.origin.x + (owner_width - width) / 2.0 + props.translation_x;
    let top = if props.match_owners_bounds && props.height.is_none() {
        owner.origin.y + padding.top
    } else {
        owner.origin.y + (owner_height - height) / 2.0
    };
    let bounds = Bounds::new(x, top + props.translation_y, width, height);

    let sections = if dissectable && max > 0.0 && tall_enough(height) {
        let count = ((height - max) / (distance + max)).floor() as usize + 1;
        (0..count)
            .map(|i| {
                let center = bounds.y + max / 2.0 + i as f32 * (max + distance);
                Bounds::new(bounds.x, center - max / 2.0, width, max)
            })
            .collect()
    } else {
        smallvec![bounds]
    };

    tracing::trace!(?bounds, sections = sections.len(), "bone geometry");
    Some(BoneGeometry { bounds, sections })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_owner(width: f32, height: f32) -> OwnerMetrics {
        OwnerMetrics::new(Point::ZERO, (width, height), Padding::ZERO, ElementKind::Text)
    }

    #[test]
    fn test_height_clamped_to_thickness() {
        let props = BoneProperties::new();
        let short = compute_bone_geometry(&text_owner(100.0, 8.0), &props).unwrap();
        assert_eq!(short.bounds.height, 10.0);
        assert_eq!(short.bounds.y, -1.0);

        let tall = compute_bone_geometry(&text_owner(100.0, 40.0), &props).unwrap();
        assert_eq!(tall.bounds.height, 10.0);
        assert_eq!(tall.bounds.y, 15.0);
        assert!(!tall.is_dissected());
    }

    #[test]
    fn test_dissected_text_splits_into_lines() {
        let mut props = BoneProperties::new();
        props.dissect_bones = Some(true);
        let geometry = compute_bone_geometry(&text_owner(100.0, 40.0), &props).unwrap();
        assert_eq!(geometry.bounds.height, 40.0);
        assert_eq!(geometry.sections.len(), 2);
        assert_eq!(geometry.sections[0], Bounds::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(geometry.sections[1].y - geometry.sections[0].y, 20.0);
        assert!(geometry.is_dissected());
    }

    #[test]
    fn test_dissect_needs_text() {
        let mut props = BoneProperties::new();
        props.dissect_bones = Some(true);
        let owner = OwnerMetrics::new(Point::ZERO, (100.0, 40.0), Padding::ZERO, ElementKind::Generic);
        let geometry = compute_bone_geometry(&owner, &props).unwrap();
        assert_eq!(geometry.bounds.height, 10.0);
        assert_eq!(geometry.sections.len(), 1);
    }

    #[test]
    fn test_dissect_below_height_threshold_clamps() {
        let mut props = BoneProperties::new();
        props.dissect_bones = Some(true);
        // 28 reaches 2.5 * 10 but not (10 + 10) * 1.5
        let geometry = compute_bone_geometry(&text_owner(100.0, 28.0), &props).unwrap();
        assert_eq!(geometry.bounds.height, 10.0);
        assert_eq!(geometry.sections.len(), 1);
    }

    #[test]
    fn test_dissected_width_excludes_padding() {
        let mut props = BoneProperties::new();
        props.dissect_bones = Some(true);
        let owner = OwnerMetrics::new(
            Point::new(10.0, 10.0),
            (100.0, 80.0),
            Padding::uniform(5.0),
            ElementKind::Text,
        );
        let geometry = compute_bone_geometry(&owner, &props).unwrap();
        assert_eq!(geometry.bounds.width, 90.0);
        assert_eq!(geometry.bounds.x, 15.0);
        assert_eq!(geometry.bounds.height, 70.0);
        assert_eq!(geometry.sections.len(), 4);
    }

    #[test]
    fn test_match_owner_bounds() {
        let mut props = BoneProperties::new();
        props.match_owners_bounds = true;
        let owner = OwnerMetrics::new(
            Point::new(0.0, 20.0),
            (64.0, 64.0),
            Padding::new(0.0, 4.0, 0.0, 4.0),
            ElementKind::Image,
        );
        let geometry = compute_bone_geometry(&owner, &props).unwrap();
        assert_eq!(geometry.bounds, Bounds::new(0.0, 24.0, 64.0, 56.0));
    }

    #[test]
    fn test_explicit_size_and_translation() {
        let mut props = BoneProperties::new();
        props.width = Some(40.0);
        props.height = Some(6.0);
        props.translation_x = 3.0;
        props.translation_y = -2.0;
        let geometry = compute_bone_geometry(&text_owner(100.0, 20.0), &props).unwrap();
        assert_eq!(geometry.bounds, Bounds::new(33.0, 5.0, 40.0, 6.0));
    }

    #[test]
    fn test_degenerate_owner() {
        let props = BoneProperties::new();
        assert!(compute_bone_geometry(&text_owner(0.0, 20.0), &props).is_none());
        assert!(compute_bone_geometry(&text_owner(20.0, f32::NAN), &props).is_none());
        assert!(compute_bone_geometry(&text_owner(-5.0, 20.0), &props).is_none());
    }

    #[test]
    fn test_clamp_holds_across_sizes() {
        let mut props = BoneProperties::new();
        props.min_thickness = 6.0;
        props.max_thickness = 14.0;
        for step in 1..200 {
            let height = step as f32 * 0.75;
            let geometry = compute_bone_geometry(&text_owner(50.0, height), &props).unwrap();
            let h = geometry.bounds.height;
            assert!((6.0..=14.0).contains(&h), "height {h} for owner {height}");
        }
    }
}
