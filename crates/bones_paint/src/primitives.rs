//! Geometric primitives

use bytemuck::{Pod, Zeroable};

use crate::color::Color;
use crate::path::Point;

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from edges
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left() && point.x <= self.right() && point.y >= self.top() && point.y <= self.bottom()
    }

    /// True when `self` lies completely within `other`
    pub fn is_inside(&self, other: &Bounds) -> bool {
        self.left() >= other.left()
            && self.right() <= other.right()
            && self.top() >= other.top()
            && self.bottom() <= other.bottom()
    }

    /// Horizontal extents overlap
    pub fn horizontal_intercept(&self, other: &Bounds) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Vertical extents overlap
    pub fn vertical_intercept(&self, other: &Bounds) -> bool {
        self.top() < other.bottom() && other.top() < self.bottom()
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.horizontal_intercept(other) && self.vertical_intercept(other)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Bounds) -> Self {
        Self::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// `[x, y, width, height]`
    pub fn as_array(&self) -> &[f32; 4] {
        bytemuck::cast_ref(self)
    }
}

/// Raw bytes of a run of rectangles, four `f32` each, for GPU instance buffers
pub fn bounds_bytes(bounds: &[Bounds]) -> &[u8] {
    bytemuck::cast_slice(bounds)
}

/// Per-corner radii stored as four `(x, y)` pairs
///
/// Order is top-left, top-right, bottom-right, bottom-left, the layout
/// toolkits use for rounded-rect paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CornerRadii {
    corners: [f32; 8],
}

impl CornerRadii {
    pub const ZERO: CornerRadii = CornerRadii { corners: [0.0; 8] };

    pub fn uniform(radius: f32) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    /// Circular corners, clockwise from top-left
    pub fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self::from_array([
            top_left,
            top_left,
            top_right,
            top_right,
            bottom_right,
            bottom_right,
            bottom_left,
            bottom_left,
        ])
    }

    /// Negative and NaN radii become zero
    pub fn from_array(corners: [f32; 8]) -> Self {
        Self {
            corners: corners.map(|r| if r.is_nan() { 0.0 } else { r.max(0.0) }),
        }
    }

    pub fn as_array(&self) -> &[f32; 8] {
        &self.corners
    }

    pub fn top_left(&self) -> (f32, f32) {
        (self.corners[0], self.corners[1])
    }

    pub fn top_right(&self) -> (f32, f32) {
        (self.corners[2], self.corners[3])
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.corners[4], self.corners[5])
    }

    pub fn bottom_left(&self) -> (f32, f32) {
        (self.corners[6], self.corners[7])
    }

    pub fn is_zero(&self) -> bool {
        self.corners.iter().all(|r| *r == 0.0)
    }
}

/// Blurred drop shadow under a path
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Shadow {
    pub fn new(color: Color, blur: f32) -> Self {
        Self {
            color,
            blur,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_edges() {
        let bounds = Bounds::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bounds.right(), 40.0);
        assert_eq!(bounds.bottom(), 60.0);
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
        assert_eq!(Bounds::from_edges(10.0, 20.0, 40.0, 60.0), bounds);
    }

    #[test]
    fn test_bounds_intersections() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 10.0, 10.0);
        let c = Bounds::new(20.0, 0.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.vertical_intercept(&c));
        assert!(!a.horizontal_intercept(&c));
        assert!(Bounds::new(2.0, 2.0, 2.0, 2.0).is_inside(&a));
        assert!(!b.is_inside(&a));
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Bounds::ZERO.is_empty());
        assert!(Bounds::new(0.0, 0.0, 5.0, 0.0).is_empty());
        assert!(Bounds::new(0.0, 0.0, f32::NAN, 5.0).is_empty());
        assert!(!Bounds::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_bounds_upload_layout() {
        let bounds = [Bounds::new(1.0, 2.0, 3.0, 4.0), Bounds::new(5.0, 6.0, 7.0, 8.0)];
        assert_eq!(bounds[1].as_array(), &[5.0, 6.0, 7.0, 8.0]);

        let bytes = bounds_bytes(&bounds);
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[16..20], &5.0f32.to_ne_bytes());
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats[7], 8.0);
    }

    #[test]
    fn test_corner_radii_layout() {
        let radii = CornerRadii::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(radii.as_array(), &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
        assert_eq!(radii.bottom_right(), (3.0, 3.0));
        assert!(CornerRadii::from_array([-1.0; 8]).is_zero());
    }
}
