//! Gradient fills

use smallvec::SmallVec;

use crate::color::Color;
use crate::path::Point;
use crate::primitives::Bounds;

/// A gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32, // 0.0 to 1.0
    pub color: Color,
}

/// Axis a linear gradient runs along within its bounds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradientDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl GradientDirection {
    fn endpoints(self, bounds: &Bounds) -> (Point, Point) {
        let (left, right) = (bounds.left(), bounds.right());
        let (top, bottom) = (bounds.top(), bounds.bottom());
        let mid_y = bounds.center().y;
        let mid_x = bounds.center().x;
        match self {
            GradientDirection::LeftToRight => (Point::new(left, mid_y), Point::new(right, mid_y)),
            GradientDirection::RightToLeft => (Point::new(right, mid_y), Point::new(left, mid_y)),
            GradientDirection::TopToBottom => (Point::new(mid_x, top), Point::new(mid_x, bottom)),
            GradientDirection::BottomToTop => (Point::new(mid_x, bottom), Point::new(mid_x, top)),
        }
    }
}

/// Linear gradient between two points
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: SmallVec<[GradientStop; 4]>,
}

impl LinearGradient {
    /// Create a simple linear gradient between two colors
    pub fn simple(start: Point, end: Point, from: Color, to: Color) -> Self {
        Self {
            start,
            end,
            stops: SmallVec::from_slice(&[
                GradientStop {
                    offset: 0.0,
                    color: from,
                },
                GradientStop {
                    offset: 1.0,
                    color: to,
                },
            ]),
        }
    }

    /// Spread `colors` evenly across `bounds` in the given direction
    pub fn across(bounds: &Bounds, direction: GradientDirection, colors: &[Color]) -> Self {
        let (start, end) = direction.endpoints(bounds);
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, color)| GradientStop {
                offset: i as f32 / last,
                color: *color,
            })
            .collect();
        Self { start, end, stops }
    }

    /// Multiply the alpha of every stop by `factor`
    pub fn scale_alpha(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        for stop in self.stops.iter_mut() {
            stop.color.a *= factor;
        }
    }
}
