//! Clip and fill paths

use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;

use crate::primitives::{Bounds, CornerRadii};

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
    Rect(Bounds),
    RoundRect { bounds: Bounds, radii: CornerRadii },
    Circle { center: Point, radius: f32 },
}

impl PathCommand {
    /// Area covered by a closed shape command
    fn shape_bounds(&self) -> Option<Bounds> {
        match *self {
            PathCommand::Rect(bounds) | PathCommand::RoundRect { bounds, .. } => Some(bounds),
            PathCommand::Circle { center, radius } => Some(Bounds::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            )),
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(Bounds::new(p.x, p.y, 0.0, 0.0)),
            PathCommand::Close => None,
        }
    }
}

/// A 2D path composed of commands
///
/// Shape commands are independent sub-paths, so a path holding several
/// rounded rects clips to their union.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Drop all commands, keeping the allocation
    pub fn rewind(&mut self) {
        self.commands.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn add_rect(&mut self, bounds: Bounds) -> &mut Self {
        self.commands.push(PathCommand::Rect(bounds));
        self
    }

    /// Rounded rect; falls back to a plain rect when every radius is zero
    pub fn add_round_rect(&mut self, bounds: Bounds, radii: CornerRadii) -> &mut Self {
        if radii.is_zero() {
            return self.add_rect(bounds);
        }
        self.commands.push(PathCommand::RoundRect { bounds, radii });
        self
    }

    pub fn add_circle(&mut self, cx: f32, cy: f32, radius: f32) -> &mut Self {
        self.commands.push(PathCommand::Circle {
            center: Point::new(cx, cy),
            radius: radius.max(0.0),
        });
        self
    }

    /// Append every command of `other`
    pub fn add_path(&mut self, other: &Path) -> &mut Self {
        self.commands.extend(other.commands.iter().copied());
        self
    }

    /// Bounding box of all commands
    pub fn bounds(&self) -> Option<Bounds> {
        self.commands
            .iter()
            .filter_map(PathCommand::shape_bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_radii_become_rect() {
        let mut path = Path::new();
        path.add_round_rect(Bounds::new(0.0, 0.0, 10.0, 10.0), CornerRadii::ZERO);
        assert!(matches!(path.commands()[0], PathCommand::Rect(_)));
    }

    #[test]
    fn test_path_bounds_union() {
        let mut path = Path::new();
        path.add_rect(Bounds::new(0.0, 0.0, 10.0, 10.0))
            .add_circle(30.0, 5.0, 5.0);
        assert_eq!(path.bounds(), Some(Bounds::new(0.0, 0.0, 35.0, 10.0)));
    }

    #[test]
    fn test_rewind() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(1.0, 1.0).close();
        assert_eq!(path.len(), 3);
        path.rewind();
        assert!(path.is_empty());
        assert_eq!(path.bounds(), None);
    }
}
