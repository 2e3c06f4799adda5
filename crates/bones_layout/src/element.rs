//! Element description types shared with the host

use bones_paint::{CornerRadii, MutableColor};

/// What an element displays, as far as placeholders care
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Text content; eligible for dissection into several lines
    Text,
    /// Image content; covered by a full-size bone
    Image,
    #[default]
    Generic,
}

/// Element padding in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    /// Hidden but still occupying space
    Invisible,
    /// Hidden and removed from layout
    Gone,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackgroundShape {
    #[default]
    Rectangle,
    Oval,
}

/// The element's own background, used as a source of inherited styling
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Background {
    pub color: Option<MutableColor>,
    pub shape: BackgroundShape,
    pub corner_radii: Option<CornerRadii>,
}

impl Background {
    pub fn solid(color: MutableColor) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn with_shape(mut self, shape: BackgroundShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_corner_radii(mut self, radii: CornerRadii) -> Self {
        self.corner_radii = Some(radii);
        self
    }
}

/// Occupant of an element's foreground paint slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaintLayer {
    #[default]
    Empty,
    /// Something the host drew there itself, identified by a host token
    Native(u64),
    Skeleton,
    Bone,
}

/// Parent-level animation of child size changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutTransition {
    pub duration_ms: u64,
    pub animate_changes: bool,
}

impl LayoutTransition {
    /// Animate size changes of children over `duration_ms`
    pub fn changing(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            animate_changes: true,
        }
    }
}
