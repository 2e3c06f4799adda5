//! Bones Paint API
//!
//! The drawing vocabulary placeholders are expressed in. Nothing here
//! rasterizes; a [`PaintContext`] records commands that the host replays
//! onto its own canvas.
//!
//! # Features
//!
//! - Packed ARGB colors with cached integer form
//! - Bounds, corner radii and shadows
//! - Clip/fill paths made of rects, rounded rects and circles
//! - Linear gradients with affine local transforms

pub mod color;
pub mod context;
pub mod gradient;
pub mod path;
pub mod primitives;

pub use color::{Color, MutableColor};
pub use context::{FillStyle, PaintCommand, PaintContext, Transform2D};
pub use gradient::{GradientDirection, GradientStop, LinearGradient};
pub use path::{Path, PathCommand, Point};
pub use primitives::*;
