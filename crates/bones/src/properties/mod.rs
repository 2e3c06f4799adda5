//! Loader properties
//!
//! Plain data describing how placeholders look and behave. Properties
//! never reach into the loader that renders them except through the
//! [`StateBridge`] installed on attach.

mod bone;
mod shimmer;
mod skeleton;
mod state;

pub use bone::{BoneProperties, BoneSnapshot, DissectionThresholds, ShapeType};
pub use shimmer::ShimmerRayProperties;
pub use skeleton::{SkeletonProperties, SkeletonSnapshot};
pub use state::{EnabledSignal, StateBridge};
