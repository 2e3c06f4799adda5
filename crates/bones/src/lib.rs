//! Bones
//!
//! Skeleton-screen loading placeholders for host element trees.
//!
//! # Features
//!
//! - **Skeletons**: one bone per leaf of a container, sized from the leaf's
//!   measured layout and per-element overrides, with dissected text lines
//! - **Standalone bones**: a single placeholder over one element
//! - **Shimmer**: tilted gradient rays swept across bones by one animator
//! - **Cross-fade**: placeholder fades out while content fades back in
//! - **State owners**: disabling waits until nested loaders are done
//! - **Saved state**: properties survive detach/reattach of a loader
//!
//! # Example
//!
//! ```ignore
//! use bones::prelude::*;
//!
//! let mut registry = LoaderRegistry::new(LoaderConfig::load("bones.toml")?);
//! registry.add_skeleton_loader(&tree, card)?
//!     .builder()
//!     .with_shimmer_builder(|rays| rays.count(2));
//! registry.set_skeleton_enabled(&mut tree, card, true)?;
//!
//! // every frame
//! if registry.tick_at(&mut tree, Instant::now()) {
//!     registry.draw(card, &mut ctx);
//! }
//! ```

pub mod bone;
pub mod builder;
pub mod config;
pub mod drawable;
pub mod geometry;
pub mod manager;
pub mod properties;
pub mod registry;
pub mod renderer;
pub mod saved_state;
pub mod shadow;
pub mod shape;
pub mod shimmer;
pub mod skeleton;

pub use bone::Bone;
pub use builder::{BoneBuilder, ShimmerRayBuilder, SkeletonBuilder};
pub use config::{ConfigError, LoaderConfig};
pub use drawable::{BoneDrawable, SkeletonDrawable};
pub use geometry::{compute_bone_geometry, BoneGeometry, OwnerMetrics};
pub use manager::{AnimationListener, BoneManager, SkeletonManager, UpdateListener};
pub use properties::{
    BoneProperties, BoneSnapshot, DissectionThresholds, EnabledSignal, ShapeType,
    ShimmerRayProperties, SkeletonProperties, SkeletonSnapshot, StateBridge,
};
pub use registry::LoaderRegistry;
pub use renderer::{BoneRenderer, SkeletonRenderer};
pub use saved_state::{Retention, SavedProperties, SavedStateStore};
pub use shimmer::ShimmerRay;
pub use skeleton::{ComputeOutcome, Skeleton, SkeletonBone};

pub use bones_core::{ElementId, LoaderError, LoaderState};
pub use bones_layout::{ElementKind, LayoutHost};

/// Everything needed to drive loaders from a host
pub mod prelude {
    pub use crate::builder::{BoneBuilder, ShimmerRayBuilder, SkeletonBuilder};
    pub use crate::config::LoaderConfig;
    pub use crate::drawable::{BoneDrawable, SkeletonDrawable};
    pub use crate::properties::{BoneProperties, ShapeType, SkeletonProperties};
    pub use crate::registry::LoaderRegistry;
    pub use bones_core::{ElementId, LoaderError, LoaderState};
    pub use bones_layout::{ElementKind, ElementTree, LayoutHost};
    pub use bones_paint::PaintContext;
}
