//! Bones Layout Boundary
//!
//! Loaders never compute layout. They read measured sizes, padding and
//! hierarchy from the host through [`LayoutHost`], and write back only a
//! handful of documented side effects: minimum sizes, alpha/visibility of
//! content, the foreground paint-layer slot, and parent layout transitions.
//!
//! [`ElementTree`] is an in-memory host for tests and for embedders that
//! keep their own layout results.

pub mod element;
pub mod host;
pub mod tree;

pub use element::{
    Background, BackgroundShape, ElementKind, LayoutTransition, Padding, PaintLayer, Visibility,
};
pub use host::LayoutHost;
pub use tree::{ElementNode, ElementTree};
