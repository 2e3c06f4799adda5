//! Loader error types

use thiserror::Error;

use crate::id::ElementId;

/// Misuse conditions reported by loader operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// The loader was disposed and can no longer be driven
    #[error("Loader has been disposed")]
    Disposed,

    /// The host does not know the element
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    /// A skeleton was requested for an element without children
    #[error("Element {0} is not a container")]
    NotAContainer(ElementId),

    /// A different kind of loader already occupies the element's foreground
    #[error("Element {0} already has a loader attached")]
    AlreadyAttached(ElementId),
}

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;
