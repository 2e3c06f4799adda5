//! Element identity

use std::fmt;

/// Stable integer id of a host element
///
/// Ids are opaque to the loader. The host hands them out once per element
/// and keeps them for the element's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ElementId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out ids on demand for elements that do not carry one yet
#[derive(Clone, Debug)]
pub struct ElementIdGenerator {
    next: u32,
}

impl ElementIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Start handing out ids after `raw`
    pub fn starting_after(raw: u32) -> Self {
        Self {
            next: raw.saturating_add(1),
        }
    }

    pub fn next_id(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        id
    }
}

impl Default for ElementIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
