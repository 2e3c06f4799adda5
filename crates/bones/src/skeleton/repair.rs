//! Bounds repair for zero-sized leaves
//!
//! Empty text and not-yet-loaded images measure at zero and would get no
//! bone. While the skeleton is up they receive a temporary minimum size;
//! the original minimum (and any parent layout transition installed to
//! animate the change) is put back on restore.

use bones_core::ElementId;
use bones_layout::{LayoutHost, LayoutTransition};
use rustc_hash::FxHashMap;

use crate::properties::BoneProperties;

#[derive(Debug, Default)]
pub struct BoundsRepair {
    minimum_sizes: FxHashMap<ElementId, (f32, f32)>,
    transitions: FxHashMap<ElementId, Option<LayoutTransition>>,
}

impl BoundsRepair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_repair(host: &dyn LayoutHost, id: ElementId) -> bool {
        let (width, height) = host.measured_size(id);
        !(width > 0.0 && height > 0.0)
    }

    /// Install a temporary minimum size on `id`
    ///
    /// Uses the bone's `min_width`/`min_height` when either is set, else a
    /// height of one bone thickness plus vertical padding.
    pub fn apply(
        &mut self,
        host: &mut dyn LayoutHost,
        id: ElementId,
        props: &BoneProperties,
        animate_with: Option<u64>,
    ) {
        let original = *self
            .minimum_sizes
            .entry(id)
            .or_insert_with(|| host.minimum_size(id));

        let (width, height) = if props.min_width.is_some() || props.min_height.is_some() {
            (
                props.min_width.unwrap_or(original.0),
                props.min_height.unwrap_or(original.1),
            )
        } else {
            let (min_thickness, _) = props.thickness_range();
            (original.0, min_thickness + host.padding(id).vertical())
        };

        if let (Some(duration_ms), Some(parent)) = (animate_with, host.parent(id)) {
            if !self.transitions.contains_key(&parent) {
                self.transitions.insert(parent, host.layout_transition(parent));
                host.set_layout_transition(parent, Some(LayoutTransition::changing(duration_ms)));
            }
        }

        tracing::debug!(%id, width, height, "repairing zero-sized bone owner");
        host.set_minimum_size(id, width, height);
    }

    pub fn is_repaired(&self, id: ElementId) -> bool {
        self.minimum_sizes.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.minimum_sizes.is_empty() && self.transitions.is_empty()
    }

    /// Put back one element's original minimum size
    pub fn restore_one(&mut self, host: &mut dyn LayoutHost, id: ElementId) {
        if let Some((width, height)) = self.minimum_sizes.remove(&id) {
            host.set_minimum_size(id, width, height);
        }
    }

    /// Put back every original minimum size and parent transition
    pub fn restore(&mut self, host: &mut dyn LayoutHost) {
        if self.is_empty() {
            return;
        }
        tracing::debug!(
            elements = self.minimum_sizes.len(),
            parents = self.transitions.len(),
            "restoring repaired bounds"
        );
        for (id, (width, height)) in self.minimum_sizes.drain() {
            host.set_minimum_size(id, width, height);
        }
        for (parent, transition) in self.transitions.drain() {
            host.set_layout_transition(parent, transition);
        }
    }
}
