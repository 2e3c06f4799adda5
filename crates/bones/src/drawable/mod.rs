//! Drawables
//!
//! A drawable is what a host attaches to an element's foreground slot. It
//! turns `enabled` flips into manager transitions, waits for the owner's
//! first layout pass when it has to, and hands its properties to the
//! saved-state store when the placeholder goes away.

mod bone;
mod skeleton;

pub use bone::BoneDrawable;
pub use skeleton::SkeletonDrawable;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bones_core::ElementId;
use bones_layout::{LayoutHost, PaintLayer};

use crate::saved_state::{Retention, SavedProperties, SavedStateStore};

/// Retention chosen by a pair of saved-state flags; strong wins
pub(crate) fn retention_for(allow_saved_state: bool, allow_weak_saved_state: bool) -> Option<Retention> {
    if allow_saved_state {
        Some(Retention::Strong)
    } else if allow_weak_saved_state {
        Some(Retention::Transient)
    } else {
        None
    }
}

/// The foreground slot a drawable occupies while its placeholder is shown
#[derive(Clone, Debug)]
pub(crate) struct ForegroundSlot {
    layer: PaintLayer,
    previous: Rc<Cell<Option<PaintLayer>>>,
}

impl ForegroundSlot {
    pub(crate) fn new(layer: PaintLayer) -> Self {
        Self {
            layer,
            previous: Rc::new(Cell::new(None)),
        }
    }

    /// Install our layer, remembering whatever was there
    pub(crate) fn install(&self, host: &mut dyn LayoutHost, owner: ElementId) {
        if self.is_installed() {
            return;
        }
        let previous = host.replace_foreground(owner, self.layer);
        self.previous.set(Some(previous));
    }

    pub(crate) fn is_installed(&self) -> bool {
        self.previous.get().is_some()
    }

    pub(crate) fn handle(&self) -> Rc<Cell<Option<PaintLayer>>> {
        self.previous.clone()
    }

    pub(crate) fn uninstall(&self, host: &mut dyn LayoutHost, owner: ElementId) {
        uninstall_foreground(&self.previous, host, owner);
    }
}

/// Put back the layer that was there before ours
pub(crate) fn uninstall_foreground(previous: &Cell<Option<PaintLayer>>, host: &mut dyn LayoutHost, owner: ElementId) {
    if let Some(layer) = previous.take() {
        host.replace_foreground(owner, layer);
    }
}

pub(crate) fn save_properties(
    store: Option<&Rc<RefCell<SavedStateStore>>>,
    owner: ElementId,
    retention: Option<Retention>,
    properties: impl FnOnce() -> SavedProperties,
) {
    if let (Some(store), Some(retention)) = (store, retention) {
        store.borrow_mut().save(owner, properties(), retention);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bones_layout::{ElementKind, ElementTree};

    #[test]
    fn test_retention_prefers_strong() {
        assert_eq!(retention_for(true, true), Some(Retention::Strong));
        assert_eq!(retention_for(false, true), Some(Retention::Transient));
        assert_eq!(retention_for(false, false), None);
    }

    #[test]
    fn test_slot_restores_previous_layer() {
        let mut tree = ElementTree::new();
        let card = tree.insert_root(ElementKind::Generic);
        tree.replace_foreground(card, PaintLayer::Native(7));

        let slot = ForegroundSlot::new(PaintLayer::Skeleton);
        slot.install(&mut tree, card);
        slot.install(&mut tree, card);
        assert_eq!(tree.foreground(card), PaintLayer::Skeleton);

        slot.uninstall(&mut tree, card);
        assert_eq!(tree.foreground(card), PaintLayer::Native(7));
        assert!(!slot.is_installed());
    }
}
