//! Skeleton drawable

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bones_core::{ElementId, LoaderState};
use bones_layout::{LayoutHost, PaintLayer};
use bones_paint::PaintContext;

use super::{retention_for, save_properties, uninstall_foreground, ForegroundSlot};
use crate::builder::SkeletonBuilder;
use crate::manager::{AnimationListener, SkeletonManager};
use crate::properties::{EnabledSignal, SkeletonProperties, StateBridge};
use crate::saved_state::{SavedProperties, SavedStateStore};

/// Skeleton attached to one container's foreground
pub struct SkeletonDrawable {
    owner: ElementId,
    manager: SkeletonManager,
    signal: Rc<EnabledSignal>,
    slot: ForegroundSlot,
    /// Transition waiting for the owner's first layout pass
    pending_layout: Option<bool>,
    invalidated: Rc<Cell<bool>>,
    saved_state: Option<Rc<RefCell<SavedStateStore>>>,
}

impl SkeletonDrawable {
    pub fn new(owner: ElementId, mut properties: SkeletonProperties) -> Self {
        let signal = EnabledSignal::new(false);
        properties.attach_bridge(signal.clone());
        Self {
            owner,
            manager: SkeletonManager::new(properties),
            signal,
            slot: ForegroundSlot::new(PaintLayer::Skeleton),
            pending_layout: None,
            invalidated: Rc::new(Cell::new(false)),
            saved_state: None,
        }
    }

    /// Save properties into `store` when the skeleton is discarded
    pub fn with_saved_state(mut self, store: Rc<RefCell<SavedStateStore>>) -> Self {
        self.saved_state = Some(store);
        self
    }

    pub fn owner(&self) -> ElementId {
        self.owner
    }

    pub fn manager(&self) -> &SkeletonManager {
        &self.manager
    }

    pub fn properties(&self) -> &SkeletonProperties {
        self.manager.properties()
    }

    pub fn properties_mut(&mut self) -> &mut SkeletonProperties {
        self.manager.properties_mut()
    }

    pub fn builder(&mut self) -> SkeletonBuilder<'_> {
        SkeletonBuilder::new(self.manager.properties_mut())
    }

    /// Queue a property edit for the next enable
    pub fn queue_builder(&mut self, builder: impl FnOnce(&mut SkeletonProperties) + 'static) {
        self.manager.queue_builder(builder);
    }

    pub fn add_animation_listener(&mut self, on_start: Option<AnimationListener>, on_end: Option<AnimationListener>) {
        self.manager.add_animation_listener(on_start, on_end);
    }

    pub fn state(&self) -> LoaderState {
        self.manager.state()
    }

    /// Requested state; a pending request counts
    pub fn enabled(&self) -> bool {
        self.signal.enabled()
    }

    pub fn is_disposed(&self) -> bool {
        self.manager.is_disposed()
    }

    pub fn is_waiting_for_layout(&self) -> bool {
        self.pending_layout.is_some()
    }

    /// Whether an animation frame asked for a repaint since the last call
    pub fn take_invalidated(&self) -> bool {
        self.invalidated.replace(false)
    }

    // === State ===

    /// Show or hide the skeleton
    ///
    /// Disabling waits while state owners are registered.
    pub fn set_enabled(&mut self, host: &mut dyn LayoutHost, enabled: bool) {
        if self.is_disposed() {
            tracing::warn!(owner = %self.owner, "set_enabled on a disposed skeleton ignored");
            return;
        }
        self.manager.properties_mut().set_enabled(enabled);
        self.sync(host);
    }

    pub fn enable(&mut self, host: &mut dyn LayoutHost) {
        self.set_enabled(host, true);
    }

    pub fn disable(&mut self, host: &mut dyn LayoutHost) {
        self.set_enabled(host, false);
    }

    /// Apply a request written through the properties; returns true if one was pending
    pub fn sync(&mut self, host: &mut dyn LayoutHost) -> bool {
        match self.signal.take_request() {
            Some(enabled) => {
                self.apply(host, enabled);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, host: &mut dyn LayoutHost, enabled: bool) {
        if enabled && !host.is_laid_out(self.owner) {
            tracing::debug!(owner = %self.owner, "skeleton enable waits for layout");
            self.pending_layout = Some(true);
            return;
        }
        self.pending_layout = None;
        if enabled {
            self.show(host);
        } else {
            self.manager.disable(host);
        }
        self.invalidated.set(true);
    }

    fn show(&mut self, host: &mut dyn LayoutHost) {
        self.slot.install(host, self.owner);
        if self.manager.state() == LoaderState::Disabled {
            let invalidated = self.invalidated.clone();
            self.manager.add_update_listener(move |_| invalidated.set(true));
        }

        let owner = self.owner;
        let previous = self.slot.handle();
        let store = self.saved_state.clone();
        self.manager.set_discard_hook(move |host, props| {
            uninstall_foreground(&previous, host, owner);
            save_properties(
                store.as_ref(),
                owner,
                retention_for(props.allow_saved_state, props.allow_weak_saved_state),
                || SavedProperties::Skeleton(props.snapshot()),
            );
        });
        self.manager.enable(host, self.owner);
    }

    // === Host callbacks ===

    /// Run whatever was waiting for a layout pass
    ///
    /// A queued enable computes against this pass; bounds it repairs are
    /// only measured on the next one, so its deferred build waits for that.
    pub fn on_layout_complete(&mut self, host: &mut dyn LayoutHost) -> bool {
        if let Some(enabled) = self.pending_layout.take() {
            self.apply(host, enabled);
            return !self.manager.skeleton().is_pending();
        }
        let built = self.manager.on_layout_complete(host);
        if built {
            self.invalidated.set(true);
        }
        built
    }

    /// Advance one frame; returns true if the owner needs a repaint
    pub fn tick(&mut self, dt_ms: f32, host: &mut dyn LayoutHost) -> bool {
        if self.is_disposed() {
            return false;
        }
        let props = self.manager.properties_mut();
        if props.is_waiting() && props.state_owner_count() == 0 {
            tracing::debug!(owner = %self.owner, "state owners drained, disabling");
            props.set_enabled(false);
        }
        self.sync(host);
        self.manager.tick(dt_ms, host);

        let repaint = self.take_invalidated();
        if repaint {
            host.invalidate(self.owner);
        }
        repaint
    }

    pub fn draw(&self, ctx: &mut PaintContext) -> bool {
        self.manager.render(ctx)
    }

    /// Tear down for good, restoring the foreground slot
    pub fn dispose(&mut self, host: &mut dyn LayoutHost) {
        self.pending_layout = None;
        self.manager.dispose(host);
        self.slot.uninstall(host, self.owner);
    }

    /// Move to another container with fresh properties
    pub fn reset_for_reuse(&mut self, host: &mut dyn LayoutHost, owner: ElementId) {
        self.manager.reset_for_reuse(host);
        self.slot.uninstall(host, self.owner);
        self.owner = owner;
        self.pending_layout = None;
        self.invalidated.set(false);
        self.signal = EnabledSignal::new(false);
        self.manager.properties_mut().attach_bridge(self.signal.clone());
    }
}

impl std::fmt::Debug for SkeletonDrawable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkeletonDrawable")
            .field("owner", &self.owner)
            .field("manager", &self.manager)
            .field("pending_layout", &self.pending_layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bones_layout::{ElementKind, ElementTree, Visibility};

    fn card() -> (ElementTree, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let card = tree.insert_root(ElementKind::Generic);
        let title = tree.insert(card, ElementKind::Text).unwrap();
        tree.set_size(card, 120.0, 40.0);
        tree.set_size(title, 120.0, 14.0);
        (tree, card, title)
    }

    #[test]
    fn test_enable_waits_for_layout() {
        let (mut tree, card, title) = card();
        let mut drawable = SkeletonDrawable::new(card, SkeletonProperties::new());
        drawable.enable(&mut tree);
        assert!(drawable.is_waiting_for_layout());
        assert!(drawable.enabled());
        assert_eq!(drawable.state(), LoaderState::Disabled);

        tree.layout_pass();
        drawable.on_layout_complete(&mut tree);
        assert_eq!(drawable.state(), LoaderState::Enabled);
        assert_eq!(tree.foreground(card), PaintLayer::Skeleton);
        assert_eq!(tree.visibility(title), Visibility::Invisible);
    }

    #[test]
    fn test_repair_before_first_layout_builds_on_next_pass() {
        let (mut tree, card, title) = card();
        let caption = tree.insert(card, ElementKind::Text).unwrap();
        tree.set_position(caption, 0.0, 20.0);
        tree.set_size(caption, 120.0, 0.0);
        let mut drawable = SkeletonDrawable::new(card, SkeletonProperties::new());
        drawable.enable(&mut tree);

        tree.layout_pass();
        assert!(!drawable.on_layout_complete(&mut tree));
        assert!(drawable.manager().skeleton().is_pending());
        assert_eq!(tree.measured_size(caption), (120.0, 0.0));

        tree.layout_pass();
        assert!(drawable.on_layout_complete(&mut tree));
        let skeleton = drawable.manager().skeleton();
        assert!(!skeleton.is_pending());
        assert!(skeleton.bone(caption).is_some());
        assert!(skeleton.bone(title).is_some());
        assert_eq!(tree.visibility(caption), Visibility::Invisible);
    }

    #[test]
    fn test_same_value_is_a_noop() {
        let (mut tree, card, _) = card();
        tree.layout_pass();
        let mut drawable = SkeletonDrawable::new(card, SkeletonProperties::new());
        drawable.disable(&mut tree);
        assert!(!drawable.sync(&mut tree));
        assert_eq!(drawable.state(), LoaderState::Disabled);
        assert_eq!(tree.foreground(card), PaintLayer::Empty);
    }

    #[test]
    fn test_disable_restores_foreground() {
        let (mut tree, card, _) = card();
        tree.layout_pass();
        tree.replace_foreground(card, PaintLayer::Native(3));
        let mut props = SkeletonProperties::new();
        props.use_state_transition = false;
        let mut drawable = SkeletonDrawable::new(card, props);

        drawable.enable(&mut tree);
        assert_eq!(tree.foreground(card), PaintLayer::Skeleton);
        drawable.disable(&mut tree);
        assert_eq!(tree.foreground(card), PaintLayer::Native(3));
    }

    #[test]
    fn test_frames_invalidate_host() {
        let (mut tree, card, _) = card();
        tree.layout_pass();
        let mut drawable = SkeletonDrawable::new(card, SkeletonProperties::new());
        drawable.enable(&mut tree);
        let before = tree.invalidations();
        assert!(drawable.tick(16.0, &mut tree));
        assert!(drawable.tick(16.0, &mut tree));
        assert_eq!(tree.invalidations(), before + 2);
    }

    #[test]
    fn test_property_write_is_synced_on_tick() {
        let (mut tree, card, _) = card();
        tree.layout_pass();
        let mut drawable = SkeletonDrawable::new(card, SkeletonProperties::new());
        drawable.properties_mut().set_enabled(true);
        assert_eq!(drawable.state(), LoaderState::Disabled);
        drawable.tick(0.0, &mut tree);
        assert_eq!(drawable.state(), LoaderState::Enabled);
    }
}
