//! Standalone bone drawable

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bones_core::{ElementId, LoaderState};
use bones_layout::{LayoutHost, PaintLayer};
use bones_paint::PaintContext;

use super::{retention_for, save_properties, uninstall_foreground, ForegroundSlot};
use crate::builder::BoneBuilder;
use crate::manager::{AnimationListener, BoneManager};
use crate::properties::{BoneProperties, EnabledSignal, StateBridge};
use crate::saved_state::{SavedProperties, SavedStateStore};

/// A single bone drawn over an element outside any skeleton
pub struct BoneDrawable {
    owner: ElementId,
    manager: BoneManager,
    signal: Rc<EnabledSignal>,
    slot: ForegroundSlot,
    pending_layout: Option<bool>,
    invalidated: Rc<Cell<bool>>,
    saved_state: Option<Rc<RefCell<SavedStateStore>>>,
}

impl BoneDrawable {
    /// Standalone bones cover their owner unless told otherwise
    pub fn new(owner: ElementId, mut properties: BoneProperties) -> Self {
        let signal = EnabledSignal::new(false);
        properties.attach_bridge(signal.clone());
        Self {
            owner,
            manager: BoneManager::new(properties),
            signal,
            slot: ForegroundSlot::new(PaintLayer::Bone),
            pending_layout: None,
            invalidated: Rc::new(Cell::new(false)),
            saved_state: None,
        }
    }

    /// Default properties for a standalone bone
    pub fn default_properties(mut properties: BoneProperties) -> BoneProperties {
        properties.match_owners_bounds = true;
        properties
    }

    pub fn with_saved_state(mut self, store: Rc<RefCell<SavedStateStore>>) -> Self {
        self.saved_state = Some(store);
        self
    }

    pub fn owner(&self) -> ElementId {
        self.owner
    }

    pub fn manager(&self) -> &BoneManager {
        &self.manager
    }

    pub fn properties(&self) -> &BoneProperties {
        self.manager.properties()
    }

    pub fn properties_mut(&mut self) -> &mut BoneProperties {
        self.manager.properties_mut()
    }

    pub fn builder(&mut self) -> BoneBuilder<'_> {
        BoneBuilder::new(self.manager.properties_mut())
    }

    pub fn queue_builder(&mut self, builder: impl FnOnce(&mut BoneProperties) + 'static) {
        self.manager.queue_builder(builder);
    }

    pub fn add_animation_listener(&mut self, on_start: Option<AnimationListener>, on_end: Option<AnimationListener>) {
        self.manager.add_animation_listener(on_start, on_end);
    }

    pub fn state(&self) -> LoaderState {
        self.manager.state()
    }

    pub fn enabled(&self) -> bool {
        self.signal.enabled()
    }

    pub fn is_disposed(&self) -> bool {
        self.manager.is_disposed()
    }

    pub fn is_waiting_for_layout(&self) -> bool {
        self.pending_layout.is_some()
    }

    pub fn take_invalidated(&self) -> bool {
        self.invalidated.replace(false)
    }

    // === State ===

    pub fn set_enabled(&mut self, host: &mut dyn LayoutHost, enabled: bool) {
        if self.is_disposed() {
            tracing::warn!(owner = %self.owner, "set_enabled on a disposed bone ignored");
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
            tracing::debug!(owner = %self.owner, "bone enable waits for layout");
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
                || SavedProperties::Bone(props.snapshot()),
            );
        });
        self.manager.enable(host, self.owner);
    }

    // === Host callbacks ===

    pub fn on_layout_complete(&mut self, host: &mut dyn LayoutHost) -> bool {
        if let Some(enabled) = self.pending_layout.take() {
            self.apply(host, enabled);
        }
        let recomputed = self.manager.on_layout_complete(host);
        if recomputed {
            self.invalidated.set(true);
        }
        recomputed
    }

    pub fn tick(&mut self, dt_ms: f32, host: &mut dyn LayoutHost) -> bool {
        if self.is_disposed() {
            return false;
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

    pub fn dispose(&mut self, host: &mut dyn LayoutHost) {
        self.pending_layout = None;
        self.manager.dispose(host);
        self.slot.uninstall(host, self.owner);
    }

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

impl std::fmt::Debug for BoneDrawable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoneDrawable")
            .field("owner", &self.owner)
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}
