//! Loader registry
//!
//! Keeps every drawable attached to a host tree and resolves requests made
//! against arbitrary elements:
//!
//! - an element inside a skeleton is served by that skeleton's properties
//! - a container nested under a skeleton registers its leaves as state
//!   owners of the outer skeleton instead of getting its own
//! - anything else gets a standalone loader
//!
//! The registry is also the single frame entry point: call [`tick_at`]
//! once per host frame and [`on_layout_complete`] after every layout pass.
//!
//! [`tick_at`]: LoaderRegistry::tick_at
//! [`on_layout_complete`]: LoaderRegistry::on_layout_complete

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Instant;

use bones_animation::FrameClock;
use bones_core::{ElementId, LoaderError, Result};
use bones_layout::LayoutHost;
use bones_paint::PaintContext;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::config::LoaderConfig;
use crate::drawable::{BoneDrawable, SkeletonDrawable};
use crate::properties::{BoneProperties, SkeletonProperties};
use crate::saved_state::SavedStateStore;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

pub struct LoaderRegistry {
    config: LoaderConfig,
    skeletons: FxIndexMap<ElementId, SkeletonDrawable>,
    bones: FxIndexMap<ElementId, BoneDrawable>,
    saved_state: Rc<RefCell<SavedStateStore>>,
    clock: FrameClock,
}

impl LoaderRegistry {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            skeletons: FxIndexMap::default(),
            bones: FxIndexMap::default(),
            saved_state: Rc::new(RefCell::new(SavedStateStore::new())),
            clock: FrameClock::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn saved_state(&self) -> Ref<'_, SavedStateStore> {
        self.saved_state.borrow()
    }

    /// Drop snapshots saved with weak retention
    pub fn expire_transient_state(&mut self) -> usize {
        self.saved_state.borrow_mut().expire_transient()
    }

    // === Attachment ===

    /// Attach a skeleton to `container`, or return the one already there
    pub fn add_skeleton_loader(&mut self, host: &dyn LayoutHost, container: ElementId) -> Result<&mut SkeletonDrawable> {
        if !host.contains(container) {
            return Err(LoaderError::UnknownElement(container));
        }
        if host.children(container).is_empty() {
            return Err(LoaderError::NotAContainer(container));
        }
        if self.bones.contains_key(&container) {
            return Err(LoaderError::AlreadyAttached(container));
        }

        let config = &self.config;
        let store = &self.saved_state;
        let drawable = self.skeletons.entry(container).or_insert_with(|| {
            let mut props = SkeletonProperties::from_config(config);
            if let Some(snapshot) = store.borrow_mut().take_skeleton(container) {
                tracing::debug!(%container, "skeleton properties restored");
                props.restore(&snapshot);
            }
            tracing::debug!(%container, "skeleton loader attached");
            SkeletonDrawable::new(container, props).with_saved_state(store.clone())
        });
        Ok(drawable)
    }

    /// Attach a standalone bone to `id`, or return the one already there
    pub fn add_bone_loader(&mut self, host: &dyn LayoutHost, id: ElementId) -> Result<&mut BoneDrawable> {
        if !host.contains(id) {
            return Err(LoaderError::UnknownElement(id));
        }
        if self.skeletons.contains_key(&id) {
            return Err(LoaderError::AlreadyAttached(id));
        }

        let config = &self.config;
        let store = &self.saved_state;
        let drawable = self.bones.entry(id).or_insert_with(|| {
            let mut props = BoneDrawable::default_properties(BoneProperties::from_config(config));
            if let Some(snapshot) = store.borrow_mut().take_bone(id) {
                tracing::debug!(%id, "bone properties restored");
                props.restore(&snapshot);
            }
            tracing::debug!(%id, "bone loader attached");
            BoneDrawable::new(id, props).with_saved_state(store.clone())
        });
        Ok(drawable)
    }

    /// Dispose and forget the loader attached to `id`
    pub fn detach(&mut self, host: &mut dyn LayoutHost, id: ElementId) -> bool {
        if let Some(mut drawable) = self.skeletons.shift_remove(&id) {
            drawable.dispose(host);
            true
        } else if let Some(mut drawable) = self.bones.shift_remove(&id) {
            drawable.dispose(host);
            true
        } else {
            false
        }
    }

    pub fn skeleton(&self, id: ElementId) -> Option<&SkeletonDrawable> {
        self.skeletons.get(&id)
    }

    pub fn skeleton_mut(&mut self, id: ElementId) -> Option<&mut SkeletonDrawable> {
        self.skeletons.get_mut(&id)
    }

    pub fn bone(&self, id: ElementId) -> Option<&BoneDrawable> {
        self.bones.get(&id)
    }

    pub fn bone_mut(&mut self, id: ElementId) -> Option<&mut BoneDrawable> {
        self.bones.get_mut(&id)
    }

    pub fn skeleton_count(&self) -> usize {
        self.skeletons.len()
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Nearest ancestor of `id` carrying a skeleton
    pub fn parent_skeleton(&self, host: &dyn LayoutHost, id: ElementId) -> Option<ElementId> {
        host.find_ancestor(id, &|ancestor: ElementId| self.skeletons.contains_key(&ancestor))
    }

    // === Requests ===

    /// Show or hide the skeleton of `container`
    ///
    /// A container inside another skeleton hands its leaves to that skeleton
    /// as state owners: enabling registers them, disabling releases them
    /// and fades their bones out.
    pub fn set_skeleton_enabled(&mut self, host: &mut dyn LayoutHost, container: ElementId, enabled: bool) -> Result<()> {
        if let Some(drawable) = self.skeletons.get_mut(&container) {
            drawable.set_enabled(host, enabled);
            return Ok(());
        }
        if !host.contains(container) {
            return Err(LoaderError::UnknownElement(container));
        }

        if let Some(parent) = self.parent_skeleton(host, container) {
            let leaves = host.descendant_leaves(container);
            if let Some(drawable) = self.skeletons.get_mut(&parent) {
                let props = drawable.properties_mut();
                for leaf in leaves {
                    props.set_state_owner(leaf, enabled);
                    if !enabled {
                        props.get_or_create_mut(leaf).set_enabled(false);
                    }
                }
                tracing::debug!(%container, %parent, enabled, "nested skeleton routed to parent");
            }
            return Ok(());
        }

        self.add_skeleton_loader(host, container)?;
        if let Some(drawable) = self.skeletons.get_mut(&container) {
            drawable.set_enabled(host, enabled);
        }
        Ok(())
    }

    /// Show or hide the bone of `id`
    ///
    /// Inside a skeleton this edits the skeleton's bone properties; a
    /// disabled bone fades out on its own on the next frame.
    pub fn set_bone_enabled(&mut self, host: &mut dyn LayoutHost, id: ElementId, enabled: bool) -> Result<()> {
        if let Some(drawable) = self.bones.get_mut(&id) {
            drawable.set_enabled(host, enabled);
            return Ok(());
        }
        if let Some(parent) = self.parent_skeleton(host, id) {
            if let Some(drawable) = self.skeletons.get_mut(&parent) {
                drawable.properties_mut().get_or_create_mut(id).set_enabled(enabled);
            }
            return Ok(());
        }

        self.add_bone_loader(host, id)?;
        if let Some(drawable) = self.bones.get_mut(&id) {
            drawable.set_enabled(host, enabled);
        }
        Ok(())
    }

    /// Register or drop `id` as a state owner of its enclosing skeleton
    ///
    /// Returns false when `id` is not inside a skeleton.
    pub fn set_bone_state_owner(&mut self, host: &dyn LayoutHost, id: ElementId, owner: bool) -> Result<bool> {
        if !host.contains(id) {
            return Err(LoaderError::UnknownElement(id));
        }
        let Some(drawable) = self
            .parent_skeleton(host, id)
            .and_then(|parent| self.skeletons.get_mut(&parent))
        else {
            return Ok(false);
        };
        drawable.properties_mut().set_state_owner(id, owner);
        Ok(true)
    }

    /// Exclude `id` from, or return it to, its enclosing skeleton
    pub fn set_ignored(&mut self, host: &dyn LayoutHost, id: ElementId, ignored: bool) -> Result<bool> {
        if !host.contains(id) {
            return Err(LoaderError::UnknownElement(id));
        }
        let Some(drawable) = self
            .parent_skeleton(host, id)
            .and_then(|parent| self.skeletons.get_mut(&parent))
        else {
            return Ok(false);
        };
        let props = drawable.properties_mut();
        if ignored {
            props.add_ignored([id]);
        } else {
            props.remove_ignored(id);
        }
        Ok(true)
    }

    /// An image finished loading; its bone is no longer needed
    pub fn notify_image_loaded(&mut self, host: &mut dyn LayoutHost, id: ElementId) {
        if let Some(drawable) = self.bones.get_mut(&id) {
            drawable.set_enabled(host, false);
        } else if let Some(parent) = self.parent_skeleton(host, id) {
            if let Some(drawable) = self.skeletons.get_mut(&parent) {
                drawable.properties_mut().get_or_create_mut(id).set_enabled(false);
            }
        } else {
            tracing::trace!(%id, "image loaded without a loader");
        }
    }

    // === Frames ===

    /// Advance every loader by `dt_ms`; returns true if anything needs a repaint
    pub fn tick(&mut self, host: &mut dyn LayoutHost, dt_ms: f32) -> bool {
        let mut repaint = false;
        for drawable in self.skeletons.values_mut() {
            repaint |= drawable.tick(dt_ms, host);
        }
        for drawable in self.bones.values_mut() {
            repaint |= drawable.tick(dt_ms, host);
        }
        repaint
    }

    /// Advance every loader to the frame at `now`
    pub fn tick_at(&mut self, host: &mut dyn LayoutHost, now: Instant) -> bool {
        let dt = self.clock.tick(now);
        self.tick(host, dt)
    }

    /// Forward a finished layout pass to every loader
    pub fn on_layout_complete(&mut self, host: &mut dyn LayoutHost) {
        for drawable in self.skeletons.values_mut() {
            drawable.on_layout_complete(host);
        }
        for drawable in self.bones.values_mut() {
            drawable.on_layout_complete(host);
        }
    }

    /// Draw the loader attached to `id`, if any
    pub fn draw(&self, id: ElementId, ctx: &mut PaintContext) -> bool {
        match (self.skeletons.get(&id), self.bones.get(&id)) {
            (Some(drawable), _) => drawable.draw(ctx),
            (None, Some(drawable)) => drawable.draw(ctx),
            (None, None) => false,
        }
    }

    /// Dispose every loader
    pub fn clear(&mut self, host: &mut dyn LayoutHost) {
        for (_, mut drawable) in self.skeletons.drain(..) {
            drawable.dispose(host);
        }
        for (_, mut drawable) in self.bones.drain(..) {
            drawable.dispose(host);
        }
        self.clock.reset();
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("skeletons", &self.skeletons.len())
            .field("bones", &self.bones.len())
            .field("saved", &self.saved_state.borrow().len())
            .finish()
    }
}
