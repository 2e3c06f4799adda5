//! Skeleton manager

use std::collections::VecDeque;

use bones_animation::{AnimationScheduler, AnimatorId, AnimatorTick, Easing, RepeatCount, ValueAnimator};
use bones_core::{ElementId, LoaderEvent, LoaderLifecycle, LoaderState};
use bones_layout::LayoutHost;
use bones_paint::PaintContext;
use rustc_hash::FxHashMap;

use super::{AnimationListener, AnimationListeners};
use crate::properties::SkeletonProperties;
use crate::renderer::SkeletonRenderer;
use crate::skeleton::{ComputeOutcome, Skeleton};

/// Property edit queued until the next enable
pub type SkeletonBuilderFn = Box<dyn FnOnce(&mut SkeletonProperties)>;
/// Receives the properties when the skeleton is released
pub type SkeletonDiscardHook = Box<dyn FnOnce(&mut dyn LayoutHost, &SkeletonProperties)>;

pub struct SkeletonManager {
    properties: SkeletonProperties,
    skeleton: Skeleton,
    renderer: SkeletonRenderer,
    lifecycle: LoaderLifecycle,
    scheduler: AnimationScheduler,
    shimmer: Option<AnimatorId>,
    fade: Option<AnimatorId>,
    bone_fades: FxHashMap<AnimatorId, ElementId>,
    listeners: AnimationListeners,
    builders: VecDeque<SkeletonBuilderFn>,
    on_discard: Option<SkeletonDiscardHook>,
}

impl SkeletonManager {
    pub fn new(properties: SkeletonProperties) -> Self {
        Self {
            properties,
            skeleton: Skeleton::new(),
            renderer: SkeletonRenderer::new(),
            lifecycle: LoaderLifecycle::new("skeleton"),
            scheduler: AnimationScheduler::new(),
            shimmer: None,
            fade: None,
            bone_fades: FxHashMap::default(),
            listeners: AnimationListeners::new(),
            builders: VecDeque::new(),
            on_discard: None,
        }
    }

    pub fn properties(&self) -> &SkeletonProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut SkeletonProperties {
        &mut self.properties
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn renderer(&self) -> &SkeletonRenderer {
        &self.renderer
    }

    pub fn state(&self) -> LoaderState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> &LoaderLifecycle {
        &self.lifecycle
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }

    pub fn is_shimmering(&self) -> bool {
        self.shimmer
            .and_then(|id| self.scheduler.get(id))
            .is_some_and(ValueAnimator::is_running)
    }

    /// Number of per-bone fades in flight
    pub fn fading_bones(&self) -> usize {
        self.bone_fades.len()
    }

    // === Builders and listeners ===

    /// Queue a property edit, applied in order on the next enable
    pub fn queue_builder(&mut self, builder: impl FnOnce(&mut SkeletonProperties) + 'static) {
        self.builders.push_back(Box::new(builder));
    }

    pub fn pending_builders(&self) -> usize {
        self.builders.len()
    }

    /// Called once, on the next release
    pub fn set_discard_hook(&mut self, hook: impl FnOnce(&mut dyn LayoutHost, &SkeletonProperties) + 'static) {
        self.on_discard = Some(Box::new(hook));
    }

    pub fn add_update_listener(&mut self, listener: impl FnMut(f32) + 'static) {
        self.listeners.add_update(Box::new(listener));
    }

    /// Start/end callbacks of the shimmer animation
    pub fn add_animation_listener(
        &mut self,
        on_start: Option<AnimationListener>,
        on_end: Option<AnimationListener>,
    ) {
        self.listeners.add(on_start, on_end);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // === Lifecycle ===

    /// Show the skeleton over `container`
    pub fn enable(&mut self, host: &mut dyn LayoutHost, container: ElementId) {
        if self.is_disposed() {
            tracing::warn!(%container, "enable on a disposed skeleton ignored");
            return;
        }
        self.cancel_fade();

        while let Some(builder) = self.builders.pop_front() {
            builder(&mut self.properties);
        }

        let outcome = self.skeleton.compute(host, container, &mut self.properties);
        self.renderer.set_should_render(true);
        if outcome == ComputeOutcome::Built {
            self.skeleton.conceal_content(host);
        }
        self.start_shimmer();
        self.lifecycle.send(LoaderEvent::Enable);
    }

    /// Hide the skeleton, fading it out when transitions are on
    pub fn disable(&mut self, host: &mut dyn LayoutHost) {
        if self.is_disposed() {
            tracing::warn!("disable on a disposed skeleton ignored");
            return;
        }
        if !self.lifecycle.is_active() || self.fade.is_some() {
            return;
        }

        let duration = self.properties.state_transition_duration_ms;
        if self.properties.use_state_transition && duration > 0 {
            let mut animator = ValueAnimator::new(duration);
            animator.start();
            self.fade = Some(self.scheduler.add(animator));
            self.lifecycle.send(LoaderEvent::BeginFade);
        } else {
            self.skeleton.reveal_content(host);
            self.lifecycle.send(LoaderEvent::Disable);
            self.release(host);
        }
    }

    /// Run a build that waited for layout
    pub fn on_layout_complete(&mut self, host: &mut dyn LayoutHost) -> bool {
        if !self.skeleton.on_layout_complete(host, &mut self.properties) {
            return false;
        }
        if self.state() == LoaderState::Enabled {
            self.skeleton.conceal_content(host);
        }
        true
    }

    /// Advance animations; returns true if anything moved
    pub fn tick(&mut self, dt_ms: f32, host: &mut dyn LayoutHost) -> bool {
        if self.is_disposed() {
            return false;
        }
        if self.state() == LoaderState::Enabled {
            for id in self.skeleton.take_disable_requests() {
                self.dispose_bone(host, id);
            }
        }

        let frames = self.scheduler.tick(dt_ms);
        for (id, tick) in frames.iter().copied() {
            if self.shimmer == Some(id) {
                self.on_shimmer_frame(tick);
            } else if self.fade == Some(id) {
                self.on_fade_frame(host, tick);
            } else if let Some(bone) = self.bone_fades.get(&id).copied() {
                self.on_bone_fade_frame(host, id, bone, tick);
            }
        }
        !frames.is_empty()
    }

    pub fn render(&self, ctx: &mut PaintContext) -> bool {
        self.renderer
            .render(&self.skeleton, self.properties.allow_bone_generation, ctx)
    }

    /// Tear down for good; later calls are no-ops
    pub fn dispose(&mut self, host: &mut dyn LayoutHost) {
        if self.is_disposed() {
            return;
        }
        if self.lifecycle.is_active() {
            self.skeleton.reveal_content(host);
            self.release(host);
        }
        self.builders.clear();
        self.lifecycle.send(LoaderEvent::Dispose);
    }

    /// Return to a fresh disabled state, ready for another container
    pub fn reset_for_reuse(&mut self, host: &mut dyn LayoutHost) {
        if self.lifecycle.is_active() {
            self.skeleton.reveal_content(host);
            self.release(host);
            self.lifecycle.send(LoaderEvent::Disable);
        }
        self.properties.reset_for_reuse();
        self.skeleton = Skeleton::new();
        self.scheduler.clear();
        self.listeners.clear();
        self.builders.clear();
        self.on_discard = None;
        if self.is_disposed() {
            self.lifecycle.send(LoaderEvent::Reset);
        }
    }

    // === Per-bone disposal ===

    /// Fade out one bone, leaving the rest of the skeleton up
    pub fn dispose_bone(&mut self, host: &mut dyn LayoutHost, id: ElementId) {
        if self.bone_fades.values().any(|bone| *bone == id) {
            return;
        }
        let duration = self.properties.state_transition_duration_ms;
        if self.properties.use_state_transition && duration > 0 {
            let mut animator = ValueAnimator::new(duration);
            animator.start();
            let animator_id = self.scheduler.add(animator);
            self.bone_fades.insert(animator_id, id);
            tracing::debug!(%id, duration, "bone fade started");
        } else {
            if let Some(bone) = self.skeleton.bone(id) {
                bone.reveal_content(host);
            }
            self.finish_bone_disposal(host, id);
        }
    }

    fn on_bone_fade_frame(&mut self, host: &mut dyn LayoutHost, animator: AnimatorId, id: ElementId, tick: AnimatorTick) {
        if let Some(bone) = self.skeleton.bone_mut(id) {
            if tick.started {
                bone.prepare_content_fade(host);
            }
            bone.on_fade(tick.fraction);
            bone.fade_content(host, tick.fraction);
        }
        self.listeners.notify_update(tick.fraction);
        if tick.ended {
            self.bone_fades.remove(&animator);
            self.scheduler.remove(animator);
            self.finish_bone_disposal(host, id);
        }
    }

    fn finish_bone_disposal(&mut self, host: &mut dyn LayoutHost, id: ElementId) {
        self.skeleton.remove_bone(host, id);
        self.properties.get_or_create_mut(id).mark_disposed();
        self.properties.remove_state_owner(id);
        self.properties.add_disposed(id);
        tracing::debug!(%id, "bone disposed");
    }

    // === Animators ===

    fn start_shimmer(&mut self) {
        self.stop_shimmer();
        let shimmer = &self.properties.shimmer_ray_properties;
        let easing = if shimmer.shared_easing {
            shimmer.easing
        } else {
            Easing::Linear
        };
        let mut animator = ValueAnimator::new(shimmer.cycle_duration_ms())
            .with_easing(easing)
            .with_repeat(RepeatCount::Infinite);
        animator.start();
        self.shimmer = Some(self.scheduler.add(animator));
    }

    /// End (firing end listeners) and drop the shimmer animator
    fn stop_shimmer(&mut self) {
        let Some(id) = self.shimmer.take() else {
            return;
        };
        if let Some(mut animator) = self.scheduler.remove(id) {
            if animator.end().is_some() {
                self.listeners.notify_end();
            }
            animator.cancel();
        }
    }

    fn cancel_fade(&mut self) {
        if let Some(id) = self.fade.take() {
            if let Some(mut animator) = self.scheduler.remove(id) {
                animator.cancel();
            }
            tracing::debug!("skeleton fade cancelled");
        }
    }

    fn on_shimmer_frame(&mut self, tick: AnimatorTick) {
        if tick.started {
            self.listeners.notify_start();
        }
        self.skeleton.on_update(tick.fraction);
        self.listeners.notify_update(tick.fraction);
        if tick.ended {
            self.listeners.notify_end();
        }
    }

    fn on_fade_frame(&mut self, host: &mut dyn LayoutHost, tick: AnimatorTick) {
        if tick.started {
            tracing::debug!("skeleton fade started");
            self.skeleton.prepare_content_fade(host);
            self.skeleton.restore(host);
        }
        self.skeleton.on_fade(tick.fraction);
        self.skeleton.fade_content(host, tick.fraction);
        self.listeners.notify_update(tick.fraction);
        if tick.ended {
            self.fade = None;
            self.lifecycle.send(LoaderEvent::FadeComplete);
            self.release(host);
        }
    }

    /// Stop animators, restore repaired bounds, drop bones and listeners
    fn release(&mut self, host: &mut dyn LayoutHost) {
        self.stop_shimmer();
        self.scheduler.clear();
        self.fade = None;
        self.bone_fades.clear();
        self.skeleton.restore(host);
        self.skeleton.dispose();
        self.renderer.set_should_render(false);
        self.listeners.clear();
        if let Some(hook) = self.on_discard.take() {
            hook(host, &self.properties);
        }
        tracing::debug!("skeleton released");
    }
}

impl std::fmt::Debug for SkeletonManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkeletonManager")
            .field("state", &self.state())
            .field("bones", &self.skeleton.bone_count())
            .field("animators", &self.scheduler.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
