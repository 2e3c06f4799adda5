//! Standalone bone manager

use std::collections::VecDeque;

use bones_animation::{AnimationScheduler, AnimatorId, AnimatorTick, Easing, RepeatCount, ValueAnimator};
use bones_core::{ElementId, LoaderEvent, LoaderLifecycle, LoaderState};
use bones_layout::LayoutHost;
use bones_paint::PaintContext;

use super::{AnimationListener, AnimationListeners};
use crate::bone::Bone;
use crate::properties::BoneProperties;
use crate::renderer::BoneRenderer;

pub type BoneBuilderFn = Box<dyn FnOnce(&mut BoneProperties)>;
pub type BoneDiscardHook = Box<dyn FnOnce(&mut dyn LayoutHost, &BoneProperties)>;

/// Drives one [`Bone`] drawn over its own owner
pub struct BoneManager {
    properties: BoneProperties,
    bone: Option<Bone>,
    renderer: BoneRenderer,
    lifecycle: LoaderLifecycle,
    scheduler: AnimationScheduler,
    shimmer: Option<AnimatorId>,
    fade: Option<AnimatorId>,
    listeners: AnimationListeners,
    builders: VecDeque<BoneBuilderFn>,
    on_discard: Option<BoneDiscardHook>,
}

impl BoneManager {
    pub fn new(properties: BoneProperties) -> Self {
        Self {
            properties,
            bone: None,
            renderer: BoneRenderer::new(),
            lifecycle: LoaderLifecycle::new("bone"),
            scheduler: AnimationScheduler::new(),
            shimmer: None,
            fade: None,
            listeners: AnimationListeners::new(),
            builders: VecDeque::new(),
            on_discard: None,
        }
    }

    pub fn properties(&self) -> &BoneProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut BoneProperties {
        &mut self.properties
    }

    pub fn bone(&self) -> Option<&Bone> {
        self.bone.as_ref()
    }

    pub fn renderer(&self) -> &BoneRenderer {
        &self.renderer
    }

    pub fn state(&self) -> LoaderState {
        self.lifecycle.state()
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }

    pub fn is_shimmering(&self) -> bool {
        self.shimmer
            .and_then(|id| self.scheduler.get(id))
            .is_some_and(ValueAnimator::is_running)
    }

    pub fn queue_builder(&mut self, builder: impl FnOnce(&mut BoneProperties) + 'static) {
        self.builders.push_back(Box::new(builder));
    }

    pub fn pending_builders(&self) -> usize {
        self.builders.len()
    }

    /// Called once, on the next release
    pub fn set_discard_hook(&mut self, hook: impl FnOnce(&mut dyn LayoutHost, &BoneProperties) + 'static) {
        self.on_discard = Some(Box::new(hook));
    }

    pub fn add_update_listener(&mut self, listener: impl FnMut(f32) + 'static) {
        self.listeners.add_update(Box::new(listener));
    }

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

    pub fn enable(&mut self, host: &dyn LayoutHost, owner: ElementId) {
        if self.is_disposed() {
            tracing::warn!(%owner, "enable on a disposed bone ignored");
            return;
        }
        self.cancel_fade();
        while let Some(builder) = self.builders.pop_front() {
            builder(&mut self.properties);
        }

        let mut bone = Bone::new(owner);
        bone.compute(host, &self.properties);
        self.bone = Some(bone);
        self.renderer.set_should_render(true);
        self.start_shimmer();
        self.lifecycle.send(LoaderEvent::Enable);
    }

    pub fn disable(&mut self, host: &mut dyn LayoutHost) {
        if self.is_disposed() {
            tracing::warn!("disable on a disposed bone ignored");
            return;
        }
        if !self.lifecycle.is_active() || self.fade.is_some() {
            return;
        }
        let duration = self.properties.transition_duration_ms;
        if duration > 0 {
            let mut animator = ValueAnimator::new(duration);
            animator.start();
            self.fade = Some(self.scheduler.add(animator));
            self.lifecycle.send(LoaderEvent::BeginFade);
        } else {
            self.lifecycle.send(LoaderEvent::Disable);
            self.release(host);
        }
    }

    /// Recompute after the owner was re-measured
    pub fn on_layout_complete(&mut self, host: &dyn LayoutHost) -> bool {
        if self.state() != LoaderState::Enabled {
            return false;
        }
        match self.bone.as_mut() {
            Some(bone) => bone.compute(host, &self.properties),
            None => false,
        }
    }

    pub fn tick(&mut self, dt_ms: f32, host: &mut dyn LayoutHost) -> bool {
        if self.is_disposed() {
            return false;
        }
        let frames = self.scheduler.tick(dt_ms);
        for (id, tick) in frames.iter().copied() {
            if self.shimmer == Some(id) {
                self.on_shimmer_frame(tick);
            } else if self.fade == Some(id) {
                self.on_fade_frame(host, tick);
            }
        }
        !frames.is_empty()
    }

    pub fn render(&self, ctx: &mut PaintContext) -> bool {
        match &self.bone {
            Some(bone) => self.renderer.render(bone, ctx),
            None => false,
        }
    }

    pub fn dispose(&mut self, host: &mut dyn LayoutHost) {
        if self.is_disposed() {
            return;
        }
        if self.lifecycle.is_active() {
            self.release(host);
        }
        self.builders.clear();
        self.lifecycle.send(LoaderEvent::Dispose);
    }

    pub fn reset_for_reuse(&mut self, host: &mut dyn LayoutHost) {
        if self.lifecycle.is_active() {
            self.release(host);
            self.lifecycle.send(LoaderEvent::Disable);
        }
        self.properties.reset_for_reuse();
        self.scheduler.clear();
        self.listeners.clear();
        self.builders.clear();
        self.on_discard = None;
        if self.is_disposed() {
            self.lifecycle.send(LoaderEvent::Reset);
        }
    }

    // === Animators ===

    /// Only bones with shimmer properties of their own shimmer
    fn start_shimmer(&mut self) {
        self.stop_shimmer();
        let Some(shimmer) = self.properties.shimmer_ray_properties() else {
            return;
        };
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
        }
    }

    fn on_shimmer_frame(&mut self, tick: AnimatorTick) {
        if tick.started {
            self.listeners.notify_start();
        }
        if let Some(bone) = self.bone.as_mut() {
            bone.on_update(tick.fraction);
        }
        self.listeners.notify_update(tick.fraction);
    }

    fn on_fade_frame(&mut self, host: &mut dyn LayoutHost, tick: AnimatorTick) {
        if let Some(bone) = self.bone.as_mut() {
            if tick.started {
                bone.prepare_content_fade(host);
            }
            bone.on_fade(tick.fraction);
            bone.fade_content(host, tick.fraction);
        }
        self.listeners.notify_update(tick.fraction);
        if tick.ended {
            self.fade = None;
            self.lifecycle.send(LoaderEvent::FadeComplete);
            self.release(host);
        }
    }

    fn release(&mut self, host: &mut dyn LayoutHost) {
        self.stop_shimmer();
        self.scheduler.clear();
        self.fade = None;
        if let Some(mut bone) = self.bone.take() {
            bone.dispose();
        }
        self.renderer.set_should_render(false);
        self.listeners.clear();
        if let Some(hook) = self.on_discard.take() {
            hook(host, &self.properties);
        }
        tracing::debug!("bone released");
    }
}

impl std::fmt::Debug for BoneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoneManager")
            .field("state", &self.state())
            .field("bone", &self.bone.as_ref().and_then(Bone::bounds))
            .field("animators", &self.scheduler.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bones_layout::{ElementKind, ElementTree, Visibility};
    use bones_paint::Bounds;

    fn owner() -> (ElementTree, ElementId) {
        let mut tree = ElementTree::new();
        let avatar = tree.insert_root(ElementKind::Image);
        tree.set_size(avatar, 32.0, 32.0);
        tree.layout_pass();
        (tree, avatar)
    }

    fn props() -> BoneProperties {
        let mut props = BoneProperties::new();
        props.match_owners_bounds = true;
        props
    }

    #[test]
    fn test_enable_computes_bone() {
        let (tree, avatar) = owner();
        let mut manager = BoneManager::new(props());
        manager.enable(&tree, avatar);
        assert_eq!(manager.state(), LoaderState::Enabled);
        assert_eq!(
            manager.bone().and_then(Bone::bounds),
            Some(Bounds::new(0.0, 0.0, 32.0, 32.0))
        );
        assert!(!manager.is_shimmering());
        let mut ctx = PaintContext::new();
        assert!(manager.render(&mut ctx));
    }

    #[test]
    fn test_own_shimmer_starts() {
        let (tree, avatar) = owner();
        let mut props = props();
        props.shimmer_ray_properties_mut().count = 1;
        let mut manager = BoneManager::new(props);
        manager.enable(&tree, avatar);
        assert!(manager.is_shimmering());
    }

    #[test]
    fn test_fade_then_release() {
        let (mut tree, avatar) = owner();
        let mut props = props();
        props.transition_duration_ms = 100;
        let mut manager = BoneManager::new(props);
        manager.enable(&tree, avatar);
        manager.disable(&mut tree);
        assert_eq!(manager.state(), LoaderState::Disabling);

        manager.tick(60.0, &mut tree);
        let opacity = manager.bone().map(|b| b.shape().opacity());
        assert!(matches!(opacity, Some(o) if (o - 0.4).abs() < 1e-4));

        manager.tick(60.0, &mut tree);
        assert_eq!(manager.state(), LoaderState::Disabled);
        assert!(manager.bone().is_none());
        let mut ctx = PaintContext::new();
        assert!(!manager.render(&mut ctx));
    }

    #[test]
    fn test_fade_brings_owner_content_in() {
        let (mut tree, avatar) = owner();
        tree.set_alpha(avatar, 0.0);
        tree.set_visibility(avatar, Visibility::Invisible);
        let mut props = props();
        props.transition_duration_ms = 100;
        let mut manager = BoneManager::new(props);
        manager.enable(&tree, avatar);
        manager.disable(&mut tree);

        manager.tick(25.0, &mut tree);
        assert_eq!(tree.visibility(avatar), Visibility::Visible);
        assert!((tree.alpha(avatar) - 0.25).abs() < 1e-4);

        manager.tick(50.0, &mut tree);
        assert!((tree.alpha(avatar) - 0.75).abs() < 1e-4);

        manager.tick(50.0, &mut tree);
        assert_eq!(manager.state(), LoaderState::Disabled);
        assert_eq!(tree.alpha(avatar), 1.0);
    }

    #[test]
    fn test_zero_duration_disables_immediately() {
        let (mut tree, avatar) = owner();
        let mut props = props();
        props.transition_duration_ms = 0;
        let mut manager = BoneManager::new(props);
        manager.add_update_listener(|_| {});
        manager.enable(&tree, avatar);
        manager.disable(&mut tree);
        assert_eq!(manager.state(), LoaderState::Disabled);
        assert_eq!(manager.listener_count(), 0);
    }

    #[test]
    fn test_layout_change_recomputes() {
        let (mut tree, avatar) = owner();
        let mut manager = BoneManager::new(props());
        manager.enable(&tree, avatar);
        tree.set_size(avatar, 48.0, 48.0);
        assert!(manager.on_layout_complete(&tree));
        assert_eq!(manager.bone().and_then(Bone::bounds).map(|b| b.width), Some(48.0));
    }
}
