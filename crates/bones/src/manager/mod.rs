//! Loader managers
//!
//! A manager owns the placeholder model, its renderer and the animators
//! that drive it, and moves through the [`LoaderLifecycle`] states:
//!
//! - **enable**: compute, start the infinite shimmer, hide content
//! - **disable**: cross-fade placeholder out and content in, or switch
//!   instantly when transitions are off
//! - **release**: stop animators, drop bones and listeners, hand the
//!   properties to the discard hook
//!
//! [`LoaderLifecycle`]: bones_core::LoaderLifecycle

mod bone;
mod skeleton;

pub use bone::BoneManager;
pub use skeleton::SkeletonManager;

/// Called with every animation fraction
pub type UpdateListener = Box<dyn FnMut(f32)>;
/// Called when an animation starts or ends
pub type AnimationListener = Box<dyn FnMut()>;

/// Listeners registered on a manager
///
/// Cleared whenever the manager releases its placeholder.
#[derive(Default)]
pub struct AnimationListeners {
    update: Vec<UpdateListener>,
    start: Vec<AnimationListener>,
    end: Vec<AnimationListener>,
}

impl AnimationListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_update(&mut self, listener: UpdateListener) {
        self.update.push(listener);
    }

    pub fn add(&mut self, on_start: Option<AnimationListener>, on_end: Option<AnimationListener>) {
        self.start.extend(on_start);
        self.end.extend(on_end);
    }

    pub fn notify_update(&mut self, fraction: f32) {
        for listener in self.update.iter_mut() {
            listener(fraction);
        }
    }

    pub fn notify_start(&mut self) {
        for listener in self.start.iter_mut() {
            listener();
        }
    }

    pub fn notify_end(&mut self) {
        for listener in self.end.iter_mut() {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.update.len() + self.start.len() + self.end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.update.clear();
        self.start.clear();
        self.end.clear();
    }
}

impl std::fmt::Debug for AnimationListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationListeners")
            .field("update", &self.update.len())
            .field("start", &self.start.len())
            .field("end", &self.end.len())
            .finish()
    }
}
