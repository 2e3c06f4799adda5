//! Per-frame drawing
//!
//! Renderers own the "should render" switch and the canvas bookkeeping;
//! what gets painted is left to the [`Bone`] or [`Skeleton`].

use bones_paint::PaintContext;

use crate::bone::Bone;
use crate::skeleton::Skeleton;

#[derive(Clone, Debug, Default)]
pub struct SkeletonRenderer {
    should_render: bool,
}

impl SkeletonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_render(&self) -> bool {
        self.should_render
    }

    pub fn set_should_render(&mut self, should_render: bool) {
        self.should_render = should_render;
    }

    /// Draw clipped to the container outline; returns false if nothing was drawn
    pub fn render(&self, skeleton: &Skeleton, allow_bone_generation: bool, ctx: &mut PaintContext) -> bool {
        if !self.should_render {
            return false;
        }
        let clip = skeleton.shape_path();
        if clip.is_empty() {
            return false;
        }
        ctx.save();
        ctx.clip_path(&clip);
        skeleton.on_render(ctx, allow_bone_generation);
        ctx.restore();
        true
    }
}

#[derive(Clone, Debug, Default)]
pub struct BoneRenderer {
    should_render: bool,
}

impl BoneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_render(&self) -> bool {
        self.should_render
    }

    pub fn set_should_render(&mut self, should_render: bool) {
        self.should_render = should_render;
    }

    /// Draw clipped to the bone outline; returns false if nothing was drawn
    pub fn render(&self, bone: &Bone, ctx: &mut PaintContext) -> bool {
        if !self.should_render {
            return false;
        }
        let clip = bone.shape().path();
        if clip.is_empty() {
            return false;
        }
        ctx.save();
        ctx.clip_path(&clip);
        bone.render(ctx);
        ctx.restore();
        true
    }
}
