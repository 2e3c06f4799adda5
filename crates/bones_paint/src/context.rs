//! Paint context - the recording canvas placeholders draw into

use bytemuck::{Pod, Zeroable};

use crate::color::Color;
use crate::gradient::LinearGradient;
use crate::path::{Path, Point};
use crate::primitives::Shadow;

/// Fill style for paths
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    Color(Color),
    /// Gradient whose geometry is mapped through `transform` before use
    Gradient {
        gradient: LinearGradient,
        transform: Transform2D,
    },
}

impl From<Color> for FillStyle {
    fn from(color: Color) -> Self {
        FillStyle::Color(color)
    }
}

impl From<LinearGradient> for FillStyle {
    fn from(gradient: LinearGradient) -> Self {
        FillStyle::Gradient {
            gradient,
            transform: Transform2D::identity(),
        }
    }
}

/// A paint command for the host canvas
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    Save,
    Restore,
    ClipPath { path: Path },
    FillPath { path: Path, style: FillStyle },
    DrawShadow { path: Path, shadow: Shadow },
}

/// 2D affine transform
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::identity()
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Shear `x` by `kx·y` and `y` by `ky·x`
    pub fn skew(kx: f32, ky: f32) -> Self {
        Self {
            b: ky,
            c: kx,
            ..Self::identity()
        }
    }

    /// Skew around a pivot point instead of the origin
    pub fn skew_about(kx: f32, ky: f32, pivot: Point) -> Self {
        Self::translate(-pivot.x, -pivot.y)
            .then(&Self::skew(kx, ky))
            .then(&Self::translate(pivot.x, pivot.y))
    }

    /// Apply `self`, then `next`
    pub fn then(&self, next: &Transform2D) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }
}

/// Records paint commands for later replay
pub struct PaintContext {
    commands: Vec<PaintCommand>,
    save_depth: usize,
}

impl PaintContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            save_depth: 0,
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of unmatched `save` calls
    pub fn save_count(&self) -> usize {
        self.save_depth
    }

    // === State ===

    pub fn save(&mut self) {
        self.save_depth += 1;
        self.commands.push(PaintCommand::Save);
    }

    pub fn restore(&mut self) {
        if self.save_depth == 0 {
            tracing::warn!("restore without matching save");
            return;
        }
        self.save_depth -= 1;
        self.commands.push(PaintCommand::Restore);
    }

    // === Clipping ===

    pub fn clip_path(&mut self, path: &Path) {
        self.commands.push(PaintCommand::ClipPath { path: path.clone() });
    }

    // === Drawing ===

    pub fn fill_path(&mut self, path: &Path, style: impl Into<FillStyle>) {
        self.commands.push(PaintCommand::FillPath {
            path: path.clone(),
            style: style.into(),
        });
    }

    pub fn draw_shadow(&mut self, path: &Path, shadow: Shadow) {
        self.commands.push(PaintCommand::DrawShadow {
            path: path.clone(),
            shadow,
        });
    }
}

impl Default for PaintContext {
    fn default() -> Self {
        Self::new()
    }
}
