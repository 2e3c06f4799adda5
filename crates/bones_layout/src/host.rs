//! The host layout collaborator

use bones_core::ElementId;
use bones_paint::Point;

use crate::element::{Background, ElementKind, LayoutTransition, Padding, PaintLayer, Visibility};

/// Everything a loader reads from, and writes to, the host's element tree
///
/// Unknown ids must be tolerated: queries return neutral values (zero
/// sizes, no parent, no children) and writes are ignored.
pub trait LayoutHost {
    fn contains(&self, id: ElementId) -> bool;

    fn kind(&self, id: ElementId) -> ElementKind;

    /// Measured `(width, height)` from the last layout pass
    fn measured_size(&self, id: ElementId) -> (f32, f32);

    fn padding(&self, id: ElementId) -> Padding;

    /// Top-left corner relative to the parent
    fn position(&self, id: ElementId) -> Point;

    fn parent(&self, id: ElementId) -> Option<ElementId>;

    fn children(&self, id: ElementId) -> Vec<ElementId>;

    /// Whether the element has completed at least one layout pass
    fn is_laid_out(&self, id: ElementId) -> bool;

    fn minimum_size(&self, id: ElementId) -> (f32, f32);

    /// Side effect: takes effect on the next layout pass
    fn set_minimum_size(&mut self, id: ElementId, width: f32, height: f32);

    fn alpha(&self, id: ElementId) -> f32;

    fn set_alpha(&mut self, id: ElementId, alpha: f32);

    fn visibility(&self, id: ElementId) -> Visibility;

    fn set_visibility(&mut self, id: ElementId, visibility: Visibility);

    fn background(&self, id: ElementId) -> Option<Background>;

    fn elevation(&self, id: ElementId) -> f32;

    fn foreground(&self, id: ElementId) -> PaintLayer;

    /// Install a foreground layer, returning the previous occupant
    fn replace_foreground(&mut self, id: ElementId, layer: PaintLayer) -> PaintLayer;

    fn layout_transition(&self, id: ElementId) -> Option<LayoutTransition>;

    fn set_layout_transition(&mut self, id: ElementId, transition: Option<LayoutTransition>);

    /// Ask the host to repaint the element
    fn invalidate(&mut self, _id: ElementId) {}

    /// Nearest ancestor of `id` (excluding `id`) accepted by `predicate`
    fn find_ancestor(&self, id: ElementId, predicate: &dyn Fn(ElementId) -> bool) -> Option<ElementId> {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if predicate(ancestor) {
                return Some(ancestor);
            }
            current = self.parent(ancestor);
        }
        None
    }

    /// Leaf descendants of `root` in depth-first order
    ///
    /// Containers are walked through rather than returned. Elements that
    /// are `Gone` are skipped together with their subtree.
    fn descendant_leaves(&self, root: ElementId) -> Vec<ElementId> {
        let mut leaves = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            if self.visibility(id) == Visibility::Gone {
                continue;
            }
            let children = self.children(id);
            if children.is_empty() {
                leaves.push(id);
            } else {
                stack.extend(children.into_iter().rev());
            }
        }
        leaves
    }

    /// Position of `id` in the coordinate space of `ancestor`
    fn offset_within(&self, ancestor: ElementId, id: ElementId) -> Option<Point> {
        let mut offset = Point::ZERO;
        let mut current = id;
        while current != ancestor {
            let position = self.position(current);
            offset.x += position.x;
            offset.y += position.y;
            current = self.parent(current)?;
        }
        Some(offset)
    }
}
