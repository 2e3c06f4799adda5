//! In-memory element tree
//!
//! Holds layout results the embedder computed elsewhere. A layout pass only
//! folds minimum-size overrides into the measured sizes and flags every
//! element as laid out.

use bones_core::{ElementId, ElementIdGenerator, LoaderError, Result};
use bones_paint::Point;
use rustc_hash::FxHashMap;

use crate::element::{Background, ElementKind, LayoutTransition, Padding, PaintLayer, Visibility};
use crate::host::LayoutHost;

/// One element and its layout state
#[derive(Clone, Debug)]
pub struct ElementNode {
    pub kind: ElementKind,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub position: Point,
    /// Size the element would measure at without minimum overrides
    pub intrinsic_size: (f32, f32),
    pub measured_size: (f32, f32),
    pub minimum_size: (f32, f32),
    pub padding: Padding,
    pub alpha: f32,
    pub visibility: Visibility,
    pub background: Option<Background>,
    pub elevation: f32,
    pub foreground: PaintLayer,
    pub layout_transition: Option<LayoutTransition>,
    pub laid_out: bool,
}

impl ElementNode {
    fn new(kind: ElementKind, parent: Option<ElementId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            position: Point::ZERO,
            intrinsic_size: (0.0, 0.0),
            measured_size: (0.0, 0.0),
            minimum_size: (0.0, 0.0),
            padding: Padding::ZERO,
            alpha: 1.0,
            visibility: Visibility::Visible,
            background: None,
            elevation: 0.0,
            foreground: PaintLayer::Empty,
            layout_transition: None,
            laid_out: false,
        }
    }
}

/// Element tree keyed by [`ElementId`]
#[derive(Clone, Debug, Default)]
pub struct ElementTree {
    nodes: FxHashMap<ElementId, ElementNode>,
    ids: ElementIdGenerator,
    layout_passes: u32,
    invalidations: u32,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parentless element
    pub fn insert_root(&mut self, kind: ElementKind) -> ElementId {
        let id = self.ids.next_id();
        self.nodes.insert(id, ElementNode::new(kind, None));
        id
    }

    /// Create an element as the last child of `parent`
    pub fn insert(&mut self, parent: ElementId, kind: ElementKind) -> Result<ElementId> {
        if !self.nodes.contains_key(&parent) {
            return Err(LoaderError::UnknownElement(parent));
        }
        let id = self.ids.next_id();
        self.nodes.insert(id, ElementNode::new(kind, Some(parent)));
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        Ok(id)
    }

    /// Remove an element and its subtree
    pub fn remove(&mut self, id: ElementId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }
        for child in node.children {
            self.remove(child);
        }
    }

    pub fn node(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Record a measurement; applies immediately and on every later pass
    pub fn set_size(&mut self, id: ElementId, width: f32, height: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.intrinsic_size = (width, height);
            node.measured_size = (width.max(node.minimum_size.0), height.max(node.minimum_size.1));
        }
    }

    pub fn set_position(&mut self, id: ElementId, x: f32, y: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = Point::new(x, y);
        }
    }

    pub fn set_padding(&mut self, id: ElementId, padding: Padding) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.padding = padding;
        }
    }

    pub fn set_background(&mut self, id: ElementId, background: Option<Background>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.background = background;
        }
    }

    pub fn set_elevation(&mut self, id: ElementId, elevation: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.elevation = elevation;
        }
    }

    /// Fold minimum sizes into measurements and mark everything laid out
    pub fn layout_pass(&mut self) {
        for node in self.nodes.values_mut() {
            let (width, height) = node.intrinsic_size;
            node.measured_size = (width.max(node.minimum_size.0), height.max(node.minimum_size.1));
            node.laid_out = true;
        }
        self.layout_passes += 1;
        tracing::trace!(pass = self.layout_passes, nodes = self.nodes.len(), "layout pass");
    }

    pub fn layout_passes(&self) -> u32 {
        self.layout_passes
    }

    /// Number of repaint requests received
    pub fn invalidations(&self) -> u32 {
        self.invalidations
    }
}

impl LayoutHost for ElementTree {
    fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn kind(&self, id: ElementId) -> ElementKind {
        self.nodes.get(&id).map(|n| n.kind).unwrap_or_default()
    }

    fn measured_size(&self, id: ElementId) -> (f32, f32) {
        self.nodes.get(&id).map(|n| n.measured_size).unwrap_or((0.0, 0.0))
    }

    fn padding(&self, id: ElementId) -> Padding {
        self.nodes.get(&id).map(|n| n.padding).unwrap_or_default()
    }

    fn position(&self, id: ElementId) -> Point {
        self.nodes.get(&id).map(|n| n.position).unwrap_or_default()
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes.get(&id).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn is_laid_out(&self, id: ElementId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.laid_out)
    }

    fn minimum_size(&self, id: ElementId) -> (f32, f32) {
        self.nodes.get(&id).map(|n| n.minimum_size).unwrap_or((0.0, 0.0))
    }

    fn set_minimum_size(&mut self, id: ElementId, width: f32, height: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.minimum_size = (width.max(0.0), height.max(0.0));
        }
    }

    fn alpha(&self, id: ElementId) -> f32 {
        self.nodes.get(&id).map(|n| n.alpha).unwrap_or(1.0)
    }

    fn set_alpha(&mut self, id: ElementId, alpha: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn visibility(&self, id: ElementId) -> Visibility {
        self.nodes.get(&id).map(|n| n.visibility).unwrap_or_default()
    }

    fn set_visibility(&mut self, id: ElementId, visibility: Visibility) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visibility = visibility;
        }
    }

    fn background(&self, id: ElementId) -> Option<Background> {
        self.nodes.get(&id).and_then(|n| n.background.clone())
    }

    fn elevation(&self, id: ElementId) -> f32 {
        self.nodes.get(&id).map(|n| n.elevation).unwrap_or(0.0)
    }

    fn foreground(&self, id: ElementId) -> PaintLayer {
        self.nodes.get(&id).map(|n| n.foreground).unwrap_or_default()
    }

    fn replace_foreground(&mut self, id: ElementId, layer: PaintLayer) -> PaintLayer {
        match self.nodes.get_mut(&id) {
            Some(node) => std::mem::replace(&mut node.foreground, layer),
            None => PaintLayer::Empty,
        }
    }

    fn layout_transition(&self, id: ElementId) -> Option<LayoutTransition> {
        self.nodes.get(&id).and_then(|n| n.layout_transition)
    }

    fn set_layout_transition(&mut self, id: ElementId, transition: Option<LayoutTransition>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.layout_transition = transition;
        }
    }

    fn invalidate(&mut self, _id: ElementId) {
        self.invalidations += 1;
    }
}
