//! Retained in-memory element tree.

use std::collections::BTreeMap;

use horizon_chips_core::logging::{span_names, targets};
use horizon_chips_core::{PerfSpan, Rect, Signal, Size};
use parking_lot::Mutex;
use slotmap::SlotMap;

use super::{ClickEvent, ElementKind, NodeId, RenderSurface};
use crate::error::{Result, SurfaceError};
use crate::widget::layout::FlowLayout;

/// Measurements used to size elements that have no explicit preferred size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMetrics {
    /// Advance width of one character of text.
    pub char_width: f32,
    /// Height of a line of text.
    pub line_height: f32,
    /// Height of a chip.
    pub chip_height: f32,
    /// Horizontal padding inside a chip, per side.
    pub chip_padding: f32,
    /// Gap between the parts of a chip.
    pub content_gap: f32,
    /// Edge length of an icon.
    pub icon_size: f32,
    /// Edge length of an image.
    pub image_size: f32,
}

impl Default for ElementMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            chip_height: 32.0,
            chip_padding: 12.0,
            content_gap: 4.0,
            icon_size: 16.0,
            image_size: 24.0,
        }
    }
}

#[derive(Debug)]
struct Element {
    kind: ElementKind,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    preferred_size: Option<Size>,
    client_size: Option<Size>,
    geometry: Rect,
    content_size: Size,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            preferred_size: None,
            client_size: None,
            geometry: Rect::ZERO,
            content_size: Size::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct TreeState {
    elements: SlotMap<NodeId, Element>,
    layout_dirty: bool,
}

impl TreeState {
    fn get(&self, id: NodeId) -> Result<&Element> {
        self.elements.get(id).ok_or(SurfaceError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        self.elements.get_mut(id).ok_or(SurfaceError::NodeNotFound(id))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(id).and_then(|e| e.parent);
        }
        false
    }

    /// Validate that `child` may be placed under `parent`.
    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        self.get(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(SurfaceError::invalid_hierarchy(
                parent,
                child,
                "element cannot contain itself",
            ));
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.elements.get_mut(node).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(parent) {
            parent.children.retain(|&c| c != node);
        }
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        self.check_insert(parent, child)?;
        self.detach(child);
        let siblings = &mut self.get_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        self.layout_dirty = true;
        Ok(())
    }

    fn destroy_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.elements.remove(id) {
                stack.extend(element.children);
            }
        }
    }
}

/// A retained element tree implementing [`RenderSurface`].
///
/// Geometry is computed lazily: mutations mark the tree dirty and the next
/// geometry query runs a layout pass. Children of every
/// [`Container`](ElementKind::Container) flow left-to-right and wrap at the
/// container's client width when one has been set with
/// [`set_client_size`](Self::set_client_size).
///
/// # Example
///
/// ```
/// use horizon_chips::surface::{ElementKind, ElementTree, RenderSurface};
/// use horizon_chips_core::Size;
///
/// let tree = ElementTree::new();
/// let row = tree.create_element(ElementKind::Container);
/// tree.set_client_size(row, Size::new(100.0, 32.0)).unwrap();
/// for _ in 0..2 {
///     let chip = tree.create_element(ElementKind::Chip);
///     tree.set_preferred_size(chip, Size::new(80.0, 32.0)).unwrap();
///     tree.append_child(row, chip).unwrap();
/// }
/// let second = tree.children(row)[1];
/// assert_eq!(tree.offset_top(second), Some(36.0));
/// ```
pub struct ElementTree {
    state: Mutex<TreeState>,
    metrics: ElementMetrics,
    layout: FlowLayout,
    clicked: Signal<ClickEvent>,
    resized: Signal<NodeId>,
}

impl ElementTree {
    /// Create an empty tree with default metrics and flow layout.
    pub fn new() -> Self {
        Self::with_metrics(ElementMetrics::default())
    }

    /// Create an empty tree with custom metrics.
    pub fn with_metrics(metrics: ElementMetrics) -> Self {
        Self {
            state: Mutex::new(TreeState::default()),
            metrics,
            layout: FlowLayout::new(),
            clicked: Signal::new(),
            resized: Signal::new(),
        }
    }

    /// Replace the flow layout used for containers.
    pub fn with_layout(mut self, layout: FlowLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Get the metrics in use.
    pub fn metrics(&self) -> &ElementMetrics {
        &self.metrics
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.state.lock().elements.len()
    }

    /// Check whether the tree has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Override the measured size of an element.
    pub fn set_preferred_size(&self, node: NodeId, size: Size) -> Result<()> {
        let mut state = self.state.lock();
        state.get_mut(node)?.preferred_size = Some(size);
        state.layout_dirty = true;
        Ok(())
    }

    /// Constrain the visible size of an element.
    ///
    /// Emits [`resized`](Self::resized) when the constraint changes.
    pub fn set_client_size(&self, node: NodeId, size: Size) -> Result<()> {
        self.update_client_size(node, Some(size))
    }

    /// Remove the size constraint; the element grows to fit its content.
    pub fn clear_client_size(&self, node: NodeId) -> Result<()> {
        self.update_client_size(node, None)
    }

    fn update_client_size(&self, node: NodeId, size: Option<Size>) -> Result<()> {
        let changed = {
            let mut state = self.state.lock();
            let element = state.get_mut(node)?;
            let changed = element.client_size != size;
            element.client_size = size;
            if changed {
                state.layout_dirty = true;
            }
            changed
        };
        if changed {
            tracing::trace!(target: targets::SURFACE, ?node, ?size, "client size changed");
            self.resized.emit(node);
        }
        Ok(())
    }

    /// Geometry of an element relative to its parent.
    pub fn geometry(&self, node: NodeId) -> Option<Rect> {
        let mut state = self.state.lock();
        self.ensure_layout(&mut state);
        state.elements.get(node).map(|e| e.geometry)
    }

    /// Deliver a click to an element.
    ///
    /// Returns `false` without emitting if the element does not exist.
    pub fn click(&self, node: NodeId) -> bool {
        if !self.is_alive(node) {
            return false;
        }
        self.clicked.emit(ClickEvent { target: node });
        true
    }

    /// Signal emitted with the element whose client size changed.
    pub fn resized(&self) -> &Signal<NodeId> {
        &self.resized
    }

    /// Elements without a parent, in creation order.
    pub fn roots(&self) -> Vec<NodeId> {
        let state = self.state.lock();
        state
            .elements
            .iter()
            .filter(|(_, e)| e.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    fn ensure_layout(&self, state: &mut TreeState) {
        if !state.layout_dirty {
            return;
        }
        let _span = PerfSpan::new(span_names::LAYOUT);
        let containers: Vec<NodeId> = state
            .elements
            .iter()
            .filter(|(_, e)| matches!(e.kind, ElementKind::Container | ElementKind::Chip))
            .map(|(id, _)| id)
            .collect();
        for id in containers {
            self.layout_children(state, id);
        }
        state.layout_dirty = false;
    }

    fn layout_children(&self, state: &mut TreeState, id: NodeId) {
        let Some(element) = state.elements.get(id) else {
            return;
        };
        let kind = element.kind;
        let width = element.client_size.map(|s| s.width);
        let children = element.children.clone();

        let mut flow_children = Vec::with_capacity(children.len());
        let mut sizes = Vec::with_capacity(children.len());
        for &child in &children {
            let Some(child_element) = state.elements.get(child) else {
                continue;
            };
            if child_element.kind.is_in_flow() {
                flow_children.push(child);
                sizes.push(self.measure(state, child));
            } else if let Some(e) = state.elements.get_mut(child) {
                e.geometry = Rect::ZERO;
            }
        }

        let (rects, content_size) = if kind == ElementKind::Chip {
            self.arrange_chip_parts(&sizes)
        } else {
            let arranged = self.layout.arrange(width, &sizes);
            (arranged.rects, arranged.content_size)
        };

        for (child, rect) in flow_children.into_iter().zip(rects) {
            if let Some(e) = state.elements.get_mut(child) {
                e.geometry = rect;
            }
        }
        if let Some(e) = state.elements.get_mut(id) {
            e.content_size = content_size;
        }
    }

    /// Place the parts of a chip side by side, vertically centered.
    fn arrange_chip_parts(&self, sizes: &[Size]) -> (Vec<Rect>, Size) {
        let m = &self.metrics;
        let mut x = m.chip_padding;
        let mut rects = Vec::with_capacity(sizes.len());
        for (i, size) in sizes.iter().enumerate() {
            if i > 0 {
                x += m.content_gap;
            }
            rects.push(Rect::new(
                x,
                ((m.chip_height - size.height) / 2.0).max(0.0),
                size.width,
                size.height,
            ));
            x += size.width;
        }
        (rects, Size::new(x + m.chip_padding, m.chip_height))
    }

    fn measure(&self, state: &TreeState, id: NodeId) -> Size {
        let Some(element) = state.elements.get(id) else {
            return Size::ZERO;
        };
        if let Some(size) = element.preferred_size {
            return size;
        }
        let m = &self.metrics;
        match element.kind {
            ElementKind::Text => {
                let chars = element.text.as_deref().map_or(0, |t| t.chars().count());
                Size::new(chars as f32 * m.char_width, m.line_height)
            }
            ElementKind::Image => Size::new(m.image_size, m.image_size),
            ElementKind::Icon => Size::new(m.icon_size, m.icon_size),
            ElementKind::Badge => Size::ZERO,
            ElementKind::Chip => {
                let parts: Vec<Size> = element
                    .children
                    .iter()
                    .filter(|&&c| state.elements.get(c).is_some_and(|e| e.kind.is_in_flow()))
                    .map(|&c| self.measure(state, c))
                    .collect();
                let (_, size) = self.arrange_chip_parts(&parts);
                let tallest = parts.iter().fold(0.0_f32, |h, s| h.max(s.height));
                Size::new(size.width, size.height.max(tallest))
            }
            ElementKind::Container => match element.client_size {
                Some(size) => size,
                None => {
                    let sizes: Vec<Size> = element
                        .children
                        .iter()
                        .filter(|&&c| {
                            state.elements.get(c).is_some_and(|e| e.kind.is_in_flow())
                        })
                        .map(|&c| self.measure(state, c))
                        .collect();
                    self.layout.arrange(None, &sizes).content_size
                }
            },
        }
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementTree")
            .field("elements", &self.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl RenderSurface for ElementTree {
    fn create_element(&self, kind: ElementKind) -> NodeId {
        let id = self.state.lock().elements.insert(Element::new(kind));
        tracing::trace!(target: targets::SURFACE, ?id, ?kind, "element created");
        id
    }

    fn kind(&self, node: NodeId) -> Option<ElementKind> {
        self.state.lock().elements.get(node).map(|e| e.kind)
    }

    fn add_class(&self, node: NodeId, class: &str) -> Result<()> {
        let mut state = self.state.lock();
        let element = state.get_mut(node)?;
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_owned());
        }
        Ok(())
    }

    fn remove_class(&self, node: NodeId, class: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.get_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.state
            .lock()
            .elements
            .get(node)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.state
            .lock()
            .elements
            .get(node)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock();
        state
            .get_mut(node)?
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.state
            .lock()
            .elements
            .get(node)
            .and_then(|e| e.attributes.get(name).cloned())
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.state
            .lock()
            .elements
            .get(node)
            .map(|e| {
                e.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_text(&self, node: NodeId, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.get_mut(node)?.text = Some(text.to_owned());
        state.layout_dirty = true;
        Ok(())
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.state
            .lock()
            .elements
            .get(node)
            .and_then(|e| e.text.clone())
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.state.lock().insert_child(parent, usize::MAX, child)
    }

    fn prepend_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.state.lock().insert_child(parent, 0, child)
    }

    fn insert_after(&self, reference: NodeId, node: NodeId) -> Result<()> {
        let mut state = self.state.lock();
        let parent = state.get(reference)?.parent.ok_or(SurfaceError::Detached(reference))?;
        if node == reference {
            return Ok(());
        }
        state.check_insert(parent, node)?;
        // Detach first so the reference index accounts for a same-parent move
        state.detach(node);
        let index = state
            .get(parent)?
            .children
            .iter()
            .position(|&c| c == reference)
            .ok_or(SurfaceError::Detached(reference))?;
        state.insert_child(parent, index + 1, node)
    }

    fn remove(&self, node: NodeId) -> Result<()> {
        let mut state = self.state.lock();
        state.get(node)?;
        state.detach(node);
        state.destroy_subtree(node);
        state.layout_dirty = true;
        tracing::trace!(target: targets::SURFACE, ?node, "element removed");
        Ok(())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.lock().elements.get(node).and_then(|e| e.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state
            .lock()
            .elements
            .get(node)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    fn offset_top(&self, node: NodeId) -> Option<f32> {
        let mut state = self.state.lock();
        self.ensure_layout(&mut state);
        state.elements.get(node).map(|e| e.geometry.top())
    }

    fn scroll_size(&self, node: NodeId) -> Option<Size> {
        let mut state = self.state.lock();
        self.ensure_layout(&mut state);
        let element = state.elements.get(node)?;
        Some(match element.kind {
            ElementKind::Container => match element.client_size {
                Some(client) => element.content_size.max(client),
                None => element.content_size,
            },
            _ => self.measure(&state, node),
        })
    }

    fn client_size(&self, node: NodeId) -> Option<Size> {
        let mut state = self.state.lock();
        self.ensure_layout(&mut state);
        let element = state.elements.get(node)?;
        Some(match element.kind {
            ElementKind::Container => element.client_size.unwrap_or(element.content_size),
            _ => self.measure(&state, node),
        })
    }

    fn clicked(&self) -> &Signal<ClickEvent> {
        &self.clicked
    }
}

static_assertions::assert_impl_all!(ElementTree: Send, Sync);
