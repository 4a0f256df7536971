//! Rendering surface for chip widgets.
//!
//! The chips widget never touches a concrete toolkit. Everything it needs
//! from the outside world, element creation, attributes, text, tree edits,
//! geometry and click delivery, goes through the [`RenderSurface`] trait.
//!
//! [`ElementTree`] is the retained in-memory implementation. It lays out the
//! children of every container with a [`FlowLayout`](crate::widget::layout::FlowLayout)
//! so overflow can be measured without a real window.
//!
//! # Example
//!
//! ```
//! use horizon_chips::surface::{ElementKind, ElementTree, RenderSurface};
//!
//! let tree = ElementTree::new();
//! let host = tree.create_element(ElementKind::Container);
//! let chip = tree.create_element(ElementKind::Chip);
//! tree.append_child(host, chip).unwrap();
//! tree.add_class(chip, "chip").unwrap();
//! assert_eq!(tree.children(host), vec![chip]);
//! ```

mod debug;
mod tree;

pub use debug::ElementTreeDebug;
pub use tree::{ElementMetrics, ElementTree};

use horizon_chips_core::{Signal, Size};
use slotmap::new_key_type;

use crate::error::Result;

new_key_type! {
    /// Identifier of an element on a rendering surface.
    pub struct NodeId;
}

/// The structural role of an element.
///
/// Layout uses the kind to decide how an element is measured. [`Badge`]
/// elements are overlays and never take space in flow layout.
///
/// [`Badge`]: ElementKind::Badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A block that lays out its children in a wrapping flow.
    Container,
    /// A chip token.
    Chip,
    /// An image, sized by the surface metrics.
    Image,
    /// A run of literal text.
    Text,
    /// A glyph icon such as a close affordance.
    Icon,
    /// An overlay badge (e.g. an overflow counter).
    Badge,
}

impl ElementKind {
    /// Whether elements of this kind take part in flow layout.
    pub fn is_in_flow(self) -> bool {
        !matches!(self, ElementKind::Badge)
    }
}

/// A click delivered by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// The innermost element under the pointer.
    pub target: NodeId,
}

/// The operations a chips widget needs from its host toolkit.
///
/// All methods take `&self`; implementations use interior mutability so a
/// surface can be shared between the widget, its event router and the host.
/// Implementations must not hold internal locks while emitting
/// [`clicked`](Self::clicked), since slots call back into the surface.
pub trait RenderSurface: Send + Sync {
    /// Create a detached element.
    fn create_element(&self, kind: ElementKind) -> NodeId;

    /// Get the kind of an element, or `None` if it does not exist.
    fn kind(&self, node: NodeId) -> Option<ElementKind>;

    /// Add a style class.
    fn add_class(&self, node: NodeId, class: &str) -> Result<()>;

    /// Remove a style class. Removing an absent class is not an error.
    fn remove_class(&self, node: NodeId, class: &str) -> Result<()>;

    /// Check whether an element carries a class.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// All classes of an element, in insertion order.
    fn classes(&self, node: NodeId) -> Vec<String>;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()>;

    /// Read an attribute.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// All attributes of an element, sorted by name.
    fn attributes(&self, node: NodeId) -> Vec<(String, String)>;

    /// Set literal text content.
    fn set_text(&self, node: NodeId, text: &str) -> Result<()>;

    /// Read text content.
    fn text(&self, node: NodeId) -> Option<String>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Insert `child` as the first child of `parent`.
    fn prepend_child(&self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Insert `node` directly after `reference` under the same parent.
    fn insert_after(&self, reference: NodeId, node: NodeId) -> Result<()>;

    /// Detach an element from its parent and destroy it with its subtree.
    fn remove(&self, node: NodeId) -> Result<()>;

    /// Get the parent of an element.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Get the children of an element in order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Vertical offset of an element within its parent's content.
    fn offset_top(&self, node: NodeId) -> Option<f32>;

    /// Full size of an element's content, never smaller than its client size.
    fn scroll_size(&self, node: NodeId) -> Option<Size>;

    /// Visible size of an element.
    fn client_size(&self, node: NodeId) -> Option<Size>;

    /// Signal emitted for every click on the surface.
    fn clicked(&self) -> &Signal<ClickEvent>;

    /// Check whether an element still exists.
    fn is_alive(&self, node: NodeId) -> bool {
        self.kind(node).is_some()
    }

    /// Check whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Find the nearest element, starting at `node` itself, carrying `class`.
    fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.has_class(id, class) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }
}
