//! Chip tokens.
//!
//! A chip is the rendered projection of one selected value. [`Chip`] is the
//! record; [`Chip::render`] turns it into surface elements:
//!
//! ```text
//! Chip.chip.dynamic data-value="<value>"
//! ├── Image src="<image>"          (only when an image is set)
//! ├── Text "<tag>"
//! └── Icon.material-icons.close "close"
//! ```

use horizon_chips_core::logging::targets;

use crate::error::Result;
use crate::surface::{ElementKind, NodeId, RenderSurface};

/// Class carried by every chip element.
pub const CHIP_CLASS: &str = "chip";
/// Class marking chips created by the widget.
pub const DYNAMIC_CLASS: &str = "dynamic";
/// Class of the close affordance inside a chip.
pub const CLOSE_CLASS: &str = "close";
/// Attribute holding a chip's value.
pub const VALUE_ATTRIBUTE: &str = "data-value";

/// Data for one chip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chip {
    /// The value the chip stands for. Chips without a value are never added.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<String>,
    /// Display text. Chips with an empty tag are never rendered.
    pub tag: String,
    /// Optional avatar image source.
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: Option<String>,
}

impl Chip {
    /// Create a chip for a value.
    pub fn new(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            tag: tag.into(),
            image: None,
        }
    }

    /// Create a chip with a tag only.
    pub fn tag_only(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set the avatar image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The value, if present and non-empty.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    /// Render the chip into detached surface elements.
    ///
    /// Returns `None` without touching the surface when the tag is empty, or
    /// after cleaning up when the surface rejects an operation. The returned
    /// element is not inserted anywhere.
    pub fn render(&self, surface: &dyn RenderSurface) -> Option<NodeId> {
        if self.tag.is_empty() {
            tracing::trace!(target: targets::RECONCILE, value = ?self.value, "chip without tag not rendered");
            return None;
        }

        let node = surface.create_element(ElementKind::Chip);
        match self.build(surface, node) {
            Ok(()) => Some(node),
            Err(err) => {
                tracing::debug!(target: targets::RECONCILE, %err, "chip rendering failed");
                let _ = surface.remove(node);
                None
            }
        }
    }

    fn build(&self, surface: &dyn RenderSurface, node: NodeId) -> Result<()> {
        surface.add_class(node, CHIP_CLASS)?;
        surface.add_class(node, DYNAMIC_CLASS)?;
        surface.set_attribute(node, VALUE_ATTRIBUTE, self.value.as_deref().unwrap_or_default())?;

        if let Some(image) = self.image.as_deref().filter(|i| !i.is_empty()) {
            let img = surface.create_element(ElementKind::Image);
            surface.append_child(node, img)?;
            surface.set_attribute(img, "src", image)?;
        }

        let text = surface.create_element(ElementKind::Text);
        surface.append_child(node, text)?;
        surface.set_text(text, &self.tag)?;

        let close = surface.create_element(ElementKind::Icon);
        surface.append_child(node, close)?;
        surface.add_class(close, "material-icons")?;
        surface.add_class(close, CLOSE_CLASS)?;
        surface.set_text(close, "close")?;
        Ok(())
    }
}

/// A snapshot of a rendered chip handed to callbacks.
///
/// The snapshot stays meaningful after the chip element is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipElement {
    /// The chip's root element.
    pub node: NodeId,
    /// The chip's value.
    pub value: String,
    /// The chip's display text.
    pub tag: String,
    /// The avatar image source, if any.
    pub image: Option<String>,
}

impl ChipElement {
    /// Capture a chip element from the surface.
    pub fn capture(surface: &dyn RenderSurface, node: NodeId) -> Option<Self> {
        if !surface.has_class(node, CHIP_CLASS) {
            return None;
        }
        let mut tag = String::new();
        let mut image = None;
        for child in surface.children(node) {
            match surface.kind(child) {
                Some(ElementKind::Text) => tag = surface.text(child).unwrap_or_default(),
                Some(ElementKind::Image) => image = surface.attribute(child, "src"),
                _ => {}
            }
        }
        Some(Self {
            node,
            value: surface.attribute(node, VALUE_ATTRIBUTE).unwrap_or_default(),
            tag,
            image,
        })
    }
}
