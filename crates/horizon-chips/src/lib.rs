//! Horizon Chips - chip tokens mirroring a multi-value selection.
//!
//! This is the main crate. It re-exports the core systems and provides:
//!
//! - [`select`]: The selection source contract and an in-memory multi-select
//! - [`surface`]: The rendering surface contract and a retained element tree
//! - [`widget`]: The chips widget, chip tokens and the overflow counter
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_chips::select::MultiSelect;
//! use horizon_chips::surface::{ElementKind, ElementTree, RenderSurface};
//! use horizon_chips::widget::{CLOSE_CLASS, WithChips, WithChipsConfig};
//!
//! let tree = Arc::new(ElementTree::new());
//! let host = tree.create_element(ElementKind::Container);
//! let select = Arc::new(MultiSelect::new([("a", "Apple"), ("b", "Banana")]));
//! let chips = WithChips::new(select.clone(), tree.clone(), host, WithChipsConfig::new());
//!
//! select.set_selected_values(["a", "b"]);
//! assert_eq!(chips.get_data(), vec!["a", "b"]);
//!
//! // Clicking a close icon deselects the option
//! let apple = chips.chip_node("a").unwrap();
//! let close = tree
//!     .children(apple)
//!     .into_iter()
//!     .find(|&n| tree.has_class(n, CLOSE_CLASS))
//!     .unwrap();
//! tree.click(close);
//! assert_eq!(chips.get_data(), vec!["b"]);
//! assert_eq!(chips.chips(), vec!["b"]);
//! ```

pub use horizon_chips_core::*;

pub mod error;
pub mod select;
pub mod surface;
pub mod widget;

pub use error::{Result, SurfaceError};
pub use select::{MultiSelect, SelectOption, SelectionSource};
pub use surface::{ElementKind, ElementTree, NodeId, RenderSurface};
pub use widget::{Chip, DeleteOutcome, OverflowState, WithChips, WithChipsConfig};
