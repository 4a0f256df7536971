//! Chips widget for Horizon Chips.
//!
//! This module provides the widget that keeps a multi-value selection and a
//! row of removable chip tokens in sync:
//!
//! - [`WithChips`]: The widget and its reconciliation engine
//! - [`Chip`]: Chip records and their rendered structure
//! - [`OverflowCounter`]: Counts chips beyond the first visible row
//! - [`LayoutWatcher`]: Optional container size observation
//! - [`layout`]: Flow layout used to place chips
//!
//! # Overview
//!
//! The selection source owns the selection. The widget reads it on every
//! change notification and adds or removes chips until the rendered values
//! match. Closing a chip that stands for a selected option does not remove
//! the chip; it deselects the option, and the resulting change removes it.
//!
//! ```text
//! source.changed ──► render_all ──► add_chip / remove ──► overflow
//!        ▲
//!        └── deselect + notify ◄── delete_chip ◄── close click
//! ```

mod chip;
mod config;
pub mod layout;
mod overflow;
mod router;
mod watcher;
mod with_chips;

pub use chip::{CHIP_CLASS, CLOSE_CLASS, Chip, ChipElement, DYNAMIC_CLASS, VALUE_ATTRIBUTE};
pub use config::{ChipCallback, WithChipsConfig};
pub use overflow::{COUNTER_CLASS, OVERFLOWN_CLASS, OverflowCounter, OverflowState};
pub use watcher::{LayoutCallback, LayoutWatcher, NoLayoutWatcher, SurfaceResizeWatcher, WatchId};
pub use with_chips::{CONTAINER_CLASS, DeleteOutcome, WithChips};
