//! Overflow counter.
//!
//! When chips no longer fit in their container, the container is marked
//! overflowing and a badge reports how many chips sit beyond the first
//! visible row.

use horizon_chips_core::logging::{span_names, targets};
use horizon_chips_core::PerfSpan;

use super::chip::CHIP_CLASS;
use crate::surface::{NodeId, RenderSurface};

/// Class set on the container while its chips overflow.
pub const OVERFLOWN_CLASS: &str = "overflown";
/// Class of the counter badge.
pub const COUNTER_CLASS: &str = "counter";

/// Result of an overflow measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverflowState {
    /// Whether the content exceeds the container in either axis.
    pub overflowing: bool,
    /// Chips not on the first row. Always 0 when not overflowing.
    pub hidden: usize,
}

impl OverflowState {
    /// Badge text for this state.
    pub fn badge_text(&self) -> String {
        if self.overflowing {
            self.hidden.to_string()
        } else {
            String::new()
        }
    }
}

/// Measures a chip container and updates its counter badge.
#[derive(Debug, Clone, Copy)]
pub struct OverflowCounter {
    container: NodeId,
    badge: NodeId,
}

impl OverflowCounter {
    /// Create a counter for a container and its badge element.
    pub fn new(container: NodeId, badge: NodeId) -> Self {
        Self { container, badge }
    }

    /// The measured container.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The badge element.
    pub fn badge(&self) -> NodeId {
        self.badge
    }

    /// Check whether the container's content exceeds its visible bounds.
    pub fn is_overflowing(&self, surface: &dyn RenderSurface) -> bool {
        match (
            surface.scroll_size(self.container),
            surface.client_size(self.container),
        ) {
            (Some(scroll), Some(client)) => {
                scroll.height > client.height || scroll.width > client.width
            }
            _ => false,
        }
    }

    /// Count the chips on the first row.
    ///
    /// The first row ends at the first chip whose vertical offset differs
    /// from the first chip's; if none differs, every chip is on it.
    pub fn first_row_len(&self, surface: &dyn RenderSurface) -> (usize, usize) {
        let chips: Vec<NodeId> = surface
            .children(self.container)
            .into_iter()
            .filter(|&c| surface.has_class(c, CHIP_CLASS))
            .collect();

        let mut first_top = None;
        for (index, &chip) in chips.iter().enumerate() {
            let top = surface.offset_top(chip);
            match first_top {
                None => first_top = Some(top),
                Some(first) if first != top => return (index, chips.len()),
                Some(_) => {}
            }
        }
        (chips.len(), chips.len())
    }

    /// Re-measure and update the container class and badge text.
    ///
    /// Idempotent: with no mutation in between, repeated calls produce the
    /// same state and the same badge.
    pub fn recompute(&self, surface: &dyn RenderSurface) -> OverflowState {
        let _span = PerfSpan::new(span_names::OVERFLOW);

        if let Err(err) = surface.remove_class(self.container, OVERFLOWN_CLASS) {
            tracing::debug!(target: targets::OVERFLOW, %err, "overflow container missing");
            return OverflowState::default();
        }

        let state = if self.is_overflowing(surface) {
            let _ = surface.add_class(self.container, OVERFLOWN_CLASS);
            let (first_row, total) = self.first_row_len(surface);
            OverflowState {
                overflowing: true,
                hidden: total - first_row,
            }
        } else {
            OverflowState::default()
        };

        if let Err(err) = surface.set_text(self.badge, &state.badge_text()) {
            tracing::debug!(target: targets::OVERFLOW, %err, "counter badge missing");
        }
        tracing::trace!(
            target: targets::OVERFLOW,
            overflowing = state.overflowing,
            hidden = state.hidden,
            "overflow recomputed"
        );
        state
    }
}
