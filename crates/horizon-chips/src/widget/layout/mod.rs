//! Layout support for chip collections.
//!
//! This module provides:
//!
//! - [`FlowLayout`]: Wrapping left-to-right arrangement used for chip rows
//! - [`ContentMargins`]: Spacing around layout content
//!
//! Layouts here are pure: they take item sizes and an available width and
//! return rectangles. Surfaces decide when to run them.

mod flow_layout;

pub use flow_layout::{FlowArrangement, FlowLayout};

use horizon_chips_core::Size;

/// Content margins around a layout.
///
/// Margins define the spacing between the layout's content and its edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentMargins {
    /// Left margin.
    pub left: f32,
    /// Top margin.
    pub top: f32,
    /// Right margin.
    pub right: f32,
    /// Bottom margin.
    pub bottom: f32,
}

impl ContentMargins {
    /// Create new content margins.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create uniform margins (same value on all sides).
    pub fn uniform(margin: f32) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Create symmetric margins (same horizontal and vertical).
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Total horizontal margin (left + right).
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical margin (top + bottom).
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Size occupied by margins.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.horizontal(), self.vertical())
    }
}

/// Default spacing between chips, horizontally and between rows.
pub const DEFAULT_SPACING: f32 = 4.0;
