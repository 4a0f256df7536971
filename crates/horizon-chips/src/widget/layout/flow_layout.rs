//! Flow layout for wrapping horizontal arrangement.
//!
//! `FlowLayout` arranges items horizontally from left to right, wrapping to
//! the next row when the available width is exceeded. This is how chips flow
//! inside their container.
//!
//! # Example
//!
//! ```
//! use horizon_chips::widget::layout::{ContentMargins, FlowLayout};
//! use horizon_chips_core::Size;
//!
//! let mut layout = FlowLayout::new();
//! layout.set_content_margins(ContentMargins::uniform(0.0));
//! layout.set_horizontal_spacing(10.0);
//!
//! let sizes = [Size::new(50.0, 30.0); 3];
//! let arranged = layout.arrange(Some(120.0), &sizes);
//! assert_eq!(arranged.rects[2].top(), arranged.rects[0].bottom() + layout.vertical_spacing());
//! ```

use horizon_chips_core::{Rect, Size};

use super::{ContentMargins, DEFAULT_SPACING};

/// Result of a flow layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowArrangement {
    /// One rectangle per input item, in input order.
    pub rects: Vec<Rect>,
    /// Size needed to show every item, margins included.
    pub content_size: Size,
    /// Number of rows produced.
    pub rows: usize,
}

/// A flow layout that wraps items horizontally.
///
/// Items are placed left to right until the available width is exceeded,
/// then the layout continues on the next row. Items are top-aligned within
/// their row, so every item of a row shares the same vertical offset.
///
/// An item wider than the available width still gets a row of its own; the
/// content then overflows horizontally.
#[derive(Debug, Clone)]
pub struct FlowLayout {
    /// Horizontal spacing between items in a row.
    horizontal_spacing: f32,
    /// Vertical spacing between rows.
    vertical_spacing: f32,
    /// Margins around the content.
    margins: ContentMargins,
}

impl FlowLayout {
    /// Create a new flow layout with default settings.
    pub fn new() -> Self {
        Self {
            horizontal_spacing: DEFAULT_SPACING,
            vertical_spacing: DEFAULT_SPACING,
            margins: ContentMargins::default(),
        }
    }

    /// Get the horizontal spacing between items.
    #[inline]
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Set the horizontal spacing between items.
    pub fn set_horizontal_spacing(&mut self, spacing: f32) {
        self.horizontal_spacing = spacing.max(0.0);
    }

    /// Get the vertical spacing between rows.
    #[inline]
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    /// Set the vertical spacing between rows.
    pub fn set_vertical_spacing(&mut self, spacing: f32) {
        self.vertical_spacing = spacing.max(0.0);
    }

    /// Get the content margins.
    #[inline]
    pub fn content_margins(&self) -> ContentMargins {
        self.margins
    }

    /// Set the content margins.
    pub fn set_content_margins(&mut self, margins: ContentMargins) {
        self.margins = margins;
    }

    /// Arrange items of the given sizes.
    ///
    /// `available_width` is the outer width including margins; `None` means
    /// unconstrained, in which case everything lands on a single row.
    pub fn arrange(&self, available_width: Option<f32>, sizes: &[Size]) -> FlowArrangement {
        if sizes.is_empty() {
            return FlowArrangement {
                rects: Vec::new(),
                content_size: self.margins.size(),
                rows: 0,
            };
        }

        let content_x = self.margins.left;
        let content_y = self.margins.top;
        let content_width = available_width
            .map(|w| (w - self.margins.horizontal()).max(0.0))
            .unwrap_or(f32::INFINITY);

        let mut rects = Vec::with_capacity(sizes.len());
        let mut x: f32 = 0.0;
        let mut y: f32 = 0.0;
        let mut row_height: f32 = 0.0;
        let mut row_len = 0usize;
        let mut rows = 1usize;
        let mut max_right: f32 = 0.0;

        for size in sizes {
            let next_x = if row_len == 0 {
                x + size.width
            } else {
                x + self.horizontal_spacing + size.width
            };

            // Wrap unless this is the first item of the row
            if row_len > 0 && next_x > content_width {
                y += row_height + self.vertical_spacing;
                x = 0.0;
                row_height = 0.0;
                row_len = 0;
                rows += 1;
            }

            let item_x = if row_len == 0 {
                x
            } else {
                x + self.horizontal_spacing
            };
            rects.push(Rect::new(
                content_x + item_x,
                content_y + y,
                size.width,
                size.height,
            ));

            x = item_x + size.width;
            max_right = max_right.max(x);
            row_height = row_height.max(size.height);
            row_len += 1;
        }

        FlowArrangement {
            rects,
            content_size: Size::new(
                max_right + self.margins.horizontal(),
                y + row_height + self.margins.vertical(),
            ),
            rows,
        }
    }

    /// Height required to show every item at the given outer width.
    pub fn height_for_width(&self, width: f32, sizes: &[Size]) -> f32 {
        self.arrange(Some(width), sizes).content_size.height
    }
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FlowLayout {
        let mut layout = FlowLayout::new();
        layout.set_content_margins(ContentMargins::uniform(0.0));
        layout.set_horizontal_spacing(10.0);
        layout.set_vertical_spacing(5.0);
        layout
    }

    #[test]
    fn test_flow_layout_creation() {
        let layout = FlowLayout::new();
        assert_eq!(layout.horizontal_spacing(), DEFAULT_SPACING);
        assert_eq!(layout.vertical_spacing(), DEFAULT_SPACING);
        assert_eq!(layout.content_margins(), ContentMargins::default());
    }

    #[test]
    fn test_flow_layout_single_row() {
        // 200px wide: 50 + 10 + 50 + 10 + 50 = 170px, fits in one row
        let sizes = [Size::new(50.0, 30.0); 3];
        let arranged = layout().arrange(Some(200.0), &sizes);

        assert_eq!(arranged.rows, 1);
        assert!(arranged.rects.iter().all(|r| r.top() == 0.0));
        assert_eq!(arranged.rects[0].left(), 0.0);
        assert_eq!(arranged.rects[1].left(), 60.0);
        assert_eq!(arranged.rects[2].left(), 120.0);
        assert_eq!(arranged.content_size, Size::new(170.0, 30.0));
    }

    #[test]
    fn test_flow_layout_wrapping() {
        // 150px wide: 50 + 10 + 50 = 110px fits 2, then wrap
        let sizes = [Size::new(50.0, 30.0); 4];
        let arranged = layout().arrange(Some(150.0), &sizes);

        assert_eq!(arranged.rows, 2);
        assert_eq!(arranged.rects[0].top(), 0.0);
        assert_eq!(arranged.rects[1].top(), 0.0);
        assert_eq!(arranged.rects[2].top(), 35.0); // 30 + 5
        assert_eq!(arranged.rects[3].top(), 35.0);
        assert_eq!(arranged.rects[2].left(), 0.0);
        assert_eq!(arranged.content_size.height, 65.0);
    }

    #[test]
    fn test_flow_layout_oversized_item_gets_own_row() {
        let sizes = [Size::new(300.0, 30.0), Size::new(50.0, 30.0)];
        let arranged = layout().arrange(Some(100.0), &sizes);

        assert_eq!(arranged.rows, 2);
        assert_eq!(arranged.rects[0].top(), 0.0);
        assert_eq!(arranged.rects[1].top(), 35.0);
        assert_eq!(arranged.content_size.width, 300.0);
    }

    #[test]
    fn test_flow_layout_unconstrained_is_one_row() {
        let sizes = [Size::new(80.0, 30.0); 10];
        let arranged = layout().arrange(None, &sizes);
        assert_eq!(arranged.rows, 1);
        assert_eq!(arranged.content_size.width, 890.0);
    }

    #[test]
    fn test_flow_layout_rows_are_top_aligned() {
        let sizes = [Size::new(40.0, 20.0), Size::new(40.0, 32.0)];
        let arranged = layout().arrange(Some(200.0), &sizes);
        assert_eq!(arranged.rects[0].top(), arranged.rects[1].top());
        assert_eq!(arranged.content_size.height, 32.0);
    }

    #[test]
    fn test_flow_layout_margins() {
        let mut layout = layout();
        layout.set_content_margins(ContentMargins::symmetric(8.0, 4.0));
        let arranged = layout.arrange(Some(136.0), &[Size::new(50.0, 30.0); 3]);

        // 120px of content width fits two items
        assert_eq!(arranged.rects[0].left(), 8.0);
        assert_eq!(arranged.rects[0].top(), 4.0);
        assert_eq!(arranged.rects[2].top(), 39.0);
        assert_eq!(arranged.content_size.height, 73.0);
    }

    #[test]
    fn test_flow_layout_height_for_width() {
        let sizes = [Size::new(50.0, 30.0); 4];
        let layout = layout();
        assert_eq!(layout.height_for_width(500.0, &sizes), 30.0);
        assert_eq!(layout.height_for_width(50.0, &sizes), 4.0 * 30.0 + 3.0 * 5.0);
    }

    #[test]
    fn test_flow_layout_empty() {
        let arranged = layout().arrange(Some(100.0), &[]);
        assert_eq!(arranged.rows, 0);
        assert_eq!(arranged.content_size, Size::ZERO);
    }
}
