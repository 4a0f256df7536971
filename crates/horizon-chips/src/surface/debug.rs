//! Debug visualization for element trees.

use std::fmt::Write as FmtWrite;

use horizon_chips_core::{TreeFormatOptions, TreeStyle};

use super::{NodeId, RenderSurface};

/// Debug utility for visualizing a surface subtree.
///
/// # Example
///
/// ```
/// use horizon_chips::surface::{ElementKind, ElementTree, ElementTreeDebug, RenderSurface};
///
/// let tree = ElementTree::new();
/// let row = tree.create_element(ElementKind::Container);
/// tree.add_class(row, "selected-chips").unwrap();
/// let output = ElementTreeDebug::new().format_subtree(&tree, row);
/// assert!(output.starts_with("Container.selected-chips"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementTreeDebug {
    options: TreeFormatOptions,
}

impl ElementTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a subtree starting from `root`.
    ///
    /// Returns an empty string if `root` does not exist.
    pub fn format_subtree(&self, surface: &dyn RenderSurface, root: NodeId) -> String {
        let mut output = String::new();
        self.format_into(surface, root, 0, &mut Vec::new(), true, &mut output);
        output
    }

    fn format_into(
        &self,
        surface: &dyn RenderSurface,
        id: NodeId,
        depth: usize,
        open_levels: &mut Vec<bool>,
        is_last: bool,
        output: &mut String,
    ) {
        if let Some(max) = self.options.max_depth
            && depth > max
        {
            return;
        }
        let Some(kind) = surface.kind(id) else {
            return;
        };

        output.push_str(&self.build_prefix(depth, open_levels, is_last));
        write!(output, "{kind:?}").expect("write to String");
        for class in surface.classes(id) {
            write!(output, ".{class}").expect("write to String");
        }
        if self.options.show_ids {
            write!(output, " [{id:?}]").expect("write to String");
        }
        if self.options.show_attributes {
            for (name, value) in surface.attributes(id) {
                write!(output, " {name}={value:?}").expect("write to String");
            }
        }
        if let Some(text) = surface.text(id) {
            write!(output, " {text:?}").expect("write to String");
        }
        if self.options.show_geometry
            && let (Some(top), Some(size)) = (surface.offset_top(id), surface.client_size(id))
        {
            write!(output, " @y={top} {}x{}", size.width, size.height).expect("write to String");
        }
        output.push('\n');

        let children = surface.children(id);
        let count = children.len();
        if depth > 0 {
            open_levels.push(!is_last);
        }
        for (i, child) in children.into_iter().enumerate() {
            self.format_into(surface, child, depth + 1, open_levels, i + 1 == count, output);
        }
        if depth > 0 {
            open_levels.pop();
        }
    }

    /// Build the prefix string for a tree node.
    fn build_prefix(&self, depth: usize, open_levels: &[bool], is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for &open in open_levels {
            prefix.push_str(if open { branch } else { " " });
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}
