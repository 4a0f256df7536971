//! Logging and debugging facilities for Horizon Chips.
//!
//! This module provides:
//! - Target names for the `tracing` crate, one per subsystem
//! - Formatting options shared by the tree debug printers
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon Chips uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_chips::reconcile=debug")
//!         .init();
//! }
//! ```

/// Span names used throughout Horizon Chips for tracing.
pub mod span_names {
    /// A full reconciliation pass.
    pub const RECONCILE: &str = "horizon_chips::reconcile";
    /// Overflow recomputation.
    pub const OVERFLOW: &str = "horizon_chips::overflow";
    /// Surface layout pass.
    pub const LAYOUT: &str = "horizon_chips::layout";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_chips_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "horizon_chips_core::property";
    /// Rendering surface target.
    pub const SURFACE: &str = "horizon_chips::surface";
    /// Selection source target.
    pub const SELECT: &str = "horizon_chips::select";
    /// Chip reconciliation target.
    pub const RECONCILE: &str = "horizon_chips::reconcile";
    /// Overflow counter target.
    pub const OVERFLOW: &str = "horizon_chips::overflow";
    /// Event routing target.
    pub const ROUTER: &str = "horizon_chips::router";
    /// Widget lifecycle target.
    pub const WIDGET: &str = "horizon_chips::widget";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line-per-node representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node IDs.
    pub show_ids: bool,
    /// Whether to show attributes.
    pub show_attributes: bool,
    /// Whether to show geometry.
    pub show_geometry: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_attributes: true,
            show_geometry: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_geometry: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_attributes: false,
            show_geometry: false,
            ..Default::default()
        }
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_chips::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
