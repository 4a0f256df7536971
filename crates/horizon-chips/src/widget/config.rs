//! Chips widget configuration.

use std::sync::Arc;

use super::chip::ChipElement;
use super::watcher::{LayoutWatcher, NoLayoutWatcher};
use crate::select::SelectionSource;

/// Callback receiving the owning selection source and a chip.
pub type ChipCallback = Arc<dyn Fn(&dyn SelectionSource, &ChipElement) + Send + Sync>;

/// Configuration for a [`WithChips`](super::WithChips) widget.
///
/// # Example
///
/// ```
/// use horizon_chips::widget::WithChipsConfig;
///
/// let config = WithChipsConfig::new()
///     .with_on_chip_add(|_, chip| println!("added {}", chip.tag))
///     .with_on_chip_delete(|source, chip| {
///         println!("removed {} ({} left)", chip.value, source.selected_values().len())
///     });
/// assert!(config.on_chip_add().is_some());
/// ```
#[derive(Clone)]
pub struct WithChipsConfig {
    on_chip_add: Option<ChipCallback>,
    on_chip_delete: Option<ChipCallback>,
    layout_watcher: Arc<dyn LayoutWatcher>,
}

impl Default for WithChipsConfig {
    fn default() -> Self {
        Self {
            on_chip_add: None,
            on_chip_delete: None,
            layout_watcher: Arc::new(NoLayoutWatcher),
        }
    }
}

impl WithChipsConfig {
    /// Create a configuration with no callbacks and no size observation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` after a chip was added.
    pub fn with_on_chip_add<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn SelectionSource, &ChipElement) + Send + Sync + 'static,
    {
        self.on_chip_add = Some(Arc::new(callback));
        self
    }

    /// Call `callback` after a chip was removed.
    pub fn with_on_chip_delete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn SelectionSource, &ChipElement) + Send + Sync + 'static,
    {
        self.on_chip_delete = Some(Arc::new(callback));
        self
    }

    /// Observe container size changes with `watcher`.
    pub fn with_layout_watcher(mut self, watcher: Arc<dyn LayoutWatcher>) -> Self {
        self.layout_watcher = watcher;
        self
    }

    /// The add callback, if any.
    pub fn on_chip_add(&self) -> Option<&ChipCallback> {
        self.on_chip_add.as_ref()
    }

    /// The delete callback, if any.
    pub fn on_chip_delete(&self) -> Option<&ChipCallback> {
        self.on_chip_delete.as_ref()
    }

    /// The layout watcher.
    pub fn layout_watcher(&self) -> &Arc<dyn LayoutWatcher> {
        &self.layout_watcher
    }
}

impl std::fmt::Debug for WithChipsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithChipsConfig")
            .field("on_chip_add", &self.on_chip_add.is_some())
            .field("on_chip_delete", &self.on_chip_delete.is_some())
            .finish_non_exhaustive()
    }
}
