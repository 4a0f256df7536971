//! The chips widget.
//!
//! [`WithChips`] mirrors the selection of a [`SelectionSource`] as a row of
//! chips on a [`RenderSurface`]. The source is the only owner of the
//! selection: the widget re-derives its chips from it on every change
//! notification and routes chip-close clicks back to it as deselections.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_chips::select::MultiSelect;
//! use horizon_chips::surface::{ElementKind, ElementTree, RenderSurface};
//! use horizon_chips::widget::{WithChips, WithChipsConfig};
//!
//! let tree = Arc::new(ElementTree::new());
//! let host = tree.create_element(ElementKind::Container);
//! let select = Arc::new(MultiSelect::new([("a", "Apple"), ("b", "Banana")]));
//!
//! let chips = WithChips::new(select.clone(), tree.clone(), host, WithChipsConfig::new());
//! select.select("a");
//! select.select("b");
//! assert_eq!(chips.chips(), vec!["a", "b"]);
//!
//! select.deselect("a");
//! assert_eq!(chips.chips(), vec!["b"]);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_chips_core::logging::{span_names, targets};
use horizon_chips_core::{PerfSpan, Property, Signal, TreeFormatOptions};
use parking_lot::Mutex;

use super::chip::{CHIP_CLASS, Chip, ChipElement, VALUE_ATTRIBUTE};
use super::config::WithChipsConfig;
use super::overflow::{COUNTER_CLASS, OverflowCounter, OverflowState};
use super::router::EventRouter;
use crate::select::SelectionSource;
use crate::surface::{ElementKind, ElementTreeDebug, NodeId, RenderSurface};

/// Class of the chips container.
pub const CONTAINER_CLASS: &str = "selected-chips";

/// What a [`WithChips::delete_chip`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The chip element was removed directly.
    Removed,
    /// The backing option was deselected; reconciliation removed the chip.
    Deselected,
    /// Nothing matched; no side effects.
    Unchanged,
}

/// Shared widget state. Event slots hold weak references to it.
pub(crate) struct WithChipsInner {
    source: Arc<dyn SelectionSource>,
    surface: Arc<dyn RenderSurface>,
    host: NodeId,
    container: NodeId,
    counter: OverflowCounter,
    config: WithChipsConfig,
    /// Values deselected from the UI whose removal awaits reconciliation.
    pending: Mutex<Vec<String>>,
    overflow: Property<OverflowState>,
    destroyed: AtomicBool,
    focus_requested: Signal<NodeId>,
    overflow_changed: Signal<OverflowState>,
}

impl WithChipsInner {
    pub(crate) fn source(&self) -> &dyn SelectionSource {
        &*self.source
    }

    pub(crate) fn surface(&self) -> &dyn RenderSurface {
        &*self.surface
    }

    pub(crate) fn config(&self) -> &WithChipsConfig {
        &self.config
    }

    pub(crate) fn container(&self) -> NodeId {
        self.container
    }

    pub(crate) fn focus_requested(&self) -> &Signal<NodeId> {
        &self.focus_requested
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Rendered chip elements with their values, in order.
    fn rendered(&self) -> Vec<(NodeId, String)> {
        self.surface
            .children(self.container)
            .into_iter()
            .filter(|&node| self.surface.has_class(node, CHIP_CLASS))
            .filter_map(|node| {
                self.surface
                    .attribute(node, VALUE_ATTRIBUTE)
                    .map(|value| (node, value))
            })
            .collect()
    }

    fn find_chip(&self, value: &str) -> Option<NodeId> {
        self.rendered()
            .into_iter()
            .find(|(_, v)| v == value)
            .map(|(node, _)| node)
    }

    pub(crate) fn render_all(&self) {
        if self.is_destroyed() {
            return;
        }
        let _span = PerfSpan::new(span_names::RECONCILE);
        self.pending.lock().clear();

        let selected = self.source.selected_values();
        for (_, value) in self.rendered() {
            if !selected.contains(&value) {
                self.remove_chip(&value);
            }
        }

        // Removal callbacks may have changed the selection again
        let selected = self.source.selected_values();
        for value in &selected {
            if self.find_chip(value).is_some() || self.source.is_selected(value) != Some(true) {
                continue;
            }
            match self.source.option(value) {
                Some(option) => {
                    self.add_chip(Chip::new(value.as_str(), option.label));
                }
                None => {
                    tracing::debug!(target: targets::RECONCILE, value = %value, "selected value has no option");
                }
            }
        }
        tracing::debug!(target: targets::RECONCILE, selected = selected.len(), "chips reconciled");
    }

    pub(crate) fn add_chip(&self, chip: Chip) -> Option<NodeId> {
        if self.is_destroyed() {
            return None;
        }
        let Some(value) = chip.value() else {
            tracing::trace!(target: targets::RECONCILE, tag = %chip.tag, "chip without value ignored");
            return None;
        };
        if self.find_chip(value).is_some() {
            tracing::trace!(target: targets::RECONCILE, value, "chip already rendered");
            return None;
        }

        let node = chip.render(&*self.surface)?;
        if let Err(err) = self.surface.append_child(self.container, node) {
            tracing::debug!(target: targets::RECONCILE, %err, "chip insertion failed");
            let _ = self.surface.remove(node);
            return None;
        }
        tracing::trace!(target: targets::RECONCILE, value, "chip added");
        self.recompute_overflow();

        if let Some(callback) = self.config.on_chip_add()
            && let Some(element) = ChipElement::capture(&*self.surface, node)
        {
            callback(&*self.source, &element);
        }
        Some(node)
    }

    pub(crate) fn delete_chip(&self, value: &str) -> DeleteOutcome {
        if self.is_destroyed() {
            return DeleteOutcome::Unchanged;
        }

        if self.source.is_selected(value) == Some(true) {
            self.pending.lock().push(value.to_owned());
            self.source.set_selected(value, false);
            tracing::trace!(target: targets::RECONCILE, value, "option deselected, awaiting change");
            self.source.notify_changed();

            // The notification did not reach us; converge here instead
            let unhandled = !self.pending.lock().is_empty();
            if unhandled {
                tracing::debug!(target: targets::RECONCILE, value, "change not routed, reconciling directly");
                self.render_all();
            }
            return DeleteOutcome::Deselected;
        }

        if self.remove_chip(value) {
            DeleteOutcome::Removed
        } else {
            DeleteOutcome::Unchanged
        }
    }

    /// Remove a rendered chip, bypassing the source.
    fn remove_chip(&self, value: &str) -> bool {
        let Some(node) = self.find_chip(value) else {
            tracing::trace!(target: targets::RECONCILE, value, "no chip to remove");
            return false;
        };
        let element = ChipElement::capture(&*self.surface, node);
        if let Err(err) = self.surface.remove(node) {
            tracing::debug!(target: targets::RECONCILE, %err, "chip removal failed");
            return false;
        }
        tracing::trace!(target: targets::RECONCILE, value, "chip removed");
        self.recompute_overflow();

        if let Some(callback) = self.config.on_chip_delete()
            && let Some(element) = element
        {
            callback(&*self.source, &element);
        }
        true
    }

    pub(crate) fn recompute_overflow(&self) -> OverflowState {
        if self.is_destroyed() {
            return self.overflow.get();
        }
        let state = self.counter.recompute(&*self.surface);
        if self.overflow.set(state) {
            self.overflow_changed.emit(state);
        }
        state
    }
}

/// A chips widget bound to a selection source and a rendering surface.
///
/// Construction creates the chips container as the first child of `host`:
///
/// ```text
/// Container.selected-chips
/// ├── Badge.counter
/// ├── Chip.chip.dynamic data-value="a"
/// └── Chip.chip.dynamic data-value="b"
/// ```
///
/// Dropping the widget releases its subscriptions but leaves the container
/// in place; call [`destroy`](Self::destroy) to remove it.
pub struct WithChips {
    inner: Arc<WithChipsInner>,
    router: Mutex<EventRouter>,
}

impl WithChips {
    /// Create a widget, render the current selection and start listening.
    pub fn new(
        source: Arc<dyn SelectionSource>,
        surface: Arc<dyn RenderSurface>,
        host: NodeId,
        config: WithChipsConfig,
    ) -> Self {
        let container = surface.create_element(ElementKind::Container);
        let badge = surface.create_element(ElementKind::Badge);
        let built = surface
            .add_class(container, CONTAINER_CLASS)
            .and_then(|()| surface.add_class(badge, COUNTER_CLASS))
            .and_then(|()| surface.append_child(container, badge))
            .and_then(|()| surface.prepend_child(host, container));
        if let Err(err) = built {
            tracing::warn!(target: targets::WIDGET, %err, ?host, "chips container not attached to host");
        }

        let inner = Arc::new(WithChipsInner {
            source,
            surface,
            host,
            container,
            counter: OverflowCounter::new(container, badge),
            config,
            pending: Mutex::new(Vec::new()),
            overflow: Property::new(OverflowState::default()),
            destroyed: AtomicBool::new(false),
            focus_requested: Signal::new(),
            overflow_changed: Signal::new(),
        });

        inner.render_all();
        let router = EventRouter::attach(&inner);
        tracing::debug!(target: targets::WIDGET, ?container, "chips widget created");

        Self {
            inner,
            router: Mutex::new(router),
        }
    }

    /// The currently selected values, read live from the source.
    pub fn get_data(&self) -> Vec<String> {
        self.inner.source.selected_values()
    }

    /// Alias of [`get_data`](Self::get_data).
    pub fn selected_values(&self) -> Vec<String> {
        self.get_data()
    }

    /// Values of the rendered chips, in display order.
    pub fn chips(&self) -> Vec<String> {
        self.inner.rendered().into_iter().map(|(_, v)| v).collect()
    }

    /// Find the element of the chip for `value`.
    pub fn chip_node(&self, value: &str) -> Option<NodeId> {
        self.inner.find_chip(value)
    }

    /// Add a chip.
    ///
    /// Chips without a value, without a tag, or whose value is already
    /// rendered are ignored. Returns the new chip element.
    pub fn add_chip(&self, chip: Chip) -> Option<NodeId> {
        self.inner.add_chip(chip)
    }

    /// Delete the chip for `value`.
    ///
    /// If `value` is selected in the source, the option is deselected and the
    /// resulting change notification removes the chip. Otherwise the chip is
    /// removed directly.
    pub fn delete_chip(&self, value: &str) -> DeleteOutcome {
        self.inner.delete_chip(value)
    }

    /// Reconcile the chips with the source's selection.
    pub fn render_all(&self) {
        self.inner.render_all();
    }

    /// Re-measure overflow and update the counter badge.
    pub fn recompute_overflow(&self) -> OverflowState {
        self.inner.recompute_overflow()
    }

    /// The last measured overflow state.
    pub fn overflow(&self) -> OverflowState {
        self.inner.overflow.get()
    }

    /// The element this widget was attached to.
    pub fn host(&self) -> NodeId {
        self.inner.host
    }

    /// The chips container.
    pub fn container(&self) -> NodeId {
        self.inner.container
    }

    /// The counter badge.
    pub fn counter(&self) -> NodeId {
        self.inner.counter.badge()
    }

    /// The selection source.
    pub fn source(&self) -> &Arc<dyn SelectionSource> {
        &self.inner.source
    }

    /// Signal emitted with the clicked element when a click inside the
    /// container should focus the underlying input.
    pub fn focus_requested(&self) -> &Signal<NodeId> {
        &self.inner.focus_requested
    }

    /// Signal emitted when the measured overflow state changes.
    pub fn overflow_changed(&self) -> &Signal<OverflowState> {
        &self.inner.overflow_changed
    }

    /// Detach all handlers and remove the chips container.
    ///
    /// The selection source is left untouched. Every later operation is a
    /// no-op.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.router.lock().detach(&self.inner);
        if let Err(err) = self.inner.surface.remove(self.inner.container) {
            tracing::debug!(target: targets::WIDGET, %err, "chips container already gone");
        }
        tracing::debug!(target: targets::WIDGET, "chips widget destroyed");
    }

    /// Whether [`destroy`](Self::destroy) was called.
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_destroyed()
    }

    /// Whether the widget still listens to its source and surface.
    pub fn is_attached(&self) -> bool {
        self.router.lock().is_attached()
    }

    /// Render the chips container as an indented tree.
    pub fn format_tree(&self, options: TreeFormatOptions) -> String {
        ElementTreeDebug::with_options(options)
            .format_subtree(&*self.inner.surface, self.inner.container)
    }
}

impl Drop for WithChips {
    fn drop(&mut self) {
        self.router.get_mut().detach(&self.inner);
    }
}

impl std::fmt::Debug for WithChips {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithChips")
            .field("container", &self.inner.container)
            .field("chips", &self.chips())
            .field("overflow", &self.overflow())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

static_assertions::assert_impl_all!(WithChips: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::MultiSelect;
    use crate::surface::ElementTree;

    fn setup(selected: &[&str]) -> (Arc<ElementTree>, Arc<MultiSelect>, WithChips) {
        let tree = Arc::new(ElementTree::new());
        let host = tree.create_element(ElementKind::Container);
        let select = Arc::new(
            MultiSelect::new([("a", "Apple"), ("b", "Banana"), ("c", "Cherry")])
                .with_selected(selected),
        );
        let chips = WithChips::new(select.clone(), tree.clone(), host, WithChipsConfig::new());
        (tree, select, chips)
    }

    #[test]
    fn test_construction_layout() {
        let (tree, _, chips) = setup(&[]);
        assert_eq!(tree.children(chips.host()), vec![chips.container()]);
        assert_eq!(tree.children(chips.container()), vec![chips.counter()]);
        assert!(tree.has_class(chips.container(), CONTAINER_CLASS));
        assert!(tree.has_class(chips.counter(), COUNTER_CLASS));
        assert!(chips.is_attached());
    }

    #[test]
    fn test_container_is_prepended_to_host() {
        let tree = Arc::new(ElementTree::new());
        let host = tree.create_element(ElementKind::Container);
        let input = tree.create_element(ElementKind::Text);
        tree.append_child(host, input).unwrap();
        let select = Arc::new(MultiSelect::new([("a", "Apple")]));
        let chips = WithChips::new(select, tree.clone(), host, WithChipsConfig::new());
        assert_eq!(tree.children(host), vec![chips.container(), input]);
    }

    #[test]
    fn test_initial_render_uses_existing_selection() {
        let (tree, _, chips) = setup(&["c", "a"]);
        assert_eq!(chips.chips(), vec!["a", "c"]);
        let apple = chips.chip_node("a").unwrap();
        let text = tree.children(apple)[0];
        assert_eq!(tree.text(text).as_deref(), Some("Apple"));
    }

    #[test]
    fn test_existing_chips_keep_position() {
        let (_, select, chips) = setup(&["b"]);
        select.select("a");
        assert_eq!(chips.chips(), vec!["b", "a"]);
        chips.render_all();
        assert_eq!(chips.chips(), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let (tree, _, chips) = setup(&["a"]);
        let before = tree.len();
        assert_eq!(chips.add_chip(Chip::new("a", "Again")), None);
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_add_without_tag_is_ignored() {
        let (_, _, chips) = setup(&[]);
        assert_eq!(chips.add_chip(Chip::new("z", "")), None);
        assert!(chips.chips().is_empty());
    }

    #[test]
    fn test_delete_selected_goes_through_source() {
        let (_, select, chips) = setup(&["a", "b"]);
        assert_eq!(chips.delete_chip("a"), DeleteOutcome::Deselected);
        assert_eq!(select.is_selected("a"), Some(false));
        assert_eq!(chips.chips(), vec!["b"]);
    }

    #[test]
    fn test_delete_unbacked_removes_directly() {
        let (_, _, chips) = setup(&[]);
        chips.add_chip(Chip::new("x", "Extra")).unwrap();
        assert_eq!(chips.delete_chip("x"), DeleteOutcome::Removed);
        assert!(chips.chips().is_empty());
        assert_eq!(chips.delete_chip("x"), DeleteOutcome::Unchanged);
    }

    #[test]
    fn test_blocked_change_signal_still_converges() {
        let (_, select, chips) = setup(&["a", "b"]);
        select.changed().set_blocked(true);
        assert_eq!(chips.delete_chip("a"), DeleteOutcome::Deselected);
        assert_eq!(chips.chips(), vec!["b"]);
    }

    #[test]
    fn test_destroy_removes_container_and_detaches() {
        let (tree, select, chips) = setup(&["a"]);
        let container = chips.container();
        chips.destroy();
        assert!(!tree.is_alive(container));
        assert!(!chips.is_attached());
        assert_eq!(select.changed().connection_count(), 0);

        select.select("b");
        assert_eq!(chips.add_chip(Chip::new("x", "X")), None);
        assert_eq!(chips.delete_chip("a"), DeleteOutcome::Unchanged);
        assert_eq!(select.selected_values(), vec!["a", "b"]);
        chips.destroy();
    }

    #[test]
    fn test_drop_detaches_but_keeps_container() {
        let (tree, select, chips) = setup(&["a"]);
        let container = chips.container();
        drop(chips);
        assert!(tree.is_alive(container));
        assert_eq!(select.changed().connection_count(), 0);
        assert_eq!(tree.clicked().connection_count(), 0);
    }

    #[test]
    fn test_format_tree() {
        let (_, _, chips) = setup(&["a"]);
        let output = chips.format_tree(TreeFormatOptions::minimal());
        assert!(output.starts_with("Container.selected-chips"));
        assert!(output.contains("Badge.counter"));
        assert!(output.contains("Chip.chip.dynamic"));
    }
}
