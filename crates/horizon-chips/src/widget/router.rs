//! Event routing between a chips widget and its collaborators.
//!
//! The router owns every subscription a widget makes: the selection source's
//! change notification, the surface's click notification and the optional
//! container size observation. Slots hold weak references to the widget
//! state, so a forgotten subscription can never keep a widget alive.

use std::sync::{Arc, Weak};

use horizon_chips_core::ConnectionId;
use horizon_chips_core::logging::targets;

use super::chip::{CHIP_CLASS, CLOSE_CLASS, VALUE_ATTRIBUTE};
use super::watcher::WatchId;
use super::with_chips::WithChipsInner;
use crate::surface::NodeId;

/// Subscriptions of one widget.
#[derive(Debug, Default)]
pub(crate) struct EventRouter {
    change: Option<ConnectionId>,
    click: Option<ConnectionId>,
    watch: Option<WatchId>,
}

impl EventRouter {
    /// Subscribe `inner` to its source, surface and layout watcher.
    pub(crate) fn attach(inner: &Arc<WithChipsInner>) -> Self {
        let weak = Arc::downgrade(inner);
        let change = inner.source().changed().connect(move |_| {
            if let Some(inner) = weak.upgrade() {
                tracing::trace!(target: targets::ROUTER, "selection change routed");
                inner.render_all();
            }
        });

        let weak = Arc::downgrade(inner);
        let click = inner.surface().clicked().connect(move |event| {
            if let Some(inner) = weak.upgrade() {
                route_click(&inner, event.target);
            }
        });

        let weak: Weak<WithChipsInner> = Arc::downgrade(inner);
        let watch = inner.config().layout_watcher().observe(
            inner.container(),
            Arc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    tracing::trace!(target: targets::ROUTER, "container resize routed");
                    inner.recompute_overflow();
                }
            }),
        );

        tracing::debug!(
            target: targets::ROUTER,
            resize_observed = watch.is_some(),
            "event router attached"
        );
        Self {
            change: Some(change),
            click: Some(click),
            watch,
        }
    }

    /// Release every subscription. Safe to call more than once.
    pub(crate) fn detach(&mut self, inner: &WithChipsInner) {
        if let Some(id) = self.change.take() {
            inner.source().changed().disconnect(id);
        }
        if let Some(id) = self.click.take() {
            inner.surface().clicked().disconnect(id);
        }
        if let Some(id) = self.watch.take() {
            inner.config().layout_watcher().unobserve(id);
        }
        tracing::debug!(target: targets::ROUTER, "event router detached");
    }

    /// Whether any subscription is still held.
    pub(crate) fn is_attached(&self) -> bool {
        self.change.is_some() || self.click.is_some() || self.watch.is_some()
    }
}

/// Handle a click somewhere on the surface.
///
/// Clicks outside the container are not ours. Clicks on a chip's close icon
/// delete that chip; any other click inside the container asks for focus.
fn route_click(inner: &WithChipsInner, target: NodeId) {
    if inner.is_destroyed() {
        return;
    }
    let surface = inner.surface();
    let container = inner.container();
    if !surface.contains(container, target) {
        return;
    }
    if !inner.source().is_enabled() {
        tracing::trace!(target: targets::ROUTER, ?target, "click ignored on disabled source");
        return;
    }

    // Only the icon itself counts; a `close` class on an ancestor does not
    if surface.has_class(target, CLOSE_CLASS)
        && let Some(chip) = surface.closest(target, CHIP_CLASS)
        && surface.contains(container, chip)
    {
        let Some(value) = surface.attribute(chip, VALUE_ATTRIBUTE) else {
            tracing::debug!(target: targets::ROUTER, ?chip, "chip without value clicked");
            return;
        };
        tracing::trace!(target: targets::ROUTER, value = %value, "close clicked");
        inner.delete_chip(&value);
        return;
    }

    tracing::trace!(target: targets::ROUTER, ?target, "focus requested");
    inner.focus_requested().emit(target);
}
