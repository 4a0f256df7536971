//! Layout-change watchers.
//!
//! A chips widget re-measures its overflow after every chip mutation. When
//! the host can also report size changes of the chips container, a
//! [`LayoutWatcher`] feeds those into the same recomputation. Hosts without
//! that capability use [`NoLayoutWatcher`] and overflow is then only updated
//! on mutations.

use std::sync::Arc;

use horizon_chips_core::logging::targets;
use horizon_chips_core::ConnectionId;
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::surface::{ElementTree, NodeId};

new_key_type! {
    /// Handle for an active observation, released with [`LayoutWatcher::unobserve`].
    pub struct WatchId;
}

/// Callback invoked when an observed element's size changes.
pub type LayoutCallback = Arc<dyn Fn() + Send + Sync>;

/// Reports size changes of surface elements.
pub trait LayoutWatcher: Send + Sync {
    /// Start observing `node`.
    ///
    /// Returns `None` when the watcher cannot observe anything.
    fn observe(&self, node: NodeId, callback: LayoutCallback) -> Option<WatchId>;

    /// Stop an observation. Unknown ids are ignored.
    fn unobserve(&self, id: WatchId);
}

/// A watcher without size observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLayoutWatcher;

impl LayoutWatcher for NoLayoutWatcher {
    fn observe(&self, node: NodeId, _callback: LayoutCallback) -> Option<WatchId> {
        tracing::trace!(target: targets::ROUTER, ?node, "size observation unavailable");
        None
    }

    fn unobserve(&self, _id: WatchId) {}
}

/// Observes client-size changes reported by an [`ElementTree`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use horizon_chips::surface::{ElementKind, ElementTree, RenderSurface};
/// use horizon_chips::widget::{LayoutWatcher, SurfaceResizeWatcher};
/// use horizon_chips_core::Size;
///
/// let tree = Arc::new(ElementTree::new());
/// let row = tree.create_element(ElementKind::Container);
/// let watcher = SurfaceResizeWatcher::new(tree.clone());
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let hits_clone = hits.clone();
/// let id = watcher
///     .observe(row, Arc::new(move || { hits_clone.fetch_add(1, Ordering::SeqCst); }))
///     .unwrap();
///
/// tree.set_client_size(row, Size::new(100.0, 32.0)).unwrap();
/// watcher.unobserve(id);
/// tree.set_client_size(row, Size::new(200.0, 32.0)).unwrap();
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct SurfaceResizeWatcher {
    tree: Arc<ElementTree>,
    watches: Mutex<SlotMap<WatchId, ConnectionId>>,
}

impl SurfaceResizeWatcher {
    /// Create a watcher for a tree.
    pub fn new(tree: Arc<ElementTree>) -> Self {
        Self {
            tree,
            watches: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Number of active observations.
    pub fn watch_count(&self) -> usize {
        self.watches.lock().len()
    }
}

impl LayoutWatcher for SurfaceResizeWatcher {
    fn observe(&self, node: NodeId, callback: LayoutCallback) -> Option<WatchId> {
        let connection = self.tree.resized().connect(move |&resized| {
            if resized == node {
                callback();
            }
        });
        let id = self.watches.lock().insert(connection);
        tracing::trace!(target: targets::ROUTER, ?node, ?id, "observing size changes");
        Some(id)
    }

    fn unobserve(&self, id: WatchId) {
        if let Some(connection) = self.watches.lock().remove(id) {
            self.tree.resized().disconnect(connection);
            tracing::trace!(target: targets::ROUTER, ?id, "size observation released");
        }
    }
}

impl Drop for SurfaceResizeWatcher {
    fn drop(&mut self) {
        for (_, connection) in self.watches.get_mut().drain() {
            self.tree.resized().disconnect(connection);
        }
    }
}

impl std::fmt::Debug for SurfaceResizeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceResizeWatcher")
            .field("watches", &self.watch_count())
            .finish()
    }
}
