//! Error types for the rendering surface.

use crate::surface::NodeId;

/// Result type alias for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Errors reported by a [`RenderSurface`](crate::surface::RenderSurface).
///
/// The chips widget never propagates these to its callers; it logs them and
/// treats the failed step as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The node does not exist (never created, or already removed).
    #[error("Element {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// The requested insertion would create a cycle or attach a node twice.
    #[error("Cannot insert {child:?} under {parent:?}: {message}")]
    InvalidHierarchy {
        parent: NodeId,
        child: NodeId,
        message: String,
    },

    /// The reference node is not attached to any parent.
    #[error("Element {0:?} has no parent to insert beside")]
    Detached(NodeId),
}

impl SurfaceError {
    /// Create a hierarchy error.
    pub fn invalid_hierarchy(parent: NodeId, child: NodeId, message: impl Into<String>) -> Self {
        Self::InvalidHierarchy {
            parent,
            child,
            message: message.into(),
        }
    }
}
