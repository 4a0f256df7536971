//! Selection sources.
//!
//! A selection source is the authoritative owner of a multi-value selection.
//! The chips widget only reads it and requests changes through the narrow
//! [`SelectionSource`] contract: it never keeps its own copy of the selected
//! values.
//!
//! [`MultiSelect`] is the in-memory implementation.

mod multi_select;

pub use multi_select::MultiSelect;

use horizon_chips_core::Signal;

/// One selectable option.
///
/// Options are identified by `value`, which is unique within a source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectOption {
    /// Stable identifier of the option.
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

impl SelectOption {
    /// Create an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for SelectOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// The contract between a chips widget and the control that owns the selection.
///
/// Implementations use interior mutability and must not hold internal locks
/// while emitting [`changed`](Self::changed): slots read the source back.
pub trait SelectionSource: Send + Sync {
    /// Currently selected values, in the source's order.
    fn selected_values(&self) -> Vec<String>;

    /// Look up an option by value.
    fn option(&self, value: &str) -> Option<SelectOption>;

    /// Whether the option with `value` is selected.
    ///
    /// Returns `None` when no such option exists.
    fn is_selected(&self, value: &str) -> Option<bool>;

    /// Set the selected flag of an option without notifying anyone.
    ///
    /// Returns `true` if the flag changed.
    fn set_selected(&self, value: &str, selected: bool) -> bool;

    /// Emit the change notification.
    fn notify_changed(&self);

    /// Whether the source accepts user interaction.
    fn is_enabled(&self) -> bool;

    /// Signal emitted after the selection changed.
    fn changed(&self) -> &Signal<()>;
}
