//! In-memory multi-value selection.
//!
//! # Example
//!
//! ```
//! use horizon_chips::select::{MultiSelect, SelectionSource};
//!
//! let select = MultiSelect::new([("a", "Apple"), ("b", "Banana"), ("c", "Cherry")]);
//! select.changed().connect(|_| println!("selection changed"));
//!
//! select.select("c");
//! select.select("a");
//! // Values are reported in option order
//! assert_eq!(select.selected_values(), vec!["a", "c"]);
//! ```

use horizon_chips_core::logging::targets;
use horizon_chips_core::{Property, Signal};
use parking_lot::RwLock;

use super::{SelectOption, SelectionSource};

#[derive(Debug, Clone)]
struct OptionEntry {
    option: SelectOption,
    selected: bool,
}

/// A multi-value selection control backed by an ordered option list.
///
/// User-facing mutators ([`select`](Self::select), [`deselect`](Self::deselect),
/// [`toggle`](Self::toggle), [`set_selected_values`](Self::set_selected_values))
/// emit [`changed`](SelectionSource::changed) once when anything changed.
pub struct MultiSelect {
    options: RwLock<Vec<OptionEntry>>,
    disabled: Property<bool>,
    changed: Signal<()>,
    /// Emitted with the new enabled state.
    pub enabled_changed: Signal<bool>,
}

impl MultiSelect {
    /// Create a select with the given options, none selected.
    ///
    /// Options whose value was already seen are ignored.
    pub fn new<I, O>(options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<SelectOption>,
    {
        let mut entries: Vec<OptionEntry> = Vec::new();
        for option in options {
            let option = option.into();
            if entries.iter().any(|e| e.option.value == option.value) {
                tracing::warn!(
                    target: targets::SELECT,
                    value = %option.value,
                    "duplicate option value ignored"
                );
                continue;
            }
            entries.push(OptionEntry {
                option,
                selected: false,
            });
        }
        Self {
            options: RwLock::new(entries),
            disabled: Property::new(false),
            changed: Signal::new(),
            enabled_changed: Signal::new(),
        }
    }

    /// Pre-select values without emitting a change.
    pub fn with_selected<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self.set_selected(value.as_ref(), true);
        }
        self
    }

    /// All options in order.
    pub fn options(&self) -> Vec<SelectOption> {
        self.options.read().iter().map(|e| e.option.clone()).collect()
    }

    /// Select an option and notify. Returns `true` if it changed.
    pub fn select(&self, value: &str) -> bool {
        self.apply(|| self.set_selected(value, true))
    }

    /// Deselect an option and notify. Returns `true` if it changed.
    pub fn deselect(&self, value: &str) -> bool {
        self.apply(|| self.set_selected(value, false))
    }

    /// Flip an option and notify. Returns `true` if the option exists.
    pub fn toggle(&self, value: &str) -> bool {
        match self.is_selected(value) {
            Some(selected) => self.apply(|| self.set_selected(value, !selected)),
            None => false,
        }
    }

    /// Make exactly `values` selected and notify once.
    ///
    /// Unknown values are ignored. Returns `true` if anything changed.
    pub fn set_selected_values<I, S>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: Vec<String> = values.into_iter().map(|v| v.as_ref().to_owned()).collect();
        self.apply(|| {
            let mut options = self.options.write();
            let mut changed = false;
            for entry in options.iter_mut() {
                let selected = wanted.contains(&entry.option.value);
                if entry.selected != selected {
                    entry.selected = selected;
                    changed = true;
                }
            }
            changed
        })
    }

    /// Deselect everything and notify.
    pub fn clear(&self) -> bool {
        self.set_selected_values(std::iter::empty::<&str>())
    }

    /// Enable or disable user interaction.
    pub fn set_disabled(&self, disabled: bool) {
        if self.disabled.set(disabled) {
            self.enabled_changed.emit(!disabled);
        }
    }

    /// Whether the select is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Run a mutation and notify if it reports a change.
    fn apply(&self, mutate: impl FnOnce() -> bool) -> bool {
        let changed = mutate();
        if changed {
            self.notify_changed();
        }
        changed
    }
}

impl SelectionSource for MultiSelect {
    fn selected_values(&self) -> Vec<String> {
        self.options
            .read()
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.option.value.clone())
            .collect()
    }

    fn option(&self, value: &str) -> Option<SelectOption> {
        self.options
            .read()
            .iter()
            .find(|e| e.option.value == value)
            .map(|e| e.option.clone())
    }

    fn is_selected(&self, value: &str) -> Option<bool> {
        self.options
            .read()
            .iter()
            .find(|e| e.option.value == value)
            .map(|e| e.selected)
    }

    fn set_selected(&self, value: &str, selected: bool) -> bool {
        let mut options = self.options.write();
        match options.iter_mut().find(|e| e.option.value == value) {
            Some(entry) if entry.selected != selected => {
                entry.selected = selected;
                true
            }
            Some(_) => false,
            None => {
                tracing::trace!(target: targets::SELECT, value, "no option with this value");
                false
            }
        }
    }

    fn notify_changed(&self) {
        tracing::trace!(target: targets::SELECT, "selection changed");
        self.changed.emit(());
    }

    fn is_enabled(&self) -> bool {
        !self.disabled.get()
    }

    fn changed(&self) -> &Signal<()> {
        &self.changed
    }
}

impl std::fmt::Debug for MultiSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSelect")
            .field("options", &self.options.read().len())
            .field("selected", &self.selected_values())
            .field("disabled", &self.disabled.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn fruit() -> MultiSelect {
        MultiSelect::new([("a", "Apple"), ("b", "Banana"), ("c", "Cherry")])
    }

    fn count_changes(select: &MultiSelect) -> Arc<Mutex<usize>> {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        select.changed().connect(move |_| *count_clone.lock() += 1);
        count
    }

    #[test]
    fn test_duplicate_values_are_ignored() {
        let select = MultiSelect::new([("a", "Apple"), ("a", "Avocado")]);
        assert_eq!(select.options(), vec![SelectOption::new("a", "Apple")]);
    }

    #[test]
    fn test_selected_values_follow_option_order() {
        let select = fruit();
        select.select("c");
        select.select("a");
        assert_eq!(select.selected_values(), vec!["a", "c"]);
    }

    #[test]
    fn test_select_notifies_only_on_change() {
        let select = fruit();
        let changes = count_changes(&select);

        assert!(select.select("a"));
        assert!(!select.select("a"));
        assert!(!select.select("missing"));
        assert!(select.deselect("a"));
        assert_eq!(*changes.lock(), 2);
    }

    #[test]
    fn test_set_selected_is_silent() {
        let select = fruit();
        let changes = count_changes(&select);

        assert!(select.set_selected("b", true));
        assert_eq!(select.is_selected("b"), Some(true));
        assert_eq!(select.is_selected("missing"), None);
        assert_eq!(*changes.lock(), 0);
    }

    #[test]
    fn test_set_selected_values_notifies_once() {
        let select = fruit().with_selected(["a"]);
        let changes = count_changes(&select);

        assert!(select.set_selected_values(["b", "c", "zzz"]));
        assert_eq!(select.selected_values(), vec!["b", "c"]);
        assert!(!select.set_selected_values(["c", "b"]));
        assert!(select.clear());
        assert!(select.selected_values().is_empty());
        assert_eq!(*changes.lock(), 2);
    }

    #[test]
    fn test_toggle() {
        let select = fruit();
        assert!(select.toggle("b"));
        assert_eq!(select.is_selected("b"), Some(true));
        assert!(select.toggle("b"));
        assert_eq!(select.is_selected("b"), Some(false));
        assert!(!select.toggle("missing"));
    }

    #[test]
    fn test_disabled_state() {
        let select = fruit();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        select.enabled_changed.connect(move |&enabled| seen_clone.lock().push(enabled));

        assert!(select.is_enabled());
        select.set_disabled(true);
        select.set_disabled(true);
        assert!(!select.is_enabled());
        select.set_disabled(false);
        assert_eq!(*seen.lock(), vec![false, true]);
    }

    #[test]
    fn test_listener_can_read_back_during_notification() {
        let select = Arc::new(fruit());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let weak = Arc::downgrade(&select);
        let seen_clone = seen.clone();
        select.changed().connect(move |_| {
            if let Some(select) = weak.upgrade() {
                seen_clone.lock().push(select.selected_values());
            }
        });

        select.select("b");
        assert_eq!(*seen.lock(), vec![vec!["b".to_string()]]);
    }
}
