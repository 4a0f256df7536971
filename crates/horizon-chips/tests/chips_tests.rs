//! Integration tests for chip reconciliation and deletion.

use std::sync::Arc;

use horizon_chips::select::{MultiSelect, SelectionSource};
use horizon_chips::surface::{ElementKind, ElementTree, NodeId, RenderSurface};
use horizon_chips::widget::{
    CLOSE_CLASS, Chip, ChipElement, DeleteOutcome, OverflowState, WithChips, WithChipsConfig,
};
use horizon_chips_core::Size;
use parking_lot::Mutex;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records callback invocations.
#[derive(Default)]
struct Recorder {
    added: Mutex<Vec<ChipElement>>,
    deleted: Mutex<Vec<ChipElement>>,
}

impl Recorder {
    fn config(self: &Arc<Self>) -> WithChipsConfig {
        let on_add = self.clone();
        let on_delete = self.clone();
        WithChipsConfig::new()
            .with_on_chip_add(move |_, chip| on_add.added.lock().push(chip.clone()))
            .with_on_chip_delete(move |_, chip| on_delete.deleted.lock().push(chip.clone()))
    }

    fn added_values(&self) -> Vec<String> {
        self.added.lock().iter().map(|c| c.value.clone()).collect()
    }

    fn deleted_values(&self) -> Vec<String> {
        self.deleted.lock().iter().map(|c| c.value.clone()).collect()
    }
}

struct Fixture {
    tree: Arc<ElementTree>,
    select: Arc<MultiSelect>,
    recorder: Arc<Recorder>,
    changes: Arc<Mutex<usize>>,
    chips: WithChips,
}

impl Fixture {
    fn new<I, O>(options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<horizon_chips::SelectOption>,
    {
        init_tracing();
        let tree = Arc::new(ElementTree::new());
        let host = tree.create_element(ElementKind::Container);
        let select = Arc::new(MultiSelect::new(options));
        let recorder = Arc::new(Recorder::default());

        let changes = Arc::new(Mutex::new(0));
        let changes_clone = changes.clone();
        select.changed().connect(move |_| *changes_clone.lock() += 1);

        let chips = WithChips::new(select.clone(), tree.clone(), host, recorder.config());
        Self {
            tree,
            select,
            recorder,
            changes,
            chips,
        }
    }

    fn fruit() -> Self {
        Self::new([("a", "Apple"), ("b", "Banana"), ("c", "Cherry")])
    }

    fn tags(&self) -> Vec<String> {
        self.chips
            .chips()
            .iter()
            .filter_map(|value| self.chips.chip_node(value))
            .filter_map(|node| ChipElement::capture(&*self.tree, node))
            .map(|chip| chip.tag)
            .collect()
    }

    fn close_icon(&self, value: &str) -> NodeId {
        let chip = self.chips.chip_node(value).expect("chip is rendered");
        self.tree
            .children(chip)
            .into_iter()
            .find(|&n| self.tree.has_class(n, CLOSE_CLASS))
            .expect("chip has a close icon")
    }

    fn changes(&self) -> usize {
        *self.changes.lock()
    }
}

#[test]
fn test_scenario_a_selection_renders_chips_in_order() {
    let fx = Fixture::new([("a", "Apple"), ("b", "Banana")]);
    assert!(fx.chips.chips().is_empty());

    fx.select.set_selected_values(["a", "b"]);

    assert_eq!(fx.changes(), 1);
    assert_eq!(fx.tags(), vec!["Apple", "Banana"]);
    assert_eq!(fx.recorder.added_values(), vec!["a", "b"]);
}

#[test]
fn test_scenario_b_close_click_deselects_and_renotifies() {
    let fx = Fixture::new([("a", "Apple"), ("b", "Banana")]);
    fx.select.set_selected_values(["a", "b"]);
    assert_eq!(fx.changes(), 1);

    assert!(fx.tree.click(fx.close_icon("a")));

    assert_eq!(fx.select.is_selected("a"), Some(false));
    assert_eq!(fx.changes(), 2);
    assert_eq!(fx.tags(), vec!["Banana"]);
    assert_eq!(fx.recorder.deleted_values(), vec!["a"]);
}

#[test]
fn test_scenario_c_narrow_container_counts_hidden_chips() {
    let fx = Fixture::fruit();
    fx.tree
        .set_client_size(fx.chips.container(), Size::new(100.0, 32.0))
        .unwrap();

    fx.select.set_selected_values(["a", "b", "c"]);

    let expected = OverflowState {
        overflowing: true,
        hidden: 2,
    };
    assert_eq!(fx.chips.overflow(), expected);
    assert!(fx.tree.has_class(fx.chips.container(), "overflown"));
    assert_eq!(fx.tree.text(fx.chips.counter()).as_deref(), Some("2"));
}

#[test]
fn test_scenario_d_chip_without_value_is_ignored() {
    let fx = Fixture::fruit();
    let before = fx.tree.len();

    assert_eq!(fx.chips.add_chip(Chip::tag_only("X")), None);

    assert_eq!(fx.tree.len(), before);
    assert!(fx.recorder.added_values().is_empty());
    assert_eq!(fx.changes(), 0);
}

#[test]
fn test_scenario_e_deleting_missing_chip_is_noop() {
    let fx = Fixture::fruit();
    let before = fx.tree.len();

    assert_eq!(fx.chips.delete_chip("missing"), DeleteOutcome::Unchanged);

    assert_eq!(fx.tree.len(), before);
    assert!(fx.recorder.deleted_values().is_empty());
    assert_eq!(fx.changes(), 0);
}

#[test]
fn test_chips_converge_after_every_mutation() {
    let fx = Fixture::new([
        ("a", "Apple"),
        ("b", "Banana"),
        ("c", "Cherry"),
        ("d", "Date"),
        ("e", "Elderberry"),
    ]);
    let steps: &[&[&str]] = &[
        &["a"],
        &["a", "c", "e"],
        &["c"],
        &[],
        &["b", "d"],
        &["a", "b", "c", "d", "e"],
        &["e"],
    ];

    for step in steps {
        fx.select.set_selected_values(step.iter().copied());
        let mut rendered = fx.chips.chips();
        rendered.sort();
        assert_eq!(rendered, fx.select.selected_values(), "after {step:?}");
    }

    for value in ["a", "b", "c", "d", "e"] {
        fx.select.toggle(value);
        let mut rendered = fx.chips.chips();
        rendered.sort();
        assert_eq!(rendered, fx.select.selected_values(), "after toggling {value}");
    }
}

#[test]
fn test_add_chip_never_duplicates_values() {
    let fx = Fixture::fruit();
    fx.select.select("a");

    let attempts = [
        Chip::new("a", "Apple again"),
        Chip::new("x", "Extra"),
        Chip::new("x", "Extra twice"),
        Chip::new("", "Empty"),
        Chip::new("y", "Yet another"),
        Chip::new("y", "Yet another"),
    ];
    for chip in attempts {
        fx.chips.add_chip(chip);
        let mut values = fx.chips.chips();
        let count = values.len();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), count);
    }
    assert_eq!(fx.chips.chips(), vec!["a", "x", "y"]);
}

#[test]
fn test_overflow_recompute_is_idempotent() {
    let fx = Fixture::fruit();
    fx.tree
        .set_client_size(fx.chips.container(), Size::new(200.0, 32.0))
        .unwrap();
    fx.select.set_selected_values(["a", "b", "c"]);

    let first = fx.chips.recompute_overflow();
    let badge = fx.tree.text(fx.chips.counter());
    let second = fx.chips.recompute_overflow();

    assert_eq!(first, second);
    assert_eq!(badge, fx.tree.text(fx.chips.counter()));
    assert_eq!(first.hidden, 1);
}

#[test]
fn test_deleting_selected_chip_waits_for_change_notification() {
    init_tracing();
    let tree = Arc::new(ElementTree::new());
    let host = tree.create_element(ElementKind::Container);
    let select = Arc::new(MultiSelect::new([("a", "Apple"), ("b", "Banana")]).with_selected(["a", "b"]));

    // Connected before the widget, so it observes the state the notification carries
    let container: Arc<Mutex<Option<NodeId>>> = Arc::new(Mutex::new(None));
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let tree = tree.clone();
        let select_probe = select.clone();
        let container = container.clone();
        let seen = seen.clone();
        select.changed().connect(move |_| {
            let Some(container) = *container.lock() else {
                return;
            };
            let still_rendered = tree
                .children(container)
                .into_iter()
                .any(|n| tree.attribute(n, "data-value").as_deref() == Some("a"));
            seen.lock().push((select_probe.is_selected("a"), still_rendered));
        });
    }

    let recorder = Arc::new(Recorder::default());
    let chips = WithChips::new(select.clone(), tree.clone(), host, recorder.config());
    *container.lock() = Some(chips.container());

    assert_eq!(chips.delete_chip("a"), DeleteOutcome::Deselected);

    assert_eq!(*seen.lock(), vec![(Some(false), true)]);
    assert_eq!(chips.chips(), vec!["b"]);
    assert_eq!(recorder.deleted_values(), vec!["a"]);
}

#[test]
fn test_deleting_unbacked_chip_fires_callback_once() {
    let fx = Fixture::fruit();
    let node = fx.chips.add_chip(Chip::new("x", "Extra").with_image("x.png")).unwrap();

    assert_eq!(fx.chips.delete_chip("x"), DeleteOutcome::Removed);
    assert_eq!(fx.chips.delete_chip("x"), DeleteOutcome::Unchanged);

    let deleted = fx.recorder.deleted.lock().clone();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].node, node);
    assert_eq!(deleted[0].tag, "Extra");
    assert_eq!(deleted[0].image.as_deref(), Some("x.png"));
    assert!(!fx.tree.is_alive(node));
    assert_eq!(fx.changes(), 0);
}

#[test]
fn test_deleting_deselected_option_chip_removes_directly() {
    let fx = Fixture::fruit();
    fx.chips.add_chip(Chip::new("a", "Apple")).unwrap();
    assert_eq!(fx.select.is_selected("a"), Some(false));

    assert_eq!(fx.chips.delete_chip("a"), DeleteOutcome::Removed);
    assert!(fx.chips.chips().is_empty());
    assert_eq!(fx.changes(), 0);
}

#[test]
fn test_manual_chip_after_selection_is_appended() {
    let fx = Fixture::fruit();
    fx.select.select("b");
    fx.chips.add_chip(Chip::new("z", "Zucchini")).unwrap();

    let children = fx.tree.children(fx.chips.container());
    assert_eq!(children[0], fx.chips.counter());
    assert_eq!(fx.chips.chips(), vec!["b", "z"]);

    // Reconciliation removes chips the source does not select
    fx.select.select("c");
    assert_eq!(fx.chips.chips(), vec!["b", "c"]);
    assert_eq!(fx.recorder.deleted_values(), vec!["z"]);
}

#[test]
fn test_callbacks_receive_the_owning_source() {
    init_tracing();
    let tree = Arc::new(ElementTree::new());
    let host = tree.create_element(ElementKind::Container);
    let select = Arc::new(MultiSelect::new([("a", "Apple"), ("b", "Banana")]));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let config = WithChipsConfig::new().with_on_chip_add(move |source: &dyn SelectionSource, chip| {
        seen_clone
            .lock()
            .push((chip.value.clone(), source.selected_values()));
    });
    let _chips = WithChips::new(select.clone(), tree, host, config);

    select.set_selected_values(["a", "b"]);

    assert_eq!(
        *seen.lock(),
        vec![
            ("a".to_string(), vec!["a".to_string(), "b".to_string()]),
            ("b".to_string(), vec!["a".to_string(), "b".to_string()]),
        ]
    );
}

#[test]
fn test_deleting_from_delete_callback_terminates() {
    init_tracing();
    let tree = Arc::new(ElementTree::new());
    let host = tree.create_element(ElementKind::Container);
    let select = Arc::new(
        MultiSelect::new([("a", "Apple"), ("b", "Banana"), ("c", "Cherry")])
            .with_selected(["a", "b", "c"]),
    );

    // Closing one chip closes the next one as well
    let widget: Arc<Mutex<Option<Arc<WithChips>>>> = Arc::new(Mutex::new(None));
    let widget_clone = widget.clone();
    let config = WithChipsConfig::new().with_on_chip_delete(move |_, chip| {
        let next = match chip.value.as_str() {
            "a" => "b",
            "b" => "c",
            _ => return,
        };
        let chips = widget_clone.lock().clone();
        if let Some(chips) = chips {
            chips.delete_chip(next);
        }
    });
    let chips = Arc::new(WithChips::new(select.clone(), tree, host, config));
    *widget.lock() = Some(chips.clone());

    assert_eq!(chips.delete_chip("a"), DeleteOutcome::Deselected);
    assert!(select.selected_values().is_empty());
    assert!(chips.chips().is_empty());

    // Break the cycle
    widget.lock().take();
}
