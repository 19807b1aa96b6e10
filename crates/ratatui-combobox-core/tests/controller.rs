use std::cell::RefCell;
use std::rc::Rc;

use ratatui::layout::Rect;
use ratatui_combobox_core::controller::ChangeMeta;
use ratatui_combobox_core::controller::DropdownAction;
use ratatui_combobox_core::controller::DropdownController;
use ratatui_combobox_core::controller::DropdownOptions;
use ratatui_combobox_core::error::BindingError;
use ratatui_combobox_core::input::InputEvent;
use ratatui_combobox_core::input::KeyCode;
use ratatui_combobox_core::input::KeyEvent;
use ratatui_combobox_core::input::MouseEvent;
use ratatui_combobox_core::keymap::key_char;
use ratatui_combobox_core::keymap::key_ctrl;
use ratatui_combobox_core::listener::ListenerKind;
use ratatui_combobox_core::listener::ListenerRegistry;
use ratatui_combobox_core::option::OptionCatalog;
use ratatui_combobox_core::option::SelectOption;
use ratatui_combobox_core::placement::Placement;
use ratatui_combobox_core::placement::PositionMeasurement;
use ratatui_combobox_core::placement::PositionerState;
use ratatui_combobox_core::schedule::DeferredTask;
use ratatui_combobox_core::selection::ChangeReason;
use ratatui_combobox_core::selection::Selection;
use ratatui_combobox_core::selection::SelectionMode;

type Dropdown = DropdownController<&'static str>;

fn abc() -> OptionCatalog<&'static str> {
    OptionCatalog::new(vec![
        SelectOption::new("a", "Apple"),
        SelectOption::new("b", "Banana").disabled(),
        SelectOption::new("c", "Cherry"),
    ])
    .unwrap()
}

fn fruits() -> OptionCatalog<&'static str> {
    OptionCatalog::new(vec![
        SelectOption::new("apple", "Apple"),
        SelectOption::new("apricot", "Apricot"),
        SelectOption::new("banana", "Banana"),
        SelectOption::new("cherry", "Cherry"),
    ])
    .unwrap()
}

fn searchable() -> DropdownOptions {
    DropdownOptions {
        searchable: true,
        ..Default::default()
    }
}

fn key(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code))
}

fn record(d: &mut Dropdown) -> Rc<RefCell<Vec<(Selection<&'static str>, ChangeReason)>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    d.set_on_change(move |next: &Selection<&'static str>, meta: &ChangeMeta<&'static str>| {
        sink.borrow_mut().push((next.clone(), meta.reason));
    });
    log
}

/// Opens and runs the first frame with the trigger at the top-left of a 40x20 frame.
fn open_and_place(d: &mut Dropdown) {
    let trigger = Rect::new(0, 0, 20, 1);
    let frame = Rect::new(0, 0, 40, 20);
    d.open();
    d.set_layout(trigger, frame);
    d.on_frame(&PositionMeasurement {
        anchor: trigger,
        viewport_height: frame.height,
    });
}

#[test]
fn disabled_option_survives_select_all_on_filtered_view() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Multi(Vec::new()), searchable());
    let log = record(&mut d);
    d.set_focused(true);

    d.open();
    d.set_query("an");
    let labels: Vec<&str> = d.visible().iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["Banana"]);

    d.handle_event(key_ctrl('a').into());
    assert_eq!(d.selection(), &Selection::Multi(Vec::new()));
    assert_eq!(
        log.borrow().as_slice(),
        [(Selection::Multi(Vec::new()), ChangeReason::SelectAll)]
    );
    assert!(d.is_open());
}

#[test]
fn single_reselect_is_idempotent_and_closes() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::single("a"), DropdownOptions::default());
    d.open();

    let action = d.toggle(&"a");
    assert_eq!(
        action,
        DropdownAction::Changed {
            value: Selection::single("a"),
            meta: ChangeMeta {
                reason: ChangeReason::Toggle,
                option: Some(SelectOption::new("a", "Apple")),
            },
            closed: true,
        }
    );
    assert_eq!(d.selection(), &Selection::single("a"));
    assert!(!d.is_open());
}

#[test]
fn bulk_actions_leave_hidden_values_alone() {
    let mut d = Dropdown::uncontrolled(fruits(), Selection::multi(["banana"]), searchable());
    d.open();
    d.set_query("ap");
    assert_eq!(d.visible_len(), 2);

    d.select_all();
    assert_eq!(d.selection(), &Selection::multi(["banana", "apple", "apricot"]));

    d.clear_all();
    assert_eq!(d.selection(), &Selection::multi(["banana"]));
}

#[test]
fn clear_empties_regardless_of_filter() {
    let mut d = Dropdown::uncontrolled(fruits(), Selection::multi(["banana", "apple"]), searchable());
    d.open();
    d.set_query("ch");
    let action = d.clear();
    assert!(matches!(
        action,
        DropdownAction::Changed {
            meta: ChangeMeta {
                reason: ChangeReason::Clear,
                ..
            },
            closed: false,
            ..
        }
    ));
    assert!(d.selection().is_empty());
}

#[test]
fn disabled_options_and_components_are_no_ops() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Multi(Vec::new()), DropdownOptions::default());
    assert_eq!(d.toggle(&"b"), DropdownAction::None);
    assert!(d.selection().is_empty());

    d.set_disabled(true);
    assert_eq!(d.open(), DropdownAction::None);
    assert_eq!(d.toggle(&"a"), DropdownAction::None);
    assert!(d.selection().is_empty());
}

#[test]
fn disabling_an_open_dropdown_closes_it() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    d.open();
    assert_eq!(
        d.set_disabled(true),
        DropdownAction::Closed {
            restore_focus: false
        }
    );
    assert!(!d.listeners_attached());
}

#[test]
fn unknown_values_are_only_accepted_by_multi() {
    let mut multi = Dropdown::uncontrolled(abc(), Selection::Multi(Vec::new()), DropdownOptions::default());
    multi.toggle(&"zzz");
    assert_eq!(multi.selection(), &Selection::multi(["zzz"]));
    assert!(multi.selected_labels().is_empty());

    let mut single = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    assert_eq!(single.toggle(&"zzz"), DropdownAction::None);
}

#[test]
fn arrow_keys_wrap_select_and_enter_closes() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    d.set_focused(true);

    assert_eq!(d.handle_event(key(KeyCode::Down)), DropdownAction::Opened);
    assert_eq!(d.active(), None);

    d.handle_event(key(KeyCode::Down));
    assert_eq!(d.active(), Some(0));
    assert_eq!(d.selection(), &Selection::single("a"));
    d.handle_event(key(KeyCode::Up));
    assert_eq!(d.active(), Some(2));
    assert_eq!(d.selection(), &Selection::single("c"));
    d.handle_event(key(KeyCode::Down));
    assert_eq!(d.active(), Some(0));
    assert!(d.is_open());

    // disabled rows are highlighted but never committed
    assert_eq!(d.handle_event(key(KeyCode::Down)), DropdownAction::Redraw);
    assert_eq!(d.active_option().map(|o| o.value), Some("b"));
    assert_eq!(d.handle_event(key(KeyCode::Enter)), DropdownAction::None);
    assert_eq!(d.selection(), &Selection::single("a"));

    let action = d.handle_event(key(KeyCode::End));
    assert!(matches!(action, DropdownAction::Changed { closed: false, .. }));
    assert_eq!(d.selection(), &Selection::single("c"));

    let action = d.handle_event(key(KeyCode::Enter));
    assert!(matches!(action, DropdownAction::Changed { closed: true, .. }));
    assert_eq!(d.selection(), &Selection::single("c"));
    assert!(!d.is_open());
}

#[test]
fn arrowing_commits_and_escape_keeps_the_value() {
    let catalog = OptionCatalog::new(vec![
        SelectOption::new("a", "Apple"),
        SelectOption::new("c", "Cherry"),
        SelectOption::new("d", "Date"),
    ])
    .unwrap();
    let mut d = Dropdown::uncontrolled(catalog, Selection::single("a"), DropdownOptions::default());
    let log = record(&mut d);
    d.set_focused(true);

    d.handle_event(key(KeyCode::Enter));
    assert_eq!(d.active(), Some(0));
    assert!(log.borrow().is_empty());

    let action = d.handle_event(key(KeyCode::Down));
    assert_eq!(
        action,
        DropdownAction::Changed {
            value: Selection::single("c"),
            meta: ChangeMeta {
                reason: ChangeReason::Toggle,
                option: Some(SelectOption::new("c", "Cherry")),
            },
            closed: false,
        }
    );
    assert_eq!(d.active(), Some(1));
    assert_eq!(d.selection(), &Selection::single("c"));
    assert_eq!(
        log.borrow().as_slice(),
        [(Selection::single("c"), ChangeReason::Toggle)]
    );
    assert!(d.is_open());

    d.handle_event(key(KeyCode::Esc));
    assert!(!d.is_open());
    assert_eq!(d.selection(), &Selection::single("c"));
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn arrowing_a_controlled_dropdown_only_reports() {
    let mut d = Dropdown::controlled(abc(), Selection::single("a"), DropdownOptions::default());
    let log = record(&mut d);
    d.set_focused(true);

    d.handle_event(key(KeyCode::Enter));
    d.handle_event(key(KeyCode::End));
    assert_eq!(d.active(), Some(2));
    assert_eq!(d.selection(), &Selection::single("a"));
    assert_eq!(log.borrow()[0].0, Selection::single("c"));
}

#[test]
fn reopening_seeds_active_from_selection() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::single("c"), DropdownOptions::default());
    d.set_focused(true);
    d.handle_event(key(KeyCode::Enter));
    assert_eq!(d.active(), Some(2));
    d.handle_event(key(KeyCode::Down));
    assert_eq!(d.active(), Some(0));
}

#[test]
fn escape_closes_clears_query_and_restores_focus() {
    let mut d = Dropdown::uncontrolled(fruits(), Selection::Single(None), searchable());
    d.set_focused(true);
    d.handle_event(key(KeyCode::Enter));
    d.handle_event(key_char('c').into());
    d.handle_event(InputEvent::Paste("he".to_string()));
    assert_eq!(d.query(), "che");
    assert_eq!(d.visible_len(), 1);

    d.handle_event(key(KeyCode::Backspace));
    assert_eq!(d.query(), "ch");

    assert_eq!(
        d.handle_event(key(KeyCode::Esc)),
        DropdownAction::Closed {
            restore_focus: true
        }
    );
    assert_eq!(d.query(), "");
    assert_eq!(d.visible_len(), 4);

    d.open();
    assert_eq!(d.query(), "");
}

#[test]
fn keys_are_ignored_without_focus() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    assert_eq!(d.handle_event(key(KeyCode::Enter)), DropdownAction::None);
    assert!(!d.is_open());
}

#[test]
fn uncontrolled_value_persists_across_renders() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    d.toggle(&"c");
    for _ in 0..3 {
        d.sync_value(None).unwrap();
    }
    assert_eq!(d.selection(), &Selection::single("c"));

    let err = d.sync_value(Some(Selection::single("a"))).unwrap_err();
    assert!(matches!(err, BindingError::ModeSwitch { .. }));
    assert_eq!(d.selection(), &Selection::single("c"));
}

#[test]
fn controlled_value_only_changes_through_sync() {
    let mut d = Dropdown::controlled(abc(), Selection::Single(None), DropdownOptions::default());
    let log = record(&mut d);

    d.open();
    d.toggle(&"a");
    assert_eq!(d.selection(), &Selection::Single(None));
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].0, Selection::single("a"));

    d.sync_value(Some(Selection::single("a"))).unwrap();
    assert_eq!(d.selection(), &Selection::single("a"));

    assert!(matches!(
        d.sync_value(None),
        Err(BindingError::ModeSwitch { .. })
    ));
    assert!(matches!(
        d.sync_value(Some(Selection::Multi(vec!["a"]))),
        Err(BindingError::ShapeMismatch {
            expected: SelectionMode::Single,
            got: SelectionMode::Multi,
        })
    ));
    assert_eq!(d.selection(), &Selection::single("a"));
}

#[test]
fn placement_is_decided_on_the_next_frame() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    let trigger = Rect::new(0, 400, 20, 1);
    let frame = Rect::new(0, 0, 80, 501);

    d.open();
    assert_eq!(d.positioner_state(), PositionerState::Measuring);
    assert!(d.has_pending(DeferredTask::MeasurePlacement));
    assert_eq!(d.set_layout(trigger, frame), None);

    let action = d.on_frame(&PositionMeasurement {
        anchor: trigger,
        viewport_height: frame.height,
    });
    assert_eq!(action, DropdownAction::Redraw);
    assert_eq!(d.placement(), Some(Placement::Above));
    assert_eq!(d.positioner_state(), PositionerState::Placed(Placement::Above));
    let layout = d.panel_layout().copied().unwrap();
    assert_eq!(layout.panel.bottom(), trigger.top());

    d.close();
    assert_eq!(d.positioner_state(), PositionerState::Idle);
    assert!(d.panel_layout().is_none());
}

#[test]
fn enough_room_below_stays_below() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    let trigger = Rect::new(0, 400, 20, 1);
    d.open();
    d.set_layout(trigger, Rect::new(0, 0, 80, 701));
    d.on_frame(&PositionMeasurement {
        anchor: trigger,
        viewport_height: 701,
    });
    assert_eq!(d.placement(), Some(Placement::Below));
}

#[test]
fn filtering_while_open_requests_a_new_measurement() {
    let mut d = Dropdown::uncontrolled(fruits(), Selection::Single(None), searchable());
    open_and_place(&mut d);
    assert!(!d.has_pending(DeferredTask::MeasurePlacement));

    d.set_query("ap");
    assert!(d.has_pending(DeferredTask::MeasurePlacement));
    assert!(d.panel_layout().is_some());
}

#[test]
fn stale_tasks_from_an_earlier_session_are_dropped() {
    let mut d = Dropdown::uncontrolled(fruits(), Selection::Single(None), searchable());
    d.open();
    d.close();
    assert_eq!(d.run_deferred(), DropdownAction::None);
    assert!(!d.is_search_focused());

    d.open();
    assert_eq!(d.run_deferred(), DropdownAction::FocusSearch);
    assert!(d.is_search_focused());
}

#[test]
fn closing_drops_the_pending_measurement() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    d.open();
    assert!(d.has_pending(DeferredTask::MeasurePlacement));

    d.close();
    assert!(!d.has_pending(DeferredTask::MeasurePlacement));
    assert_eq!(
        d.on_frame(&PositionMeasurement {
            anchor: Rect::new(0, 0, 20, 1),
            viewport_height: 24,
        }),
        DropdownAction::None
    );
    assert_eq!(d.positioner_state(), PositionerState::Idle);
    assert_eq!(d.placement(), None);
    assert!(d.panel_layout().is_none());

    assert_eq!(d.open(), DropdownAction::Opened);
    assert_eq!(d.positioner_state(), PositionerState::Measuring);
}

#[test]
fn open_and_close_cycles_do_not_pile_up_tasks() {
    let mut d = Dropdown::uncontrolled(fruits(), Selection::Single(None), searchable());
    for _ in 0..5 {
        d.open();
        d.close();
    }
    assert!(!d.has_pending(DeferredTask::MeasurePlacement));
    assert!(!d.has_pending(DeferredTask::FocusSearch));
}

#[test]
fn key_listener_is_held_only_while_open() {
    let registry = ListenerRegistry::new();
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default())
        .with_registry(registry.clone());
    d.set_focused(true);
    assert_eq!(registry.count(ListenerKind::KeyDown), 0);

    d.handle_event(key(KeyCode::Enter));
    assert_eq!(registry.count(ListenerKind::KeyDown), 1);
    d.handle_event(key(KeyCode::Down));
    assert_eq!(d.active(), Some(0));

    d.handle_event(key(KeyCode::Esc));
    assert_eq!(registry.count(ListenerKind::KeyDown), 0);
    assert_eq!(d.handle_event(key(KeyCode::Up)), DropdownAction::None);
    assert_eq!(d.active(), None);
}

#[test]
fn dispatch_runs_deferred_focus_after_the_event() {
    let mut d = Dropdown::uncontrolled(fruits(), Selection::Single(None), searchable());
    d.set_focused(true);

    assert_eq!(d.dispatch(key(KeyCode::Enter)), DropdownAction::Opened);
    assert!(d.is_search_focused());
    assert!(!d.has_pending(DeferredTask::FocusSearch));

    d.close();
    d.open();
    assert_eq!(d.dispatch(key_ctrl('z').into()), DropdownAction::FocusSearch);
    assert!(d.is_search_focused());
}

#[test]
fn unmount_releases_listeners_and_cancels_work() {
    let registry = ListenerRegistry::new();
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), searchable())
        .with_registry(registry.clone());
    d.open();
    assert_eq!(registry.count(ListenerKind::PointerDown), 1);
    assert_eq!(registry.count(ListenerKind::KeyDown), 1);

    d.unmount();
    assert_eq!(registry.count(ListenerKind::PointerDown), 0);
    assert_eq!(registry.count(ListenerKind::KeyDown), 0);
    assert_eq!(
        d.on_frame(&PositionMeasurement {
            anchor: Rect::new(0, 0, 10, 1),
            viewport_height: 24,
        }),
        DropdownAction::None
    );
    assert_eq!(d.run_deferred(), DropdownAction::None);
    assert_eq!(d.open(), DropdownAction::None);
}

#[test]
fn dropping_the_controller_releases_listeners() {
    let registry = ListenerRegistry::new();
    {
        let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default())
            .with_registry(registry.clone());
        d.open();
        assert_eq!(registry.count(ListenerKind::PointerDown), 1);
    }
    assert_eq!(registry.count(ListenerKind::PointerDown), 0);
}

#[test]
fn outside_click_dismisses_and_inside_click_toggles() {
    let registry = ListenerRegistry::new();
    let mut d = Dropdown::uncontrolled(abc(), Selection::Multi(Vec::new()), DropdownOptions::default())
        .with_registry(registry.clone());
    open_and_place(&mut d);

    // panel (0,1,20,6): border, header line at y=2, rows at y=3..6
    let layout = d.panel_layout().copied().unwrap();
    assert_eq!(layout.placement, Placement::Below);
    assert_eq!(layout.rows, Rect::new(1, 3, 18, 3));

    d.handle_event(MouseEvent::down(5, 5).into());
    assert_eq!(d.selection(), &Selection::multi(["c"]));
    assert!(d.is_open());

    d.handle_event(MouseEvent::down(2, 2).into());
    assert_eq!(d.selection(), &Selection::multi(["c", "a"]));

    d.handle_event(MouseEvent::down(15, 2).into());
    assert!(d.selection().is_empty());

    let action = d.handle_event(MouseEvent::down(35, 15).into());
    assert_eq!(
        action,
        DropdownAction::Closed {
            restore_focus: false
        }
    );
    assert_eq!(registry.count(ListenerKind::PointerDown), 0);
}

#[test]
fn trigger_click_toggles_open() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    d.set_layout(Rect::new(0, 0, 20, 1), Rect::new(0, 0, 40, 20));
    assert_eq!(d.handle_event(MouseEvent::down(3, 0).into()), DropdownAction::Opened);
    assert!(d.is_focused());
    assert!(matches!(
        d.handle_event(MouseEvent::down(3, 0).into()),
        DropdownAction::Closed { .. }
    ));
}

#[test]
fn dropdowns_sharing_a_registry_do_not_interfere() {
    let registry = ListenerRegistry::new();
    let mut left = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default())
        .with_registry(registry.clone());
    let mut right = Dropdown::uncontrolled(abc(), Selection::single("a"), DropdownOptions::default())
        .with_registry(registry.clone());

    left.open();
    right.open();
    assert_eq!(registry.count(ListenerKind::PointerDown), 2);

    left.toggle(&"c");
    assert!(!left.is_open());
    assert!(right.is_open());
    assert_eq!(right.selection(), &Selection::single("a"));
    assert_eq!(registry.count(ListenerKind::PointerDown), 1);
}

#[test]
fn replacing_the_catalog_refilters() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::Single(None), searchable());
    let same = d.catalog().clone();
    assert_eq!(d.set_catalog(same), DropdownAction::None);

    d.open();
    d.set_query("ap");
    assert_eq!(d.visible_len(), 1);
    assert_eq!(d.set_catalog(fruits()), DropdownAction::Redraw);
    assert_eq!(d.visible_len(), 2);
}

#[test]
fn semantics_follow_open_state() {
    let mut d = Dropdown::uncontrolled(abc(), Selection::multi(["a"]), DropdownOptions::default());
    let closed = d.semantics();
    assert!(!closed.trigger.expanded);
    assert!(closed.listbox.is_none());

    d.open();
    let open = d.semantics();
    assert!(open.trigger.expanded);
    assert!(open.listbox.is_some_and(|l| l.multiselectable));
    let selected: Vec<bool> = open.options.iter().map(|o| o.selected).collect();
    assert_eq!(selected, [true, false, false]);
    assert!(open.options[1].disabled);
}

#[test]
fn form_field_mirrors_selection() {
    let options = DropdownOptions {
        name: Some("fruit".to_string()),
        ..Default::default()
    };
    let mut d = Dropdown::uncontrolled(abc(), Selection::Multi(Vec::new()), options);
    assert_eq!(d.form_field().map(|f| f.value), Some("[]".to_string()));
    d.toggle(&"a");
    d.toggle(&"c");
    assert_eq!(d.form_field().map(|f| f.value), Some(r#"["a","c"]"#.to_string()));

    let unnamed = Dropdown::uncontrolled(abc(), Selection::Single(None), DropdownOptions::default());
    assert!(unnamed.form_field().is_none());
}

#[test]
fn debug_output_names_mode_and_binding() {
    let d = Dropdown::controlled(abc(), Selection::Multi(Vec::new()), DropdownOptions::default());
    let out = format!("{d:?}");
    assert!(out.starts_with("DropdownController"));
    assert!(out.contains("mode: Multi"));
    assert!(out.contains("binding: Controlled"));
}
