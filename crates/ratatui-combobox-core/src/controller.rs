//! The open/close lifecycle shared by every dropdown front-end.
//!
//! A [`DropdownController`] ties together filtering, selection, value binding, placement,
//! keyboard navigation and outside-click dismissal. It never draws; front-ends read its
//! state (`visible()`, `active()`, `panel_layout()`, ...) when rendering.
//!
//! ## Driving it
//!
//! ```ignore
//! // every input event
//! let action = dropdown.handle_event(ev);
//! dropdown.run_deferred();
//!
//! // every frame
//! dropdown.set_layout(trigger_area, frame_area);
//! dropdown.on_frame(&PositionMeasurement { anchor: trigger_area, viewport_height: frame_area.height });
//! ```
//!
//! Each mutation is reported twice: through the optional `on_change` callback (synchronously,
//! before the method returns) and through the returned [`DropdownAction`].

use std::fmt;
use std::fmt::Display;

use ratatui::layout::Rect;
use tracing::debug;
use tracing::trace;

use crate::a11y::ListboxSemantics;
use crate::a11y::OptionSemantics;
use crate::a11y::Popup;
use crate::a11y::Role;
use crate::a11y::Semantics;
use crate::a11y::TriggerSemantics;
use crate::binding::BindingMode;
use crate::binding::ValueBinding;
use crate::dismissal::DismissalWatcher;
use crate::error::BindingError;
use crate::filter;
use crate::form::FormField;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap::DropdownBindings;
use crate::keymap::DropdownCommand;
use crate::layout::PanelLayout;
use crate::layout::PanelShape;
use crate::listener::ListenerKind;
use crate::listener::ListenerRegistry;
use crate::listener::Subscription;
use crate::listener::contains;
use crate::navigator::KeyboardNavigator;
use crate::navigator::NavOutcome;
use crate::option::OptionCatalog;
use crate::option::SelectOption;
use crate::placement::MeasureAnchor;
use crate::placement::Placement;
use crate::placement::PlacementOptions;
use crate::placement::PositionerState;
use crate::placement::ViewportPositioner;
use crate::schedule::Deferral;
use crate::schedule::DeferredTask;
use crate::schedule::SessionId;
use crate::schedule::TaskQueue;
use crate::scroll::ListScroll;
use crate::selection::ChangeReason;
use crate::selection::Selection;
use crate::selection::SelectionMode;

#[derive(Clone, Debug)]
pub struct DropdownOptions {
    pub searchable: bool,
    pub disabled: bool,
    pub placeholder: String,
    pub search_placeholder: String,
    pub empty_text: String,
    /// Hidden form field name; `None` disables the form mirror.
    pub name: Option<String>,
    pub max_visible_rows: u16,
    pub placement: PlacementOptions,
    pub bindings: DropdownBindings,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            searchable: false,
            disabled: false,
            placeholder: "Select...".to_string(),
            search_placeholder: "Search...".to_string(),
            empty_text: "No options found".to_string(),
            name: None,
            max_visible_rows: 8,
            placement: PlacementOptions::default(),
            bindings: DropdownBindings::default(),
        }
    }
}

/// Context passed along with every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeMeta<V> {
    pub reason: ChangeReason,
    /// The option that was toggled, for [`ChangeReason::Toggle`].
    pub option: Option<SelectOption<V>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropdownAction<V> {
    None,
    Redraw,
    Opened,
    Closed {
        /// Focus should go back to the trigger (keyboard close).
        restore_focus: bool,
    },
    Changed {
        value: Selection<V>,
        meta: ChangeMeta<V>,
        /// The change also closed the panel.
        closed: bool,
    },
    /// The search field is now the focus target.
    FocusSearch,
}

impl<V> DropdownAction<V> {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, DropdownAction::None)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenSession {
    pub id: SessionId,
    pub query: String,
    pub placement: Placement,
    /// Whether the first measurement has run; the panel is not laid out before that.
    pub placed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OpenState {
    #[default]
    Closed,
    Open(OpenSession),
}

pub type ChangeCallback<V> = Box<dyn FnMut(&Selection<V>, &ChangeMeta<V>)>;

/// Listener subscriptions held while the panel is open.
#[derive(Debug)]
struct OpenListeners {
    dismissal: DismissalWatcher,
    keys: Subscription,
}

pub struct DropdownController<V> {
    options: DropdownOptions,
    catalog: OptionCatalog<V>,
    binding: ValueBinding<V>,
    state: OpenState,
    visible: Vec<usize>,
    active: Option<usize>,
    scroll: ListScroll,
    positioner: ViewportPositioner,
    navigator: KeyboardNavigator,
    registry: ListenerRegistry,
    listeners: Option<OpenListeners>,
    tasks: TaskQueue,
    sessions: u64,
    focused: bool,
    search_focused: bool,
    mounted: bool,
    trigger: Rect,
    frame: Rect,
    layout: Option<PanelLayout>,
    on_change: Option<ChangeCallback<V>>,
}

impl<V: fmt::Debug> fmt::Debug for DropdownController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownController")
            .field("mode", &self.binding.selection_mode())
            .field("binding", &self.binding.mode())
            .field("state", &self.state)
            .field("visible", &self.visible.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl<V: Clone + PartialEq> DropdownController<V> {
    pub fn new(catalog: OptionCatalog<V>, binding: ValueBinding<V>, options: DropdownOptions) -> Self {
        let visible = (0..catalog.len()).collect::<Vec<_>>();
        let scroll = ListScroll {
            len: visible.len(),
            ..ListScroll::default()
        };
        Self {
            positioner: ViewportPositioner::new(options.placement),
            navigator: KeyboardNavigator::new(options.bindings.clone()),
            options,
            catalog,
            binding,
            state: OpenState::Closed,
            visible,
            active: None,
            scroll,
            registry: ListenerRegistry::new(),
            listeners: None,
            tasks: TaskQueue::new(),
            sessions: 0,
            focused: false,
            search_focused: false,
            mounted: true,
            trigger: Rect::default(),
            frame: Rect::default(),
            layout: None,
            on_change: None,
        }
    }

    /// Uncontrolled: the controller owns the value, starting from `default_value`.
    pub fn uncontrolled(
        catalog: OptionCatalog<V>,
        default_value: Selection<V>,
        options: DropdownOptions,
    ) -> Self {
        Self::new(catalog, ValueBinding::uncontrolled(default_value), options)
    }

    /// Controlled: the caller owns the value and must [`sync_value`](Self::sync_value) it.
    pub fn controlled(catalog: OptionCatalog<V>, value: Selection<V>, options: DropdownOptions) -> Self {
        Self::new(catalog, ValueBinding::controlled(value), options)
    }

    /// Replaces the value binding. Meant for builders, before the controller is first used.
    pub fn with_binding(mut self, binding: ValueBinding<V>) -> Self {
        self.binding = binding;
        self.active = None;
        self
    }

    /// Shares a listener registry with other dropdowns of the same frame.
    pub fn with_registry(mut self, registry: ListenerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn set_on_change(&mut self, f: impl FnMut(&Selection<V>, &ChangeMeta<V>) + 'static) {
        self.on_change = Some(Box::new(f));
    }

    // ---- state accessors ----

    pub fn options(&self) -> &DropdownOptions {
        &self.options
    }

    pub fn catalog(&self) -> &OptionCatalog<V> {
        &self.catalog
    }

    pub fn mode(&self) -> SelectionMode {
        self.binding.selection_mode()
    }

    pub fn binding_mode(&self) -> BindingMode {
        self.binding.mode()
    }

    pub fn selection(&self) -> &Selection<V> {
        self.binding.current()
    }

    pub fn state(&self) -> &OpenState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, OpenState::Open(_))
    }

    pub fn is_disabled(&self) -> bool {
        self.options.disabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn query(&self) -> &str {
        match &self.state {
            OpenState::Open(s) => &s.query,
            OpenState::Closed => "",
        }
    }

    pub fn placement(&self) -> Option<Placement> {
        match &self.state {
            OpenState::Open(s) => Some(s.placement),
            OpenState::Closed => None,
        }
    }

    pub fn positioner_state(&self) -> PositionerState {
        self.positioner.state()
    }

    /// Visible (filtered) options, in catalog order.
    pub fn visible(&self) -> Vec<&SelectOption<V>> {
        self.visible.iter().map(|&i| &self.catalog[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Index of the active option within [`visible`](Self::visible).
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_option(&self) -> Option<&SelectOption<V>> {
        self.active
            .and_then(|i| self.visible.get(i))
            .map(|&ci| &self.catalog[ci])
    }

    pub fn scroll(&self) -> &ListScroll {
        &self.scroll
    }

    pub fn panel_layout(&self) -> Option<&PanelLayout> {
        self.layout.as_ref()
    }

    pub fn is_selected(&self, value: &V) -> bool {
        self.selection().contains(value)
    }

    /// Whether pointer/key listeners are currently registered.
    pub fn listeners_attached(&self) -> bool {
        self.listeners.is_some()
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn has_pending(&self, task: DeferredTask) -> bool {
        self.tasks.is_pending(task)
    }

    /// Labels of the selected values, in selection order. Values missing from the catalog
    /// are skipped.
    pub fn selected_labels(&self) -> Vec<&str> {
        self.selection()
            .values()
            .iter()
            .filter_map(|v| self.catalog.label_of(v))
            .collect()
    }

    // ---- configuration coming from the owner ----

    /// Applies the external value of one render. See [`ValueBinding::sync`].
    pub fn sync_value(&mut self, external: Option<Selection<V>>) -> Result<(), BindingError> {
        let before = self.selection().clone();
        self.binding.sync(external)?;
        if *self.selection() != before && self.is_open() {
            self.seed_active();
        }
        Ok(())
    }

    /// Replaces the catalog. The same catalog (same revision) is a no-op.
    pub fn set_catalog(&mut self, catalog: OptionCatalog<V>) -> DropdownAction<V> {
        if catalog.revision() == self.catalog.revision() {
            return DropdownAction::None;
        }
        debug!(
            from = self.catalog.revision(),
            to = catalog.revision(),
            options = catalog.len(),
            "dropdown catalog replaced"
        );
        self.catalog = catalog;
        self.refilter();
        if self.is_open() {
            self.seed_active();
        }
        DropdownAction::Redraw
    }

    /// Disabling an open dropdown closes it.
    pub fn set_disabled(&mut self, disabled: bool) -> DropdownAction<V> {
        self.options.disabled = disabled;
        if disabled && self.is_open() {
            return self.close_with(false);
        }
        DropdownAction::None
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.search_focused = false;
        }
    }

    pub fn set_placement_options(&mut self, placement: PlacementOptions) {
        self.options.placement = placement;
        self.positioner.set_options(placement);
    }

    // ---- lifecycle ----

    pub fn open(&mut self) -> DropdownAction<V> {
        if self.options.disabled || !self.mounted {
            trace!("open ignored: dropdown disabled or unmounted");
            return DropdownAction::None;
        }
        if self.is_open() {
            return DropdownAction::None;
        }

        self.sessions += 1;
        let id = SessionId(self.sessions);
        self.state = OpenState::Open(OpenSession {
            id,
            query: String::new(),
            placement: Placement::default(),
            placed: false,
        });
        self.refilter();
        self.scroll.reset();
        self.seed_active();

        self.positioner.begin();
        self.tasks
            .schedule(id, Deferral::NextFrame, DeferredTask::MeasurePlacement);
        if self.options.searchable {
            self.tasks
                .schedule(id, Deferral::Macrotask, DeferredTask::FocusSearch);
        }

        let root = self.root();
        self.listeners = Some(OpenListeners {
            dismissal: DismissalWatcher::attach(&self.registry, root),
            keys: self.registry.subscribe(ListenerKind::KeyDown, root),
        });
        debug!(session = id.0, visible = self.visible.len(), "dropdown opened");
        DropdownAction::Opened
    }

    pub fn close(&mut self) -> DropdownAction<V> {
        self.close_with(false)
    }

    pub fn toggle_open(&mut self) -> DropdownAction<V> {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Releases listeners and turns every pending task into a no-op. Dropping the controller
    /// has the same effect.
    pub fn unmount(&mut self) {
        self.close_with(false);
        self.mounted = false;
    }

    fn close_with(&mut self, restore_focus: bool) -> DropdownAction<V> {
        let OpenState::Open(session) = std::mem::take(&mut self.state) else {
            return DropdownAction::None;
        };
        self.listeners = None;
        self.tasks.cancel_session(session.id);
        self.positioner.reset();
        self.layout = None;
        self.active = None;
        self.search_focused = false;
        self.scroll.reset();
        self.refilter();
        debug!(session = session.id.0, restore_focus, "dropdown closed");
        DropdownAction::Closed { restore_focus }
    }

    /// Runs next-frame work: the pending placement measurement, if still relevant.
    pub fn on_frame(&mut self, anchor: &dyn MeasureAnchor) -> DropdownAction<V> {
        let mut applied = false;
        for task in self.tasks.take_due(Deferral::NextFrame) {
            if !self.is_live(task.session) {
                trace!(?task, "dropping stale deferred task");
                continue;
            }
            if task.task == DeferredTask::MeasurePlacement {
                let placement = self.positioner.place(anchor, self.visible.len());
                if let OpenState::Open(s) = &mut self.state {
                    s.placement = placement;
                    s.placed = true;
                }
                self.relayout();
                applied = true;
            }
        }
        if applied {
            DropdownAction::Redraw
        } else {
            DropdownAction::None
        }
    }

    /// Runs macrotask work: focusing the search field after the panel exists.
    pub fn run_deferred(&mut self) -> DropdownAction<V> {
        let mut action = DropdownAction::None;
        for task in self.tasks.take_due(Deferral::Macrotask) {
            if !self.is_live(task.session) {
                trace!(?task, "dropping stale deferred task");
                continue;
            }
            if task.task == DeferredTask::FocusSearch {
                self.search_focused = true;
                action = DropdownAction::FocusSearch;
            }
        }
        action
    }

    /// Handles `event`, then runs the macrotask work it queued.
    ///
    /// Returns the event's own action, or the deferred one when the event did nothing. A
    /// search focus that follows [`DropdownAction::Opened`] is therefore not reported here;
    /// [`DropdownController::is_search_focused`] is the source of truth for it.
    pub fn dispatch(&mut self, event: InputEvent) -> DropdownAction<V> {
        let action = self.handle_event(event);
        let deferred = self.run_deferred();
        if action.needs_redraw() { action } else { deferred }
    }

    /// Records where the trigger was drawn and how large the frame is. While open this also
    /// lays out the panel and moves the dismissal root along.
    pub fn set_layout(&mut self, trigger: Rect, frame: Rect) -> Option<PanelLayout> {
        self.trigger = trigger;
        self.frame = frame;
        self.relayout();
        self.layout
    }

    // ---- selection ----

    /// Toggles the option with `value`.
    ///
    /// Values missing from the catalog are accepted by multi selection as-is; single
    /// selection ignores them.
    pub fn toggle(&mut self, value: &V) -> DropdownAction<V> {
        match self.catalog.find(value).cloned() {
            Some(opt) => self.toggle_option(&opt),
            None if self.mode() == SelectionMode::Multi => {
                let opt = SelectOption {
                    value: value.clone(),
                    label: String::new(),
                    disabled: false,
                };
                self.toggle_option(&opt)
            }
            None => DropdownAction::None,
        }
    }

    /// Toggles the visible option at `index`.
    pub fn toggle_visible(&mut self, index: usize) -> DropdownAction<V> {
        let Some(opt) = self.visible.get(index).map(|&ci| self.catalog[ci].clone()) else {
            return DropdownAction::None;
        };
        self.toggle_option(&opt)
    }

    fn toggle_option(&mut self, opt: &SelectOption<V>) -> DropdownAction<V> {
        if self.options.disabled {
            return DropdownAction::None;
        }
        let Some(update) = self.selection().toggled(opt) else {
            trace!("toggle ignored: option disabled");
            return DropdownAction::None;
        };
        let meta = ChangeMeta {
            reason: ChangeReason::Toggle,
            option: Some(opt.clone()),
        };
        self.apply_change(update.next, meta, update.close)
    }

    /// Adds every enabled visible option (multi only).
    pub fn select_all(&mut self) -> DropdownAction<V> {
        if self.options.disabled {
            return DropdownAction::None;
        }
        let next = self.selection().with_all_selected(&self.visible());
        match next {
            Some(next) => self.apply_bulk(next, ChangeReason::SelectAll),
            None => DropdownAction::None,
        }
    }

    /// Removes every visible option, disabled ones included (multi only).
    pub fn clear_all(&mut self) -> DropdownAction<V> {
        if self.options.disabled {
            return DropdownAction::None;
        }
        let next = self.selection().with_all_cleared(&self.visible());
        match next {
            Some(next) => self.apply_bulk(next, ChangeReason::ClearAll),
            None => DropdownAction::None,
        }
    }

    /// Empties the selection regardless of the current filter.
    pub fn clear(&mut self) -> DropdownAction<V> {
        if self.options.disabled {
            return DropdownAction::None;
        }
        let next = self.selection().cleared();
        self.apply_bulk(next, ChangeReason::Clear)
    }

    fn apply_bulk(&mut self, next: Selection<V>, reason: ChangeReason) -> DropdownAction<V> {
        let meta = ChangeMeta {
            reason,
            option: None,
        };
        self.apply_change(next, meta, false)
    }

    fn apply_change(
        &mut self,
        next: Selection<V>,
        meta: ChangeMeta<V>,
        close: bool,
    ) -> DropdownAction<V> {
        let committed = self.binding.commit(&next);
        debug!(
            reason = ?meta.reason,
            selected = next.len(),
            committed,
            close,
            "dropdown selection change requested"
        );
        if let Some(cb) = self.on_change.as_mut() {
            cb(&next, &meta);
        }
        let closed = close && self.is_open();
        if closed {
            self.close_with(false);
        }
        DropdownAction::Changed {
            value: next,
            meta,
            closed,
        }
    }

    // ---- search ----

    /// Replaces the query. Ignored while closed or when search is off.
    pub fn set_query(&mut self, query: impl Into<String>) -> DropdownAction<V> {
        if !self.options.searchable {
            return DropdownAction::None;
        }
        let OpenState::Open(session) = &mut self.state else {
            return DropdownAction::None;
        };
        let query = query.into();
        if session.query == query {
            return DropdownAction::None;
        }
        session.query = query;
        self.refilter();
        self.seed_active();
        DropdownAction::Redraw
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) -> DropdownAction<V> {
        let mut query = self.query().to_string();
        edit(&mut query);
        self.set_query(query)
    }

    // ---- input ----

    pub fn handle_event(&mut self, event: InputEvent) -> DropdownAction<V> {
        if self.options.disabled {
            return DropdownAction::None;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => {
                if !self.focused || !self.is_open() {
                    return DropdownAction::None;
                }
                let text: String = text.chars().filter(|c| !c.is_control()).collect();
                self.edit_query(|q| q.push_str(&text))
            }
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> DropdownAction<V> {
        if !self.focused {
            return DropdownAction::None;
        }
        if !self.is_open() {
            return match self.options.bindings.command_for(&key, false) {
                Some(DropdownCommand::Open) => self.open(),
                _ => DropdownAction::None,
            };
        }
        if !self.listening_for_keys() {
            trace!(?key, "key ignored: no key listener attached");
            return DropdownAction::None;
        }

        let outcome = self
            .navigator
            .resolve(&key, self.mode(), self.active, self.visible.len());
        trace!(?key, ?outcome, "dropdown key");
        match outcome {
            NavOutcome::Close => self.close_with(true),
            NavOutcome::Activate(i) => self.activate(i),
            NavOutcome::Confirm(i) => self.toggle_visible(i),
            NavOutcome::SelectAll => self.select_all(),
            NavOutcome::ClearAll => self.clear_all(),
            NavOutcome::Unhandled => self.handle_search_key(&key),
        }
    }

    /// Moves the active option. In single mode the active option is the selection, so an
    /// enabled row is committed without closing; disabled rows are only highlighted.
    fn activate(&mut self, index: usize) -> DropdownAction<V> {
        self.active = Some(index);
        self.scroll.ensure_visible(index);
        if self.mode() != SelectionMode::Single {
            return DropdownAction::Redraw;
        }
        let Some(opt) = self.visible.get(index).map(|&ci| self.catalog[ci].clone()) else {
            return DropdownAction::Redraw;
        };
        if opt.disabled || self.selection().contains(&opt.value) {
            return DropdownAction::Redraw;
        }
        let next = Selection::single(opt.value.clone());
        let meta = ChangeMeta {
            reason: ChangeReason::Toggle,
            option: Some(opt),
        };
        self.apply_change(next, meta, false)
    }

    fn listening_for_keys(&self) -> bool {
        self.listeners
            .as_ref()
            .is_some_and(|l| l.keys.kind() == ListenerKind::KeyDown)
    }

    fn handle_search_key(&mut self, key: &KeyEvent) -> DropdownAction<V> {
        if !self.options.searchable {
            return DropdownAction::None;
        }
        if let Some(c) = key.text_char() {
            return self.edit_query(|q| q.push(c));
        }
        match key.code {
            KeyCode::Backspace if key.modifiers.is_text() => self.edit_query(|q| {
                q.pop();
            }),
            _ => DropdownAction::None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> DropdownAction<V> {
        let pos = mouse.position();
        if !self.is_open() {
            if mouse.is_primary_down() && contains(self.trigger, pos) {
                self.focused = true;
                return self.open();
            }
            return DropdownAction::None;
        }

        let outside = self
            .listeners
            .as_ref()
            .is_some_and(|l| l.dismissal.should_dismiss(&mouse));
        if outside {
            return self.close_with(false);
        }

        let Some(layout) = self.layout else {
            if mouse.is_primary_down() && contains(self.trigger, pos) {
                return self.close_with(true);
            }
            return DropdownAction::None;
        };

        match mouse.kind {
            MouseEventKind::ScrollDown if layout.contains(pos) => {
                self.scroll.scroll_by(1);
                DropdownAction::Redraw
            }
            MouseEventKind::ScrollUp if layout.contains(pos) => {
                self.scroll.scroll_by(-1);
                DropdownAction::Redraw
            }
            _ if !mouse.is_primary_down() => DropdownAction::None,
            _ if contains(self.trigger, pos) => self.close_with(true),
            _ if layout.header_contains(pos) => self.handle_header_click(&layout, pos.x),
            _ => match layout
                .row_at(pos)
                .and_then(|row| self.scroll.index_at_row(row))
            {
                Some(i) => {
                    self.active = Some(i);
                    self.toggle_visible(i)
                }
                None => DropdownAction::None,
            },
        }
    }

    /// The header line is split in two halves: select-all on the left, clear-all on the right.
    fn handle_header_click(&mut self, layout: &PanelLayout, x: u16) -> DropdownAction<V> {
        let Some(header) = layout.header else {
            return DropdownAction::None;
        };
        if x < header.x + header.width / 2 {
            self.select_all()
        } else {
            self.clear_all()
        }
    }

    // ---- derived data ----

    pub fn semantics(&self) -> Semantics {
        let open = self.is_open();
        let trigger = TriggerSemantics {
            role: Role::Combobox,
            expanded: open,
            has_popup: Popup::Listbox,
            disabled: self.options.disabled,
        };
        if !open {
            return Semantics {
                trigger,
                listbox: None,
                options: Vec::new(),
            };
        }
        let options = self
            .visible
            .iter()
            .enumerate()
            .map(|(index, &ci)| {
                let opt = &self.catalog[ci];
                OptionSemantics {
                    role: Role::Option,
                    index,
                    selected: self.selection().contains(&opt.value),
                    disabled: opt.disabled,
                    active: self.active == Some(index),
                }
            })
            .collect();
        Semantics {
            trigger,
            listbox: Some(ListboxSemantics {
                role: Role::Listbox,
                multiselectable: self.mode() == SelectionMode::Multi,
            }),
            options,
        }
    }

    // ---- internals ----

    fn is_live(&self, session: SessionId) -> bool {
        self.mounted
            && matches!(&self.state, OpenState::Open(s) if s.id == session)
    }

    fn shape(&self) -> PanelShape {
        PanelShape {
            max_rows: self.options.max_visible_rows,
            search_line: self.options.searchable,
            header_line: self.mode() == SelectionMode::Multi,
            ..PanelShape::default()
        }
    }

    fn root(&self) -> Rect {
        match &self.layout {
            Some(l) if self.trigger.is_empty() => l.panel,
            Some(l) => self.trigger.union(l.panel),
            None => self.trigger,
        }
    }

    fn relayout(&mut self) {
        let OpenState::Open(session) = &self.state else {
            self.layout = None;
            return;
        };
        if !session.placed {
            // placement is decided one frame after opening
            self.layout = None;
            return;
        }
        let layout = PanelLayout::compute(
            self.trigger,
            self.frame,
            session.placement,
            self.visible.len(),
            &self.shape(),
        );
        self.layout = Some(layout);
        self.scroll.set_rows(layout.rows.height);
        if let Some(i) = self.active {
            self.scroll.ensure_visible(i);
        }
        let root = self.root();
        if let Some(listeners) = &mut self.listeners {
            listeners.dismissal.set_root(root);
            if listeners.keys.root() != root {
                listeners.keys.set_root(root);
            }
        }
    }

    fn refilter(&mut self) {
        self.visible = filter::filter_indices(&self.catalog, self.query());
        self.scroll.set_len(self.visible.len());
        if self.active.is_some_and(|i| i >= self.visible.len()) {
            self.active = None;
        }

        let OpenState::Open(session) = &self.state else {
            return;
        };
        let id = session.id;
        if self.positioner.needs_remeasure(self.visible.len()) {
            self.positioner.begin();
            self.tasks
                .schedule(id, Deferral::NextFrame, DeferredTask::MeasurePlacement);
        }
        self.relayout();
    }

    fn seed_active(&mut self) {
        self.active = match self.selection() {
            Selection::Single(Some(v)) => self
                .visible
                .iter()
                .position(|&ci| &self.catalog[ci].value == v),
            _ => None,
        };
        if let Some(i) = self.active {
            self.scroll.ensure_visible(i);
        }
    }
}

impl<V: Clone + PartialEq + Display> DropdownController<V> {
    /// Hidden field mirroring the selection, when a `name` is configured.
    pub fn form_field(&self) -> Option<FormField> {
        self.options
            .name
            .as_ref()
            .map(|name| FormField::mirror(name.clone(), self.selection()))
    }
}
