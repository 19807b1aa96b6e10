use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_combobox_core::binding::ValueBinding;
use ratatui_combobox_core::controller::ChangeMeta;
use ratatui_combobox_core::controller::DropdownAction;
use ratatui_combobox_core::controller::DropdownController;
use ratatui_combobox_core::controller::DropdownOptions;
use ratatui_combobox_core::error::BindingError;
use ratatui_combobox_core::input::InputEvent;
use ratatui_combobox_core::option::OptionCatalog;
use ratatui_combobox_core::selection::Selection;

use crate::panel;
use crate::panel::RenderedAnchor;
use crate::panel::RowContent;
use crate::theme::Theme;

/// Single-choice dropdown. Picking an option closes the panel.
///
/// Render it after the rest of the frame so the panel is drawn on top.
#[derive(Debug)]
pub struct Select<V> {
    dropdown: DropdownController<V>,
    anchor: RenderedAnchor,
}

impl<V: Clone + PartialEq> Select<V> {
    pub fn new(catalog: OptionCatalog<V>) -> Self {
        Self::with_options(catalog, DropdownOptions::default())
    }

    pub fn with_options(catalog: OptionCatalog<V>, options: DropdownOptions) -> Self {
        Self {
            dropdown: DropdownController::uncontrolled(catalog, Selection::Single(None), options),
            anchor: RenderedAnchor::default(),
        }
    }

    /// Uncontrolled, starting at `value`.
    pub fn with_default_value(mut self, value: V) -> Self {
        let binding = ValueBinding::uncontrolled(Selection::single(value));
        self.dropdown = self.dropdown.with_binding(binding);
        self
    }

    /// Controlled: the displayed value changes only through [`Select::set_value`].
    pub fn with_value(mut self, value: Option<V>) -> Self {
        let binding = ValueBinding::controlled(Selection::Single(value));
        self.dropdown = self.dropdown.with_binding(binding);
        self
    }

    pub fn set_on_change(&mut self, f: impl FnMut(&Selection<V>, &ChangeMeta<V>) + 'static) {
        self.dropdown.set_on_change(f);
    }

    /// Supplies the caller-owned value of a controlled select.
    pub fn set_value(&mut self, value: Option<V>) -> Result<(), BindingError> {
        self.dropdown.sync_value(Some(Selection::Single(value)))
    }

    pub fn value(&self) -> Option<&V> {
        self.dropdown.selection().values().first()
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.dropdown.selected_labels().first().copied()
    }

    pub fn controller(&self) -> &DropdownController<V> {
        &self.dropdown
    }

    pub fn controller_mut(&mut self) -> &mut DropdownController<V> {
        &mut self.dropdown
    }

    /// Routes one input event, then runs the work it deferred to "after this event". See
    /// [`DropdownController::dispatch`] for which of the two actions is returned.
    pub fn handle_event(&mut self, event: InputEvent) -> DropdownAction<V> {
        self.dropdown.dispatch(event)
    }

    /// Call once after every frame; decides placement for a freshly opened panel.
    pub fn on_frame(&mut self) -> DropdownAction<V> {
        self.dropdown.on_frame(&self.anchor)
    }

    pub fn render(&mut self, area: Rect, frame: Rect, buf: &mut Buffer, theme: &Theme) {
        self.anchor = RenderedAnchor {
            trigger: Some(area),
            frame,
        };
        self.dropdown.set_layout(area, frame);
        panel::render_trigger(area, buf, theme, &self.dropdown, self.selected_label());
        panel::render_panel(buf, theme, &self.dropdown, |opt, _| {
            RowContent::Label(opt.label.clone())
        });
    }
}
