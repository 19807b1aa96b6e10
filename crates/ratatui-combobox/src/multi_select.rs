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
use crate::render;
use crate::theme::Theme;

/// Checkbox dropdown. The panel stays open while options are toggled; `Ctrl+A`/`Ctrl+D`
/// (or the header line) select or clear everything currently visible.
#[derive(Debug)]
pub struct MultiSelect<V> {
    dropdown: DropdownController<V>,
    anchor: RenderedAnchor,
}

impl<V: Clone + PartialEq> MultiSelect<V> {
    pub fn new(catalog: OptionCatalog<V>) -> Self {
        Self::with_options(catalog, DropdownOptions::default())
    }

    pub fn with_options(catalog: OptionCatalog<V>, options: DropdownOptions) -> Self {
        Self {
            dropdown: DropdownController::uncontrolled(catalog, Selection::Multi(Vec::new()), options),
            anchor: RenderedAnchor::default(),
        }
    }

    pub fn with_default_value(mut self, values: impl IntoIterator<Item = V>) -> Self {
        let binding = ValueBinding::uncontrolled(Selection::multi(values));
        self.dropdown = self.dropdown.with_binding(binding);
        self
    }

    /// Controlled: the displayed values change only through [`MultiSelect::set_value`].
    pub fn with_value(mut self, values: impl IntoIterator<Item = V>) -> Self {
        let binding = ValueBinding::controlled(Selection::multi(values));
        self.dropdown = self.dropdown.with_binding(binding);
        self
    }

    pub fn set_on_change(&mut self, f: impl FnMut(&Selection<V>, &ChangeMeta<V>) + 'static) {
        self.dropdown.set_on_change(f);
    }

    pub fn set_value(&mut self, values: impl IntoIterator<Item = V>) -> Result<(), BindingError> {
        self.dropdown.sync_value(Some(Selection::multi(values)))
    }

    pub fn values(&self) -> &[V] {
        self.dropdown.selection().values()
    }

    pub fn controller(&self) -> &DropdownController<V> {
        &self.dropdown
    }

    pub fn controller_mut(&mut self) -> &mut DropdownController<V> {
        &mut self.dropdown
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DropdownAction<V> {
        self.dropdown.dispatch(event)
    }

    pub fn on_frame(&mut self) -> DropdownAction<V> {
        self.dropdown.on_frame(&self.anchor)
    }

    /// Joined labels, or `"N selected"` when they do not fit in `width` columns.
    pub fn summary(&self, width: u16) -> Option<String> {
        let labels = self.dropdown.selected_labels();
        let count = self.values().len();
        if count == 0 {
            return None;
        }
        let joined = labels.join(", ");
        if labels.len() == count && render::str_width(&joined) <= width as usize {
            Some(joined)
        } else {
            Some(format!("{count} selected"))
        }
    }

    pub fn render(&mut self, area: Rect, frame: Rect, buf: &mut Buffer, theme: &Theme) {
        self.anchor = RenderedAnchor {
            trigger: Some(area),
            frame,
        };
        self.dropdown.set_layout(area, frame);
        let summary = self.summary(area.width.saturating_sub(2));
        panel::render_trigger(area, buf, theme, &self.dropdown, summary.as_deref());
        panel::render_panel(buf, theme, &self.dropdown, |opt, checked| RowContent::Check {
            checked,
            label: opt.label.clone(),
        });
    }
}
