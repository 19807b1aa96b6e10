//! Drawing shared by every dropdown front-end: the trigger line and the open panel.
//!
//! Front-ends describe each option row with a [`RowContent`] instead of drawing it themselves,
//! so a custom row (checkboxes, dial codes) never needs to know about panel geometry.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use ratatui_combobox_core::controller::DropdownController;
use ratatui_combobox_core::layout::PanelLayout;
use ratatui_combobox_core::option::SelectOption;
use ratatui_combobox_core::placement::MeasureAnchor;
use ratatui_combobox_core::placement::PositionMeasurement;

use crate::render;
use crate::theme::Theme;

/// How one option row is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowContent {
    Label(String),
    /// `[x] label`
    Check { checked: bool, label: String },
    /// A fixed-width leading column, then the label: `+49   Germany (DE)`.
    Prefixed {
        prefix: String,
        width: u16,
        label: String,
    },
}

impl RowContent {
    fn render(&self, area: Rect, buf: &mut Buffer, style: Style) {
        let (x, y, w) = (area.x, area.y, area.width);
        match self {
            RowContent::Label(label) => {
                render::render_str_ellipsized(x, y, w, buf, label, style);
            }
            RowContent::Check { checked, label } => {
                let mark = if *checked { "[x] " } else { "[ ] " };
                let used = render::render_str_clipped(x, y, w, buf, mark, style);
                render::render_str_ellipsized(x + used, y, w - used, buf, label, style);
            }
            RowContent::Prefixed {
                prefix,
                width,
                label,
            } => {
                let lead = (*width).min(w);
                render::render_str_clipped(x, y, lead, buf, prefix, style);
                render::render_str_ellipsized(x + lead, y, w - lead, buf, label, style);
            }
        }
    }
}

/// Where a front-end was last drawn, used as the anchor for placement measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderedAnchor {
    pub trigger: Option<Rect>,
    pub frame: Rect,
}

impl MeasureAnchor for RenderedAnchor {
    fn measure(&self) -> Option<PositionMeasurement> {
        let anchor = self.trigger.filter(|t| !t.is_empty())?;
        Some(PositionMeasurement {
            anchor,
            viewport_height: self.frame.bottom(),
        })
    }
}

pub fn render_trigger<V: Clone + PartialEq>(
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
    dropdown: &DropdownController<V>,
    text: Option<&str>,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let base = if dropdown.is_disabled() {
        theme.disabled
    } else if dropdown.is_focused() {
        theme.accent
    } else {
        theme.text_primary
    };
    buf.set_style(area, base);

    let arrow = if dropdown.is_open() { "▴" } else { "▾" };
    let text_w = area.width.saturating_sub(2);
    match text {
        Some(text) => {
            render::render_str_ellipsized(area.x, area.y, text_w, buf, text, base);
        }
        None => {
            let placeholder = &dropdown.options().placeholder;
            let style = base.patch(theme.text_muted);
            render::render_str_ellipsized(area.x, area.y, text_w, buf, placeholder, style);
        }
    }
    if area.width >= 2 {
        render::render_str_clipped(area.right() - 1, area.y, 1, buf, arrow, base);
    }
}

/// Draws the open panel. Does nothing until the controller has a layout.
pub fn render_panel<V, F>(
    buf: &mut Buffer,
    theme: &Theme,
    dropdown: &DropdownController<V>,
    mut row: F,
) where
    V: Clone + PartialEq,
    F: FnMut(&SelectOption<V>, bool) -> RowContent,
{
    let Some(layout) = dropdown.panel_layout().copied() else {
        return;
    };
    Clear.render(layout.panel, buf);
    buf.set_style(layout.panel, theme.text_primary);
    Block::bordered()
        .border_style(theme.border)
        .render(layout.panel, buf);

    render_search(&layout, buf, theme, dropdown);
    if let Some(header) = layout.header {
        let hint = "^A all  ^D none";
        render::render_str_clipped(header.x, header.y, header.width, buf, hint, theme.text_muted);
    }

    let rows = layout.rows;
    if rows.width == 0 || rows.height == 0 {
        return;
    }
    let visible = dropdown.visible();
    if visible.is_empty() {
        let text = &dropdown.options().empty_text;
        render::render_str_ellipsized(rows.x, rows.y, rows.width, buf, text, theme.text_muted);
        return;
    }

    let scroll = dropdown.scroll();
    let (content, scrollbar) = if scroll.is_scrollable() && rows.width >= 2 {
        (
            Rect::new(rows.x, rows.y, rows.width - 1, rows.height),
            Some(Rect::new(rows.right() - 1, rows.y, 1, rows.height)),
        )
    } else {
        (rows, None)
    };

    for dy in 0..content.height {
        let Some(index) = scroll.index_at_row(dy) else {
            break;
        };
        let opt = visible[index];
        let selected = dropdown.is_selected(&opt.value);
        let mut style = theme.text_primary;
        if selected {
            style = style.patch(theme.selected);
        }
        if opt.disabled {
            style = style.patch(theme.disabled);
        }
        if dropdown.active() == Some(index) {
            style = style.patch(theme.active);
        }
        let line = Rect::new(content.x, content.y + dy, content.width, 1);
        buf.set_style(line, style);
        row(opt, selected).render(line, buf, style);
    }

    if let Some(area) = scrollbar {
        render::render_scrollbar(area, buf, scroll, theme.text_muted);
    }
}

fn render_search<V: Clone + PartialEq>(
    layout: &PanelLayout,
    buf: &mut Buffer,
    theme: &Theme,
    dropdown: &DropdownController<V>,
) {
    let Some(search) = layout.search else {
        return;
    };
    let used = render::render_str_clipped(search.x, search.y, search.width, buf, "/ ", theme.accent);
    let (x, w) = (search.x + used, search.width - used);
    let query = dropdown.query();
    if query.is_empty() {
        let placeholder = &dropdown.options().search_placeholder;
        render::render_str_clipped(x, search.y, w, buf, placeholder, theme.text_muted);
    } else {
        let style = if dropdown.is_search_focused() {
            theme.text_primary.patch(theme.accent)
        } else {
            theme.text_primary
        };
        // keep the end of a long query in view
        let width = render::str_width(query);
        let skip = width.saturating_sub(w as usize);
        let tail: String = query.chars().skip(skip).collect();
        render::render_str_clipped(x, search.y, w, buf, &tail, style);
    }
}
