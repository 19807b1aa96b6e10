use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_combobox_core::scroll::ListScroll;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

pub fn str_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, scroll: &ListScroll, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if !scroll.is_scrollable() {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((scroll.rows as f64 / scroll.len as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;

    let max_offset = scroll.len.saturating_sub(scroll.rows as usize).max(1) as f64;
    let thumb_top = ((scroll.offset as f64 / max_offset) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            "│"
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Writes `input` at `(x, y)`, stopping before `max_cols` columns are exceeded. Wide characters
/// that would straddle the edge are dropped. Returns the number of columns written.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    let max_cols = max_cols as usize;
    let mut out_cols = 0usize;
    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }

        let s = ch.encode_utf8(&mut tmp);
        let dx = out_cols as u16;
        if let Some(cell) = buf.cell_mut((x + dx, y)) {
            cell.set_style(style);
            cell.set_symbol(s);
        }
        if w == 2 {
            if let Some(cell) = buf.cell_mut((x + dx + 1, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        out_cols += w;
    }
    out_cols as u16
}

/// Like [`render_str_clipped`], but ends with `…` when `input` does not fit.
pub fn render_str_ellipsized(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    if str_width(input) <= max_cols as usize {
        return render_str_clipped(x, y, max_cols, buf, input, style);
    }
    if max_cols == 0 {
        return 0;
    }
    let used = render_str_clipped(x, y, max_cols - 1, buf, input, style);
    render_str_clipped(x + used, y, 1, buf, "…", style);
    used + 1
}
