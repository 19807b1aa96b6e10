/// Vertical scroll state of the option list inside the panel.
///
/// Counts whole rows: `offset` is the first visible row, `rows` the number of rows the panel
/// can show, `len` the number of visible options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListScroll {
    pub offset: usize,
    pub rows: u16,
    pub len: usize,
}

impl ListScroll {
    pub fn set_rows(&mut self, rows: u16) {
        self.rows = rows;
        self.clamp();
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.clamp();
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let next = self.offset as isize + delta;
        self.offset = next.clamp(0, self.max_offset() as isize) as usize;
    }

    /// Scrolls the minimum amount that puts `index` on screen.
    pub fn ensure_visible(&mut self, index: usize) {
        let rows = self.rows as usize;
        if rows == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + rows {
            self.offset = index + 1 - rows;
        }
        self.clamp();
    }

    /// Visible-list index shown on panel row `row`, if any.
    pub fn index_at_row(&self, row: u16) -> Option<usize> {
        if row >= self.rows {
            return None;
        }
        let idx = self.offset + row as usize;
        (idx < self.len).then_some(idx)
    }

    pub fn is_scrollable(&self) -> bool {
        self.len > self.rows as usize
    }

    fn max_offset(&self) -> usize {
        self.len.saturating_sub(self.rows as usize)
    }
}
