//! Panel geometry derived from the trigger, the frame and the placement decision.

use ratatui::layout::Position;
use ratatui::layout::Rect;

use crate::listener::contains;
use crate::placement::Placement;

/// Static shape of a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelShape {
    /// Upper bound on option rows shown at once.
    pub max_rows: u16,
    /// Reserve a line for the search query.
    pub search_line: bool,
    /// Reserve a line for bulk actions (multi selection).
    pub header_line: bool,
    /// Draw a one-cell border around the panel.
    pub border: bool,
    /// Minimum panel width, for narrow triggers.
    pub min_width: u16,
}

impl Default for PanelShape {
    fn default() -> Self {
        Self {
            max_rows: 8,
            search_line: false,
            header_line: false,
            border: true,
            min_width: 16,
        }
    }
}

impl PanelShape {
    /// Rows taken by everything except the options.
    pub fn chrome(&self) -> u16 {
        let border = if self.border { 2 } else { 0 };
        border + u16::from(self.search_line) + u16::from(self.header_line)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelLayout {
    pub placement: Placement,
    pub panel: Rect,
    pub search: Option<Rect>,
    pub header: Option<Rect>,
    /// Option rows (also used for the empty-state message).
    pub rows: Rect,
}

impl PanelLayout {
    /// Lays out a panel for `visible` options next to `trigger`, clipped to `frame`.
    ///
    /// An empty list still gets one row for the "no options" message.
    pub fn compute(
        trigger: Rect,
        frame: Rect,
        placement: Placement,
        visible: usize,
        shape: &PanelShape,
    ) -> Self {
        let wanted_rows = (visible.max(1)).min(shape.max_rows.max(1) as usize) as u16;
        let wanted_h = wanted_rows.saturating_add(shape.chrome());

        let (y, height) = match placement {
            Placement::Below => {
                let top = trigger.bottom();
                let room = frame.bottom().saturating_sub(top);
                (top, wanted_h.min(room))
            }
            Placement::Above => {
                let room = trigger.top().saturating_sub(frame.top());
                let h = wanted_h.min(room);
                (trigger.top() - h, h)
            }
        };

        let width = trigger
            .width
            .max(shape.min_width)
            .min(frame.right().saturating_sub(trigger.x));
        let panel = Rect::new(trigger.x, y, width, height);

        let inner = if shape.border && panel.width >= 2 && panel.height >= 2 {
            Rect::new(panel.x + 1, panel.y + 1, panel.width - 2, panel.height - 2)
        } else {
            panel
        };

        let mut cursor = inner;
        let search = shape.search_line.then(|| take_line(&mut cursor));
        let header = shape.header_line.then(|| take_line(&mut cursor));

        Self {
            placement,
            panel,
            search,
            header,
            rows: cursor,
        }
    }

    /// Panel row under `pos`, relative to the first option row.
    pub fn row_at(&self, pos: Position) -> Option<u16> {
        contains(self.rows, pos).then(|| pos.y - self.rows.y)
    }

    pub fn contains(&self, pos: Position) -> bool {
        contains(self.panel, pos)
    }

    pub fn header_contains(&self, pos: Position) -> bool {
        self.header.is_some_and(|h| contains(h, pos))
    }
}

fn take_line(area: &mut Rect) -> Rect {
    let line = Rect::new(area.x, area.y, area.width, area.height.min(1));
    let used = line.height;
    area.y += used;
    area.height -= used;
    line
}
