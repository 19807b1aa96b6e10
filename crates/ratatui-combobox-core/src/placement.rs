//! Above/below placement of the open panel relative to its anchor.
//!
//! The decision is a heuristic: it compares free space against an *estimated* panel height
//! rather than the height the panel will actually take. [`PanelHeight::FitRows`] narrows the
//! estimate to the rows that will be drawn, using the same decision rule.

use ratatui::layout::Rect;
use tracing::debug;

/// Side of the anchor the panel opens on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    Above,
    #[default]
    Below,
}

/// Geometry captured from the host when a measurement runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionMeasurement {
    pub anchor: Rect,
    pub viewport_height: u16,
}

/// Reads the trigger's on-screen rectangle and the viewport height.
///
/// Returns `None` when the anchor has not been laid out yet.
pub trait MeasureAnchor {
    fn measure(&self) -> Option<PositionMeasurement>;
}

impl MeasureAnchor for PositionMeasurement {
    fn measure(&self) -> Option<PositionMeasurement> {
        Some(*self)
    }
}

impl<F> MeasureAnchor for F
where
    F: Fn() -> Option<PositionMeasurement>,
{
    fn measure(&self) -> Option<PositionMeasurement> {
        self()
    }
}

pub const DEFAULT_ESTIMATED_PANEL_HEIGHT: u16 = 260;
pub const DEFAULT_PLACEMENT_BUFFER: u16 = 8;

/// Height assumed for the panel when deciding placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelHeight {
    /// A fixed estimate, independent of the content.
    Fixed(u16),
    /// Visible rows (capped at `max_rows`) plus `chrome` rows for borders and the search line.
    FitRows { chrome: u16, max_rows: u16 },
}

impl Default for PanelHeight {
    fn default() -> Self {
        PanelHeight::Fixed(DEFAULT_ESTIMATED_PANEL_HEIGHT)
    }
}

impl PanelHeight {
    pub fn estimate(&self, visible_rows: usize) -> u16 {
        match *self {
            PanelHeight::Fixed(h) => h,
            PanelHeight::FitRows { chrome, max_rows } => {
                let rows = visible_rows.clamp(1, max_rows.max(1) as usize) as u16;
                rows.saturating_add(chrome)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementOptions {
    pub panel_height: PanelHeight,
    pub buffer: u16,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            panel_height: PanelHeight::default(),
            buffer: DEFAULT_PLACEMENT_BUFFER,
        }
    }
}

/// Opens above only when the space below cannot hold the estimate *and* there is more room
/// above than below.
pub fn decide_placement(
    m: &PositionMeasurement,
    options: &PlacementOptions,
    visible_rows: usize,
) -> Placement {
    let below = i32::from(m.viewport_height) - i32::from(m.anchor.bottom());
    let above = i32::from(m.anchor.top());
    let needed = i32::from(options.panel_height.estimate(visible_rows)) + i32::from(options.buffer);
    if below < needed && above > below {
        Placement::Above
    } else {
        Placement::Below
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionerState {
    #[default]
    Idle,
    Measuring,
    Placed(Placement),
}

/// Tracks the placement of one open session.
#[derive(Clone, Debug, Default)]
pub struct ViewportPositioner {
    options: PlacementOptions,
    state: PositionerState,
    measured_rows: Option<usize>,
    last: Option<PositionMeasurement>,
}

impl ViewportPositioner {
    pub fn new(options: PlacementOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PlacementOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: PlacementOptions) {
        self.options = options;
    }

    pub fn state(&self) -> PositionerState {
        self.state
    }

    pub fn placement(&self) -> Option<Placement> {
        match self.state {
            PositionerState::Placed(p) => Some(p),
            _ => None,
        }
    }

    pub fn last_measurement(&self) -> Option<PositionMeasurement> {
        self.last
    }

    /// Marks a measurement as pending (panel opened, or its row count changed).
    pub fn begin(&mut self) {
        self.state = PositionerState::Measuring;
    }

    /// Whether a visible-row count differs from the one the current placement was based on.
    pub fn needs_remeasure(&self, visible_rows: usize) -> bool {
        self.measured_rows != Some(visible_rows)
    }

    /// Runs the measurement and records the decision.
    ///
    /// If the anchor cannot be measured the previous placement (or `Below`) is kept.
    pub fn place(&mut self, anchor: &dyn MeasureAnchor, visible_rows: usize) -> Placement {
        let placement = match anchor.measure() {
            Some(m) => {
                let p = decide_placement(&m, &self.options, visible_rows);
                debug!(
                    anchor = ?m.anchor,
                    viewport_height = m.viewport_height,
                    visible_rows,
                    placement = ?p,
                    "placed dropdown panel"
                );
                self.last = Some(m);
                p
            }
            None => self.placement().unwrap_or_default(),
        };
        self.measured_rows = Some(visible_rows);
        self.state = PositionerState::Placed(placement);
        placement
    }

    pub fn reset(&mut self) {
        self.state = PositionerState::Idle;
        self.measured_rows = None;
        self.last = None;
    }
}
