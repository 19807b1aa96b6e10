use crate::input::KeyEvent;
use crate::keymap::DropdownBindings;
use crate::keymap::DropdownCommand;
use crate::selection::SelectionMode;

/// What an open panel should do with a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Close, clear the query and hand focus back to the trigger.
    Close,
    /// Make the visible option at this index active; in single mode this also selects it.
    Activate(usize),
    /// Confirm the visible option at this index.
    Confirm(usize),
    SelectAll,
    ClearAll,
    /// Not a navigation key (may still be search text).
    Unhandled,
}

/// Maps keys to navigation over the *visible* option list.
///
/// Arrow navigation exists for single selection only; multi selection gets the bulk
/// commands instead. Disabled options are never skipped when moving.
#[derive(Clone, Debug, Default)]
pub struct KeyboardNavigator {
    bindings: DropdownBindings,
}

impl KeyboardNavigator {
    pub fn new(bindings: DropdownBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &DropdownBindings {
        &self.bindings
    }

    pub fn resolve(
        &self,
        key: &KeyEvent,
        mode: SelectionMode,
        active: Option<usize>,
        visible_len: usize,
    ) -> NavOutcome {
        let Some(cmd) = self.bindings.command_for(key, true) else {
            return NavOutcome::Unhandled;
        };
        match (mode, cmd) {
            (_, DropdownCommand::Close) => NavOutcome::Close,
            (SelectionMode::Single, DropdownCommand::Next) => {
                wrap_step(active, visible_len, 1).map_or(NavOutcome::Unhandled, NavOutcome::Activate)
            }
            (SelectionMode::Single, DropdownCommand::Previous) => {
                wrap_step(active, visible_len, -1).map_or(NavOutcome::Unhandled, NavOutcome::Activate)
            }
            (SelectionMode::Single, DropdownCommand::First) if visible_len > 0 => {
                NavOutcome::Activate(0)
            }
            (SelectionMode::Single, DropdownCommand::Last) if visible_len > 0 => {
                NavOutcome::Activate(visible_len - 1)
            }
            (SelectionMode::Single, DropdownCommand::Confirm) => active
                .filter(|&i| i < visible_len)
                .map_or(NavOutcome::Unhandled, NavOutcome::Confirm),
            (SelectionMode::Multi, DropdownCommand::SelectAll) => NavOutcome::SelectAll,
            (SelectionMode::Multi, DropdownCommand::ClearAll) => NavOutcome::ClearAll,
            _ => NavOutcome::Unhandled,
        }
    }
}

/// Moves `active` by `delta` with wraparound. With no active option, moving forward lands on
/// the first option and moving backward on the last.
pub fn wrap_step(active: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(cur) = active.filter(|&i| i < len) else {
        return Some(if delta >= 0 { 0 } else { len - 1 });
    };
    let len = len as isize;
    Some((cur as isize + delta).rem_euclid(len) as usize)
}
