//! Selection state and its single/multi toggle semantics.
//!
//! Every operation here is pure: it computes the *next* [`Selection`] and leaves `self`
//! untouched. Whether that next value is committed is decided by
//! [`crate::binding::ValueBinding`].

use crate::option::SelectOption;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    Multi,
}

/// Current selection of one dropdown.
///
/// `Multi` behaves as a set: values are unique, and their order only reflects insertion so
/// output (labels, form fields) stays stable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection<V> {
    Single(Option<V>),
    Multi(Vec<V>),
}

/// What a user mutation asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeReason {
    Toggle,
    SelectAll,
    ClearAll,
    Clear,
}

/// Result of a toggle: the next selection and whether the panel should close.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionUpdate<V> {
    pub next: Selection<V>,
    pub close: bool,
}

impl<V> Selection<V> {
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Selection::Single(None),
            SelectionMode::Multi => Selection::Multi(Vec::new()),
        }
    }

    pub fn single(value: V) -> Self {
        Selection::Single(Some(value))
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Selection::Single(_) => SelectionMode::Single,
            Selection::Multi(_) => SelectionMode::Multi,
        }
    }

    pub fn values(&self) -> &[V] {
        match self {
            Selection::Single(v) => v.as_slice(),
            Selection::Multi(vs) => vs,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn cleared(&self) -> Self {
        Self::empty(self.mode())
    }
}

impl<V: Clone + PartialEq> Selection<V> {
    /// A multi selection from arbitrary values; duplicates collapse to their first occurrence.
    pub fn multi(values: impl IntoIterator<Item = V>) -> Self {
        let mut out: Vec<V> = Vec::new();
        for v in values {
            if !out.contains(&v) {
                out.push(v);
            }
        }
        Selection::Multi(out)
    }

    pub fn contains(&self, value: &V) -> bool {
        self.values().contains(value)
    }

    /// Toggles `option`.
    ///
    /// Single replaces the selection (re-selecting the current value is idempotent) and
    /// closes. Multi flips membership and stays open. Disabled options yield `None`.
    pub fn toggled(&self, option: &SelectOption<V>) -> Option<SelectionUpdate<V>> {
        if option.disabled {
            return None;
        }
        let update = match self {
            Selection::Single(_) => SelectionUpdate {
                next: Selection::Single(Some(option.value.clone())),
                close: true,
            },
            Selection::Multi(values) => {
                let next = if values.contains(&option.value) {
                    values
                        .iter()
                        .filter(|v| **v != option.value)
                        .cloned()
                        .collect()
                } else {
                    let mut next = values.clone();
                    next.push(option.value.clone());
                    next
                };
                SelectionUpdate {
                    next: Selection::Multi(next),
                    close: false,
                }
            }
        };
        Some(update)
    }

    /// Adds every enabled option of `visible` (Multi only).
    ///
    /// Values outside `visible` are kept as they are.
    pub fn with_all_selected(&self, visible: &[&SelectOption<V>]) -> Option<Self> {
        let Selection::Multi(values) = self else {
            return None;
        };
        let mut next = values.clone();
        for opt in visible.iter().filter(|o| !o.disabled) {
            if !next.contains(&opt.value) {
                next.push(opt.value.clone());
            }
        }
        Some(Selection::Multi(next))
    }

    /// Removes every value of `visible`, disabled ones included (Multi only).
    ///
    /// Values outside `visible` are kept as they are.
    pub fn with_all_cleared(&self, visible: &[&SelectOption<V>]) -> Option<Self> {
        let Selection::Multi(values) = self else {
            return None;
        };
        let next = values
            .iter()
            .filter(|v| !visible.iter().any(|o| &o.value == *v))
            .cloned()
            .collect();
        Some(Selection::Multi(next))
    }
}
