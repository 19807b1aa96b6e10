//! Controlled vs uncontrolled value ownership.

use tracing::warn;

use crate::error::BindingError;
use crate::selection::Selection;
use crate::selection::SelectionMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingMode {
    /// The caller owns the value and supplies it on every render.
    Controlled,
    /// The instance owns the value, seeded once from a default.
    Uncontrolled,
}

/// Resolves where the selection's source of truth lives.
///
/// The mode is decided at construction and never changes. Controlled bindings only ever
/// display what the caller last synced; a mutation produces a next value for the change
/// callback and nothing else.
#[derive(Clone, Debug)]
pub struct ValueBinding<V> {
    mode: BindingMode,
    value: Selection<V>,
}

impl<V> ValueBinding<V> {
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.value.mode()
    }

    pub fn current(&self) -> &Selection<V> {
        &self.value
    }
}

impl<V: Clone + PartialEq> ValueBinding<V> {
    pub fn controlled(value: Selection<V>) -> Self {
        Self {
            mode: BindingMode::Controlled,
            value,
        }
    }

    pub fn uncontrolled(default_value: Selection<V>) -> Self {
        Self {
            mode: BindingMode::Uncontrolled,
            value: default_value,
        }
    }

    /// Applies the external value of one render.
    ///
    /// `Some` on an uncontrolled binding, or `None` on a controlled one, is a mode switch and
    /// is rejected without touching the current value.
    pub fn sync(&mut self, external: Option<Selection<V>>) -> Result<(), BindingError> {
        match (self.mode, external) {
            (BindingMode::Controlled, Some(value)) => {
                if value.mode() != self.value.mode() {
                    return Err(BindingError::ShapeMismatch {
                        expected: self.value.mode(),
                        got: value.mode(),
                    });
                }
                self.value = value;
                Ok(())
            }
            (BindingMode::Uncontrolled, None) => Ok(()),
            (from, external) => {
                let to = if external.is_some() {
                    BindingMode::Controlled
                } else {
                    BindingMode::Uncontrolled
                };
                warn!(?from, ?to, "rejected binding mode switch");
                Err(BindingError::ModeSwitch { from, to })
            }
        }
    }

    /// Records a user-requested next value.
    ///
    /// Uncontrolled bindings commit it; controlled bindings leave their display alone until
    /// the caller syncs a new value. Returns whether the displayed value changed.
    pub fn commit(&mut self, next: &Selection<V>) -> bool {
        match self.mode {
            BindingMode::Controlled => false,
            BindingMode::Uncontrolled => {
                let changed = self.value != *next;
                self.value = next.clone();
                changed
            }
        }
    }
}
