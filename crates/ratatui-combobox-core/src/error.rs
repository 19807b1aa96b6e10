//! Contract violations raised at construction or sync time.
//!
//! Interaction-time policies (disabled options, disabled component, empty results) are
//! silent no-ops and never show up here.

use thiserror::Error;

use crate::binding::BindingMode;
use crate::selection::SelectionMode;

/// Rejected option catalogs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// An option was supplied without a visible label.
    #[error("option at index {index} has an empty label")]
    EmptyLabel { index: usize },

    /// Two options share the same value, so selection identity would be ambiguous.
    #[error("option at index {index} duplicates the value of option {first}")]
    DuplicateValue { index: usize, first: usize },
}

/// Misuse of a controlled/uncontrolled value binding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A render tried to switch the binding mode of an existing instance.
    #[error("binding mode is fixed per instance: cannot switch from {from:?} to {to:?}")]
    ModeSwitch { from: BindingMode, to: BindingMode },

    /// A single value was supplied to a multi-select (or the other way around).
    #[error("expected a {expected:?} selection value, got {got:?}")]
    ShapeMismatch {
        expected: SelectionMode,
        got: SelectionMode,
    },
}

/// Umbrella error for callers that do not care which stage failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComboboxError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Binding(#[from] BindingError),
}
