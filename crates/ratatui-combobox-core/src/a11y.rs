//! Semantic state of a dropdown, for screen-reader bridges and tests.
//!
//! Labels are intentionally absent; only states and roles are exposed.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Combobox,
    Listbox,
    Option,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Popup {
    Listbox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerSemantics {
    pub role: Role,
    pub expanded: bool,
    pub has_popup: Popup,
    pub disabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListboxSemantics {
    pub role: Role,
    pub multiselectable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSemantics {
    pub role: Role,
    /// Index into the visible (filtered) list.
    pub index: usize,
    pub selected: bool,
    pub disabled: bool,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Semantics {
    pub trigger: TriggerSemantics,
    /// Present only while the panel is open.
    pub listbox: Option<ListboxSemantics>,
    pub options: Vec<OptionSemantics>,
}
