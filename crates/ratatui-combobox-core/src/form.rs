use std::fmt::Display;

use crate::selection::Selection;

/// Hidden form field mirroring the current selection as a primitive value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    /// Single selections become the value's display string (empty when nothing is selected);
    /// multi selections become a JSON array of display strings.
    pub fn mirror<V: Display>(name: impl Into<String>, selection: &Selection<V>) -> Self {
        let value = match selection {
            Selection::Single(v) => v.as_ref().map(ToString::to_string).unwrap_or_default(),
            Selection::Multi(vs) => {
                let items: Vec<String> = vs.iter().map(ToString::to_string).collect();
                serde_json::to_string(&items).unwrap_or_else(|_| String::from("[]"))
            }
        };
        Self {
            name: name.into(),
            value,
        }
    }
}
