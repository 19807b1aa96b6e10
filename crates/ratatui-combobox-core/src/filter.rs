//! Search filtering over an option catalog.

use crate::option::SelectOption;

/// Visible options for `query`, in catalog order.
///
/// Matches against the label only, never the value.
pub fn filter<'a, V>(catalog: &'a [SelectOption<V>], query: &str) -> Vec<&'a SelectOption<V>> {
    filter_indices(catalog, query)
        .into_iter()
        .map(|i| &catalog[i])
        .collect()
}

/// Catalog indices of the visible options for `query`, in catalog order.
pub fn filter_indices<V>(catalog: &[SelectOption<V>], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..catalog.len()).collect();
    }
    let needle = query.to_lowercase();
    catalog
        .iter()
        .enumerate()
        .filter(|(_, o)| o.label.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}
