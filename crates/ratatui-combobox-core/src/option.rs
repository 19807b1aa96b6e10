use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::error::CatalogError;

/// One selectable entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption<V> {
    pub value: V,
    pub label: String,
    pub disabled: bool,
}

impl<V> SelectOption<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// The full, immutable option list of one dropdown instance.
///
/// Cloning is cheap (shared storage). Every successful [`OptionCatalog::new`] gets a fresh
/// revision, which is what the controller compares when a caller swaps catalogs.
#[derive(Clone)]
pub struct OptionCatalog<V> {
    options: Arc<[SelectOption<V>]>,
    revision: u64,
}

impl<V: fmt::Debug> fmt::Debug for OptionCatalog<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionCatalog")
            .field("revision", &self.revision)
            .field("options", &self.options)
            .finish()
    }
}

impl<V: PartialEq> OptionCatalog<V> {
    /// Builds a catalog, rejecting blank labels and duplicate values.
    pub fn new(options: Vec<SelectOption<V>>) -> Result<Self, CatalogError> {
        for (index, opt) in options.iter().enumerate() {
            if opt.label.trim().is_empty() {
                return Err(CatalogError::EmptyLabel { index });
            }
            if let Some(first) = options[..index].iter().position(|o| o.value == opt.value) {
                return Err(CatalogError::DuplicateValue { index, first });
            }
        }
        Ok(Self {
            options: options.into(),
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
        })
    }

    pub fn find(&self, value: &V) -> Option<&SelectOption<V>> {
        self.options.iter().find(|o| &o.value == value)
    }

    pub fn position(&self, value: &V) -> Option<usize> {
        self.options.iter().position(|o| &o.value == value)
    }

    pub fn label_of(&self, value: &V) -> Option<&str> {
        self.find(value).map(|o| o.label.as_str())
    }
}

impl<V> OptionCatalog<V> {
    pub fn empty() -> Self {
        Self {
            options: Vec::new().into(),
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn as_slice(&self) -> &[SelectOption<V>] {
        &self.options
    }
}

impl<V> Deref for OptionCatalog<V> {
    type Target = [SelectOption<V>];

    fn deref(&self) -> &Self::Target {
        &self.options
    }
}

impl<V> Default for OptionCatalog<V> {
    fn default() -> Self {
        Self::empty()
    }
}
