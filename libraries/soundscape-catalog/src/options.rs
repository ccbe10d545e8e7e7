//! Distinct filter values offered to the user
//!
//! Computed once per catalog contents and reused until the catalog is
//! rebuilt.

use std::collections::{BTreeMap, BTreeSet};

use crate::collection::CatalogCollection;
use crate::filter::FilterField;

/// Distinct values present in the catalog, per browsable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    values: BTreeMap<FilterField, BTreeSet<String>>,
}

impl FilterOptions {
    /// Scan a collection for every value of the browsable fields
    pub fn from_collection(collection: &CatalogCollection) -> Self {
        let mut values: BTreeMap<FilterField, BTreeSet<String>> = FilterField::BROWSABLE
            .iter()
            .map(|field| (field.clone(), BTreeSet::new()))
            .collect();

        for entry in collection {
            for (field, seen) in &mut values {
                if let Some(value) = field.value_of(entry) {
                    seen.insert(value.to_string());
                }
            }
        }

        Self { values }
    }

    /// Values for one field (empty for fields that are not browsable)
    pub fn values(&self, field: &FilterField) -> impl Iterator<Item = &str> {
        self.values
            .get(field)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Iterate over `(field, values)` in field order
    pub fn iter(&self) -> impl Iterator<Item = (&FilterField, &BTreeSet<String>)> {
        self.values.iter()
    }
}

/// Lazily computed [`FilterOptions`], invalidated by catalog rebuilds.
#[derive(Debug, Default)]
pub struct FilterOptionsCache {
    cached: Option<(u64, FilterOptions)>,
}

impl FilterOptionsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for `collection`, recomputed only if its contents changed
    pub fn get(&mut self, collection: &CatalogCollection) -> &FilterOptions {
        let generation = collection.generation();
        if self
            .cached
            .as_ref()
            .is_some_and(|(cached, _)| *cached != generation)
        {
            self.cached = None;
        }

        &self
            .cached
            .get_or_insert_with(|| (generation, FilterOptions::from_collection(collection)))
            .1
    }

    /// Forget the cached options
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
