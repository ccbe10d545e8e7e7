//! Filter evaluation
//!
//! A [`FilterConfiguration`] holds a type constraint plus any number of
//! field constraints. Field names are normalized through
//! [`normalize_field_name`] before evaluation:
//!
//! | Canonical       | Accepted spellings                                   |
//! |-----------------|------------------------------------------------------|
//! | `productOrPack` | `product`, `pack`, `product_or_pack`, `productOrPack` |
//! | `soundset`      | `set`, `soundset`, `soundset_name`, `soundsetName`    |
//! | `status`        | `status`                                             |
//! | `subCategory`   | `subcategory`, `sub_category`, `subCategory`          |
//! | `subType`       | `subtype`, `sub_type`, `subType`                      |
//! | `type`          | `type`                                               |
//!
//! Matching ignores ASCII case and underscores. Anything else passes through
//! unchanged and is compared against the entry's extra attributes by its
//! literal name.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use soundscape_core::{CatalogEntry, SoundType};
use tracing::debug;

use crate::collection::CatalogCollection;
use crate::error::{CatalogError, Result};

/// A filterable attribute of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    /// Product or pack
    ProductOrPack,
    /// Soundset name
    Soundset,
    /// Publication status
    Status,
    /// Sub category
    SubCategory,
    /// Sub type
    SubType,
    /// Type partition
    Type,
    /// Unrecognised name, compared literally
    Other(String),
}

impl FilterField {
    /// The five fields offered by the browser's filter form
    pub const BROWSABLE: [FilterField; 5] = [
        FilterField::ProductOrPack,
        FilterField::Soundset,
        FilterField::Status,
        FilterField::SubCategory,
        FilterField::SubType,
    ];

    /// Canonical internal name
    pub fn canonical_name(&self) -> &str {
        match self {
            FilterField::ProductOrPack => "productOrPack",
            FilterField::Soundset => "soundset",
            FilterField::Status => "status",
            FilterField::SubCategory => "subCategory",
            FilterField::SubType => "subType",
            FilterField::Type => "type",
            FilterField::Other(name) => name,
        }
    }

    /// The entry's value for this field, if it has one
    pub fn value_of<'a>(&self, entry: &'a CatalogEntry) -> Option<&'a str> {
        match self {
            FilterField::ProductOrPack => entry.product_or_pack.as_deref(),
            FilterField::Soundset => entry.soundset_name.as_deref(),
            FilterField::Status => entry.status.as_deref(),
            FilterField::SubCategory => entry.sub_category.as_deref(),
            FilterField::SubType => entry.sub_type.as_deref(),
            FilterField::Type => Some(entry.sound_type.as_str()),
            FilterField::Other(name) => entry.extra.get(name).map(String::as_str),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Canonicalize a field name.
pub fn normalize_field_name(name: &str) -> FilterField {
    let folded: String = name
        .chars()
        .filter(|&c| c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match folded.as_str() {
        "product" | "pack" | "productorpack" => FilterField::ProductOrPack,
        "set" | "soundset" | "soundsetname" => FilterField::Soundset,
        "status" => FilterField::Status,
        "subcategory" => FilterField::SubCategory,
        "subtype" => FilterField::SubType,
        "type" => FilterField::Type,
        _ => FilterField::Other(name.to_string()),
    }
}

/// Accepted values for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// The attribute must equal this string exactly
    Exact(String),
    /// The attribute must be one of these; empty means no constraint
    AnyOf(BTreeSet<String>),
}

impl FilterValue {
    /// Build a set-membership value
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Whether this value constrains nothing
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, FilterValue::AnyOf(values) if values.is_empty())
    }

    /// Whether an attribute value satisfies this constraint.
    ///
    /// A missing attribute never satisfies a real constraint.
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            FilterValue::Exact(expected) => value == Some(expected.as_str()),
            FilterValue::AnyOf(values) if values.is_empty() => true,
            FilterValue::AnyOf(values) => value.is_some_and(|v| values.contains(v)),
        }
    }
}

/// A complete filter: type constraint plus field constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfiguration {
    /// `None` = any type
    types: Option<BTreeSet<SoundType>>,
    fields: Vec<(FilterField, FilterValue)>,
}

impl FilterConfiguration {
    /// Create an unconstrained configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration restricted to one type partition
    pub fn for_type(sound_type: SoundType) -> Self {
        Self::new().with_type(sound_type)
    }

    /// Add a type to the accepted set
    #[must_use]
    pub fn with_type(mut self, sound_type: SoundType) -> Self {
        self.types
            .get_or_insert_with(BTreeSet::new)
            .insert(sound_type);
        self
    }

    /// Add a constraint under any accepted field-name spelling.
    ///
    /// A `type` constraint is folded into the type set; unknown type names
    /// are kept as an unsatisfiable constraint.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: FilterValue) -> Self {
        self.push(normalize_field_name(name), value);
        self
    }

    /// Shorthand for an exact-match constraint
    #[must_use]
    pub fn exact(self, name: &str, value: impl Into<String>) -> Self {
        self.with_field(name, FilterValue::Exact(value.into()))
    }

    /// Shorthand for a set-membership constraint
    #[must_use]
    pub fn any_of<I, S>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_field(name, FilterValue::any_of(values))
    }

    fn push(&mut self, field: FilterField, value: FilterValue) {
        if field != FilterField::Type {
            self.fields.push((field, value));
            return;
        }

        let names: Vec<String> = match value {
            FilterValue::Exact(name) => vec![name],
            FilterValue::AnyOf(names) if names.is_empty() => return,
            FilterValue::AnyOf(names) => names.into_iter().collect(),
        };

        let types = self.types.get_or_insert_with(BTreeSet::new);
        let mut recognised = false;
        for name in names {
            match name.parse::<SoundType>() {
                Ok(sound_type) => {
                    types.insert(sound_type);
                    recognised = true;
                }
                Err(_) => debug!(sound_type = %name, "Ignoring unknown type in filter"),
            }
        }
        if !recognised {
            // Only unknown names were given: nothing can match
            self.types = Some(BTreeSet::new());
        }
    }

    /// Read a configuration from form-like JSON.
    ///
    /// Each key maps to a string (exact match) or an array of strings (set
    /// membership), e.g. `{"type": ["mood"], "product": ["CoreSet"]}`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| CatalogError::InvalidFilter("expected an object".to_string()))?;

        let mut config = Self::new();
        for (name, raw) in object {
            let value = match raw {
                Value::Null => continue,
                Value::String(s) => FilterValue::Exact(s.clone()),
                Value::Array(items) => {
                    let mut values = BTreeSet::new();
                    for item in items {
                        match item {
                            Value::String(s) => values.insert(s.clone()),
                            Value::Number(n) => values.insert(n.to_string()),
                            other => {
                                return Err(CatalogError::InvalidFilter(format!(
                                    "field {name:?} holds a non-string value {other}"
                                )))
                            }
                        };
                    }
                    FilterValue::AnyOf(values)
                }
                other => {
                    return Err(CatalogError::InvalidFilter(format!(
                        "field {name:?} must be a string or an array, got {other}"
                    )))
                }
            };
            config.push(normalize_field_name(name), value);
        }
        Ok(config)
    }

    /// Accepted types; `None` when unconstrained
    pub fn types(&self) -> Option<&BTreeSet<SoundType>> {
        self.types.as_ref()
    }

    /// Field constraints in insertion order
    pub fn fields(&self) -> &[(FilterField, FilterValue)] {
        &self.fields
    }

    /// The single partition to scan, when exactly one type is accepted
    fn single_type(&self) -> Option<SoundType> {
        match &self.types {
            Some(types) if types.len() == 1 => types.iter().next().copied(),
            _ => None,
        }
    }
}

/// Whether an entry satisfies every constraint of `config`.
pub fn matches(entry: &CatalogEntry, config: &FilterConfiguration) -> bool {
    if let Some(types) = &config.types {
        if !types.contains(&entry.sound_type) {
            return false;
        }
    }

    config
        .fields
        .iter()
        .filter(|(_, value)| !value.is_unconstrained())
        .all(|(field, value)| value.accepts(field.value_of(entry)))
}

/// Filter a collection, preserving the source order.
///
/// Scans only the matching partition when a single type is accepted,
/// otherwise the whole collection.
pub fn reduce(collection: &CatalogCollection, config: &FilterConfiguration) -> CatalogCollection {
    let source = match config.single_type() {
        Some(sound_type) => collection.by_type(sound_type),
        None => {
            return CatalogCollection::from_unique_entries(
                collection.iter().filter(|entry| matches(entry, config)),
            )
        }
    };

    CatalogCollection::from_unique_entries(source.iter().filter(|entry| matches(entry, config)))
}
