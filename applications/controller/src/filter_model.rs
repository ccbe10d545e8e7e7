//! Filter form state of the browser

use soundscape_catalog::{normalize_field_name, FilterConfiguration, FilterField};
use soundscape_core::SoundType;
use std::collections::BTreeSet;

use crate::error::{ControllerError, Result};

/// Selected values of the five browsable fields.
///
/// Built from the current form state; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterModel {
    product: BTreeSet<String>,
    soundset: BTreeSet<String>,
    status: BTreeSet<String>,
    subcategory: BTreeSet<String>,
    subtype: BTreeSet<String>,
}

impl FilterModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, field: &FilterField) -> Option<&BTreeSet<String>> {
        match field {
            FilterField::ProductOrPack => Some(&self.product),
            FilterField::Soundset => Some(&self.soundset),
            FilterField::Status => Some(&self.status),
            FilterField::SubCategory => Some(&self.subcategory),
            FilterField::SubType => Some(&self.subtype),
            FilterField::Type | FilterField::Other(_) => None,
        }
    }

    fn slot_mut(&mut self, field: &FilterField) -> Option<&mut BTreeSet<String>> {
        match field {
            FilterField::ProductOrPack => Some(&mut self.product),
            FilterField::Soundset => Some(&mut self.soundset),
            FilterField::Status => Some(&mut self.status),
            FilterField::SubCategory => Some(&mut self.subcategory),
            FilterField::SubType => Some(&mut self.subtype),
            FilterField::Type | FilterField::Other(_) => None,
        }
    }

    /// Replace the selection of one field, named by any accepted spelling.
    pub fn set<I, S>(&mut self, name: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = normalize_field_name(name);
        let slot = self
            .slot_mut(&field)
            .ok_or_else(|| ControllerError::InvalidInput(format!("{name:?} is not a filter field")))?;
        *slot = values.into_iter().map(Into::into).collect();
        Ok(())
    }

    /// Selected values of one field
    pub fn values(&self, field: &FilterField) -> impl Iterator<Item = &str> {
        self.slot(field)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        FilterField::BROWSABLE
            .iter()
            .all(|field| self.slot(field).map_or(true, BTreeSet::is_empty))
    }

    /// Clear every selection
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Filter configuration for one tab; fields with no selection are left out.
    pub fn to_configuration(&self, sound_type: SoundType) -> FilterConfiguration {
        FilterField::BROWSABLE.iter().fold(
            FilterConfiguration::for_type(sound_type),
            |config, field| match self.slot(field) {
                Some(values) if !values.is_empty() => {
                    config.any_of(field.canonical_name(), values.iter().cloned())
                }
                _ => config,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_dropped() {
        let mut model = FilterModel::new();
        model.set("product", ["CoreSet"]).unwrap();

        let config = model.to_configuration(SoundType::Mood);
        assert_eq!(config.fields().len(), 1);
        assert_eq!(config.fields()[0].0, FilterField::ProductOrPack);
        assert!(config.types().unwrap().contains(&SoundType::Mood));
    }

    #[test]
    fn test_aliases_address_the_same_field() {
        let mut model = FilterModel::new();
        model.set("sub_type", ["oneshot"]).unwrap();
        model.set("subType", ["music", "oneshot"]).unwrap();

        let values: Vec<&str> = model.values(&FilterField::SubType).collect();
        assert_eq!(values, vec!["music", "oneshot"]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let mut model = FilterModel::new();
        assert!(model.set("type", ["mood"]).is_err());
        assert!(model.set("colour", ["red"]).is_err());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut model = FilterModel::new();
        model.set("pack", ["CoreSet"]).unwrap();
        model.set("status", ["Live"]).unwrap();
        assert!(!model.is_empty());

        model.reset();
        assert!(model.is_empty());
        assert_eq!(model.to_configuration(SoundType::Element).fields().len(), 0);
    }
}
