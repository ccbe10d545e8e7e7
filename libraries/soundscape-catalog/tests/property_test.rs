//! Property-based tests for the catalog
//!
//! Uses proptest to verify filtering and batching invariants across many
//! random catalogs.

use proptest::prelude::*;
use soundscape_catalog::{
    matches, reduce, Batcher, CatalogCollection, FilterConfiguration, FilterValue,
};
use soundscape_core::{CatalogRow, ElementId, PlayingLookup, SoundType};
use std::num::NonZeroUsize;

// ===== Helpers =====

struct NothingPlaying;

impl PlayingLookup for NothingPlaying {
    fn is_element_playing(&self, _id: ElementId) -> bool {
        false
    }
}

const PRODUCTS: [&str; 3] = ["CoreSet", "Expansion", "Bundle"];
const STATUSES: [&str; 2] = ["Live", "Beta"];

fn arbitrary_row() -> impl Strategy<Value = (bool, usize, Option<usize>)> {
    (any::<bool>(), 0..PRODUCTS.len(), proptest::option::of(0..STATUSES.len()))
}

/// Rows with unique ids, mixed across both partitions
fn arbitrary_catalog() -> impl Strategy<Value = CatalogCollection> {
    prop::collection::vec(arbitrary_row(), 0..60).prop_map(|rows| {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, (is_mood, product, status))| CatalogRow {
                id: Some(i.to_string()),
                sound_type: Some(if is_mood { "mood" } else { "element" }.to_string()),
                name: Some(format!("Sound {i}")),
                product_or_pack: Some(PRODUCTS[product].to_string()),
                status: status.map(|s| STATUSES[s].to_string()),
                ..Default::default()
            });
        CatalogCollection::from_rows(rows).unwrap()
    })
}

fn arbitrary_type() -> impl Strategy<Value = Option<SoundType>> {
    prop_oneof![
        Just(None),
        Just(Some(SoundType::Mood)),
        Just(Some(SoundType::Element)),
    ]
}

fn arbitrary_products() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(PRODUCTS.to_vec(), 0..=PRODUCTS.len())
}

fn config_for(sound_type: Option<SoundType>) -> FilterConfiguration {
    match sound_type {
        Some(t) => FilterConfiguration::for_type(t),
        None => FilterConfiguration::new(),
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: reduce keeps the relative order of the scanned partition
    #[test]
    fn filter_is_stable(
        catalog in arbitrary_catalog(),
        sound_type in arbitrary_type(),
        products in arbitrary_products(),
    ) {
        let config = config_for(sound_type).any_of("pack", products);
        let reduced = reduce(&catalog, &config);

        let expected: Vec<_> = match sound_type {
            Some(t) => catalog.by_type(t).to_vec(),
            None => catalog.to_vec(),
        }
        .into_iter()
        .filter(|entry| matches(entry, &config))
        .map(|entry| entry.sound_id())
        .collect();

        let actual: Vec<_> = reduced.iter().map(|entry| entry.sound_id()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: an empty accepted set never changes the outcome
    #[test]
    fn empty_constraint_is_neutral(
        catalog in arbitrary_catalog(),
        sound_type in arbitrary_type(),
        products in arbitrary_products(),
        empty_field in prop::sample::select(vec!["status", "subtype", "soundset", "somethingElse"]),
    ) {
        let without = config_for(sound_type).any_of("product", products.clone());
        let with = without
            .clone()
            .with_field(empty_field, FilterValue::any_of(Vec::<String>::new()));

        for entry in &catalog {
            prop_assert_eq!(matches(entry, &without), matches(entry, &with));
        }
    }

    /// Property: every reduced entry satisfies the configuration
    #[test]
    fn reduced_entries_all_match(
        catalog in arbitrary_catalog(),
        sound_type in arbitrary_type(),
        status in prop::sample::select(STATUSES.to_vec()),
    ) {
        let config = config_for(sound_type).exact("status", status);
        let reduced = catalog.get_by_filter(&config);

        for entry in &reduced {
            prop_assert_eq!(entry.status.as_deref(), Some(status));
            if let Some(t) = sound_type {
                prop_assert_eq!(entry.sound_type, t);
            }
        }
    }

    /// Property: concatenated batches reproduce the input, all full but the last
    #[test]
    fn batches_are_complete(
        items in prop::collection::vec(any::<u64>(), 0..200),
        size in 1usize..20,
    ) {
        let batch_size = NonZeroUsize::new(size).unwrap();
        let pages: Vec<Vec<u64>> = Batcher::segment(items.clone(), batch_size).collect();

        if let Some((_, full)) = pages.split_last() {
            prop_assert!(full.iter().all(|page| page.len() == size));
        }
        prop_assert!(pages.iter().all(|page| !page.is_empty() && page.len() <= size));
        prop_assert_eq!(pages.concat(), items);
    }

    /// Property: nextBatch drains the same entries until it returns empty
    #[test]
    fn next_batch_drains_catalog(
        catalog in arbitrary_catalog(),
        size in 1usize..10,
    ) {
        let mut batcher = Batcher::segment(catalog.to_vec(), NonZeroUsize::new(size).unwrap());
        let mut seen = Vec::new();
        loop {
            let page = batcher.next_batch(&NothingPlaying);
            if page.is_empty() {
                break;
            }
            prop_assert!(page.len() <= size);
            seen.extend(page.into_iter().map(|item| item.entry.sound_id()));
        }

        let expected: Vec<_> = catalog.iter().map(|entry| entry.sound_id()).collect();
        prop_assert_eq!(seen, expected);
        prop_assert!(batcher.next_batch(&NothingPlaying).is_empty());
    }
}
