//! Indexed, type-partitioned catalog
//!
//! Structure:
//! ```text
//! entries (global, insertion order)
//!   m:1  e:1  m:2  e:7  ...
//! ─────────────────────────────
//! moods partition:     m:1  m:2
//! elements partition:  e:1  e:7
//! ```
//!
//! Every entry lives in the global sequence and in exactly one partition.
//! The only mutation is a full [`CatalogCollection::rebuild`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use soundscape_core::{CatalogEntry, CatalogRow, ElementId, OneShotLookup, SoundId, SoundType};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::filter::{self, FilterConfiguration};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// In-memory table of catalog entries.
#[derive(Debug, Clone)]
pub struct CatalogCollection {
    /// All entries, in input order
    entries: Vec<Arc<CatalogEntry>>,

    /// Type-qualified id -> position in `entries`
    index: HashMap<(SoundType, ElementId), usize>,

    /// Mood partition, in input order
    moods: Vec<Arc<CatalogEntry>>,

    /// Element partition, in input order
    elements: Vec<Arc<CatalogEntry>>,

    /// Changes whenever the contents are replaced
    generation: u64,
}

impl Default for CatalogCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            moods: Vec::new(),
            elements: Vec::new(),
            generation: next_generation(),
        }
    }

    /// Build a collection from raw rows.
    ///
    /// Fails on the first malformed row or duplicate id; no partial
    /// collection is returned.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = CatalogRow>,
    {
        let mut collection = Self::new();
        for (row, raw) in rows.into_iter().enumerate() {
            let entry = CatalogEntry::from_row(raw)
                .map_err(|source| CatalogError::MalformedRow { row, source })?;
            let id = entry.sound_id();
            if !collection.insert(Arc::new(entry)) {
                return Err(CatalogError::DuplicateEntry { row, id });
            }
        }

        debug!(
            entries = collection.len(),
            moods = collection.moods.len(),
            elements = collection.elements.len(),
            "Built catalog collection"
        );

        Ok(collection)
    }

    /// Replace the whole contents with freshly fetched rows.
    ///
    /// On error the collection keeps its previous contents.
    pub fn rebuild<I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = CatalogRow>,
    {
        *self = Self::from_rows(rows)?;
        Ok(())
    }

    /// Build from entries already known to be unique (filter results).
    pub(crate) fn from_unique_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Arc<CatalogEntry>>,
    {
        let mut collection = Self::new();
        for entry in entries {
            collection.insert(Arc::clone(entry));
        }
        collection
    }

    /// Insert into the global index and the matching partition.
    ///
    /// Returns `false` (and inserts nothing) if the id is already present.
    fn insert(&mut self, entry: Arc<CatalogEntry>) -> bool {
        let key = (entry.sound_type, entry.id);
        if self.index.contains_key(&key) {
            return false;
        }

        self.index.insert(key, self.entries.len());
        match entry.sound_type {
            SoundType::Mood => self.moods.push(Arc::clone(&entry)),
            SoundType::Element => self.elements.push(Arc::clone(&entry)),
        }
        self.entries.push(entry);
        true
    }

    /// The backing sequence of one type partition
    pub fn by_type(&self, sound_type: SoundType) -> &[Arc<CatalogEntry>] {
        match sound_type {
            SoundType::Mood => &self.moods,
            SoundType::Element => &self.elements,
        }
    }

    /// Like [`by_type`](Self::by_type) for an untyped tag; `None` for unknown tags.
    pub fn by_type_name(&self, sound_type: &str) -> Option<&[Arc<CatalogEntry>]> {
        sound_type.parse().ok().map(|t| self.by_type(t))
    }

    /// Look up an entry by type and number
    pub fn get(&self, sound_type: SoundType, id: ElementId) -> Option<&Arc<CatalogEntry>> {
        self.index
            .get(&(sound_type, id))
            .and_then(|&pos| self.entries.get(pos))
    }

    /// Look up an entry by a possibly-prefixed id.
    ///
    /// Bare ids are tried as a mood first, then as an element.
    pub fn get_by_id(&self, id: SoundId) -> Option<&Arc<CatalogEntry>> {
        match id.kind() {
            Some(kind) => self.get(kind, id.element_id()),
            None => SoundType::ALL
                .iter()
                .find_map(|&kind| self.get(kind, id.element_id())),
        }
    }

    /// Reduce the collection by a filter configuration.
    pub fn get_by_filter(&self, config: &FilterConfiguration) -> CatalogCollection {
        filter::reduce(self, config)
    }

    /// All entries in input order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CatalogEntry>> {
        self.entries.iter()
    }

    /// Copy of the entry handles, for sorting and batching
    pub fn to_vec(&self) -> Vec<Arc<CatalogEntry>> {
        self.entries.clone()
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifier of this particular set of contents.
    ///
    /// Two collections never share a generation, so caches keyed on it are
    /// invalidated by every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl OneShotLookup for CatalogCollection {
    fn is_one_shot(&self, id: ElementId) -> bool {
        self.get(SoundType::Element, id)
            .is_some_and(|entry| entry.is_one_shot())
    }
}

impl<'a> IntoIterator for &'a CatalogCollection {
    type Item = &'a Arc<CatalogEntry>;
    type IntoIter = std::slice::Iter<'a, Arc<CatalogEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscape_core::CoreError;

    fn row(id: &str, sound_type: &str, name: &str) -> CatalogRow {
        CatalogRow {
            id: Some(id.to_string()),
            sound_type: Some(sound_type.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn entries_land_in_global_index_and_one_partition() {
        let collection = CatalogCollection::from_rows(vec![
            row("m:1", "mood", "Tavern"),
            row("e:1", "element", "Door creak"),
            row("m:2", "mood", "Forest"),
        ])
        .unwrap();

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.by_type(SoundType::Mood).len(), 2);
        assert_eq!(collection.by_type(SoundType::Element).len(), 1);

        // Same number, different type: both resolvable
        let mood = collection.get(SoundType::Mood, ElementId::new(1)).unwrap();
        let element = collection.get(SoundType::Element, ElementId::new(1)).unwrap();
        assert_eq!(mood.name, "Tavern");
        assert_eq!(element.name, "Door creak");
    }

    #[test]
    fn get_by_id_honours_prefix() {
        let collection = CatalogCollection::from_rows(vec![
            row("m:1", "mood", "Tavern"),
            row("e:1", "element", "Door creak"),
        ])
        .unwrap();

        let element = collection.get_by_id("e:1".parse().unwrap()).unwrap();
        assert_eq!(element.sound_type, SoundType::Element);

        let bare = collection.get_by_id(SoundId::from(1)).unwrap();
        assert_eq!(bare.sound_type, SoundType::Mood);

        assert!(collection.get_by_id(SoundId::from(99)).is_none());
    }

    #[test]
    fn by_type_name_rejects_unknown_tags() {
        let collection = CatalogCollection::new();
        assert!(collection.by_type_name("mood").is_some());
        assert!(collection.by_type_name("playlist").is_none());
    }

    #[test]
    fn failed_rebuild_keeps_previous_contents() {
        let mut collection =
            CatalogCollection::from_rows(vec![row("m:1", "mood", "Tavern")]).unwrap();
        let generation = collection.generation();

        let mut broken = row("m:2", "mood", "Forest");
        broken.name = None;
        let err = collection
            .rebuild(vec![row("m:3", "mood", "Cave"), broken])
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::MalformedRow {
                row: 1,
                source: CoreError::MissingField("name")
            }
        ));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.generation(), generation);
        assert!(collection.get(SoundType::Mood, ElementId::new(1)).is_some());
    }

    #[test]
    fn duplicate_ids_within_a_partition_fail() {
        let err = CatalogCollection::from_rows(vec![
            row("e:4", "element", "Bang"),
            row("4", "element", "Bang again"),
        ])
        .unwrap_err();

        match err {
            CatalogError::DuplicateEntry { row, id } => {
                assert_eq!(row, 1);
                assert_eq!(id.to_string(), "e:4");
            }
            e => panic!("Expected DuplicateEntry, got: {:?}", e),
        }
    }

    #[test]
    fn rebuild_changes_generation() {
        let mut collection = CatalogCollection::new();
        let before = collection.generation();
        collection.rebuild(vec![row("m:1", "mood", "Tavern")]).unwrap();
        assert_ne!(collection.generation(), before);
    }

    #[test]
    fn one_shot_lookup_only_considers_elements() {
        let mut one_shot = row("e:9", "element", "Thunder");
        one_shot.sub_type = Some("oneshot".to_string());
        let mut mood = row("m:9", "mood", "Storm");
        mood.sub_type = Some("oneshot".to_string());

        let collection = CatalogCollection::from_rows(vec![mood, one_shot]).unwrap();
        assert!(collection.is_one_shot(ElementId::new(9)));
        assert!(!collection.is_one_shot(ElementId::new(10)));
    }
}
