//! Soundscape Control - Catalog
//!
//! In-memory catalog of moods and elements, and everything the browser
//! needs to show it incrementally.
//!
//! This crate provides:
//! - [`CatalogCollection`]: type-partitioned table, rebuilt only wholesale
//! - [`FilterConfiguration`] and [`reduce`]: multi-field filtering with
//!   field-name aliasing
//! - [`Batcher`]: lazy, non-restartable paging with a re-entrancy guard
//! - [`FilterOptions`]: distinct values for the filter form
//! - [`CatalogSource`] and [`CsvFileSource`]: where rows come from
//!
//! # Example
//!
//! ```rust
//! use soundscape_catalog::{Batcher, CatalogCollection, FilterConfiguration};
//! use soundscape_core::{CatalogRow, ElementId, PlayingLookup, SoundType};
//! use std::num::NonZeroUsize;
//!
//! struct Silence;
//! impl PlayingLookup for Silence {
//!     fn is_element_playing(&self, _: ElementId) -> bool { false }
//! }
//!
//! let rows = vec![CatalogRow {
//!     id: Some("m:1".into()),
//!     sound_type: Some("mood".into()),
//!     name: Some("Tavern".into()),
//!     product_or_pack: Some("CoreSet".into()),
//!     ..Default::default()
//! }];
//! let catalog = CatalogCollection::from_rows(rows).unwrap();
//!
//! let config = FilterConfiguration::for_type(SoundType::Mood).any_of("product", ["CoreSet"]);
//! let results = catalog.get_by_filter(&config);
//!
//! let mut batcher = Batcher::segment(results.to_vec(), NonZeroUsize::new(25).unwrap());
//! let page = batcher.next_batch(&Silence);
//! assert_eq!(page.len(), 1);
//! assert!(!page[0].playing);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod collection;
mod delimited;
mod error;
pub mod filter;
mod options;
mod source;

// Public exports
pub use batch::{Addressable, BatchItem, Batcher, BatcherId, PulledBatch};
pub use collection::CatalogCollection;
pub use delimited::{parse_delimited, rows_from_delimited};
pub use error::{CatalogError, Result};
pub use filter::{matches, normalize_field_name, reduce, FilterConfiguration, FilterField, FilterValue};
pub use options::{FilterOptions, FilterOptionsCache};
pub use source::{CatalogSource, CsvFileSource};
