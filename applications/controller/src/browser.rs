//! Browser session
//!
//! Holds what the sound browser shows: the active tab, the filter form,
//! the pager over the current results, and the rows rendered so far.
//!
//! Every filter or tab change starts a fresh [`Batcher`]. A page pulled
//! from an older batcher is discarded when it comes back, so a slow render
//! never appends into a list that belongs to newer filters.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

use soundscape_catalog::{
    BatchItem, Batcher, BatcherId, CatalogCollection, FilterOptions, FilterOptionsCache,
    PulledBatch,
};
use soundscape_core::{CatalogEntry, PlayingLookup, SoundType};
use tracing::debug;

use crate::error::{ControllerError, Result};
use crate::filter_model::FilterModel;

/// A rendered result row
pub type ResultRow = BatchItem<Arc<CatalogEntry>>;

/// Browser tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserTab {
    /// Moods
    #[default]
    Moods,
    /// One-shot elements
    OneShots,
}

impl BrowserTab {
    /// Catalog partition listed by this tab
    pub fn sound_type(self) -> SoundType {
        match self {
            BrowserTab::Moods => SoundType::Mood,
            BrowserTab::OneShots => SoundType::Element,
        }
    }

    /// Tab name
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserTab::Moods => "moods",
            BrowserTab::OneShots => "oneshots",
        }
    }
}

impl fmt::Display for BrowserTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserTab {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "moods" | "mood" => Ok(BrowserTab::Moods),
            "oneshots" | "elements" | "element" => Ok(BrowserTab::OneShots),
            _ => Err(ControllerError::InvalidInput(format!("unknown tab {s:?}"))),
        }
    }
}

/// State of one browser window.
#[derive(Debug)]
pub struct Browser {
    tab: BrowserTab,
    filters: FilterModel,
    page_size: NonZeroUsize,
    pager: Option<Batcher<Arc<CatalogEntry>>>,
    options: FilterOptionsCache,
    rendered: Vec<ResultRow>,
}

impl Browser {
    /// Create a browser on the moods tab
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            tab: BrowserTab::default(),
            filters: FilterModel::new(),
            page_size,
            pager: None,
            options: FilterOptionsCache::new(),
            rendered: Vec::new(),
        }
    }

    /// Active tab
    pub fn tab(&self) -> BrowserTab {
        self.tab
    }

    /// Current filter form
    pub fn filters(&self) -> &FilterModel {
        &self.filters
    }

    /// Switch tabs; the filter form is reset.
    pub fn change_tab(&mut self, tab: BrowserTab) {
        debug!(from = %self.tab, to = %tab, "Changing tab");
        self.tab = tab;
        self.filters.reset();
        self.invalidate();
    }

    /// Change the selection of one filter field.
    pub fn set_filter<I, S>(&mut self, field: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set(field, values)?;
        self.invalidate();
        Ok(())
    }

    /// Clear the filter form
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.invalidate();
    }

    /// Drop the current results; the next [`show_results`](Self::show_results) starts over.
    pub fn invalidate(&mut self) {
        self.pager = None;
        self.rendered.clear();
    }

    /// Reduce, sort by name and segment the catalog for the current state.
    pub fn show_results(&mut self, catalog: &CatalogCollection) -> BatcherId {
        let config = self.filters.to_configuration(self.tab.sound_type());
        let mut results = catalog.get_by_filter(&config).to_vec();
        results.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        let pager = Batcher::segment(results, self.page_size);
        let id = pager.id();
        debug!(
            tab = %self.tab,
            results = pager.remaining(),
            batcher = ?id,
            "Results segmented"
        );

        self.pager = Some(pager);
        self.rendered.clear();
        id
    }

    /// Take the next page for rendering.
    ///
    /// `None` when there are no results yet or a pull is still in flight.
    /// Hand the page back through [`accept`](Self::accept) once rendered.
    pub fn begin_pull(&mut self, playing: &dyn PlayingLookup) -> Option<PulledBatch<Arc<CatalogEntry>>> {
        self.pager.as_mut()?.try_pull(playing)
    }

    /// Append a rendered page, unless it came from a superseded pager.
    ///
    /// Returns whether the page was appended.
    pub fn accept(&mut self, pulled: PulledBatch<Arc<CatalogEntry>>) -> bool {
        let current = self.pager.as_ref().map(Batcher::id);
        if current != Some(pulled.batcher_id()) {
            debug!(batcher = ?pulled.batcher_id(), current = ?current, "Discarding stale page");
            return false;
        }

        self.rendered.extend(pulled.into_items());
        true
    }

    /// Pull and append the next page in one step.
    ///
    /// Returns the number of rows appended.
    pub fn next_page(&mut self, playing: &dyn PlayingLookup) -> usize {
        let Some(pulled) = self.begin_pull(playing) else {
            return 0;
        };
        let count = pulled.items().len();
        if self.accept(pulled) {
            count
        } else {
            0
        }
    }

    /// Whether every result has been handed out
    pub fn is_exhausted(&self) -> bool {
        self.pager.as_ref().map_or(true, Batcher::is_exhausted)
    }

    /// Rows rendered so far
    pub fn rendered(&self) -> &[ResultRow] {
        &self.rendered
    }

    /// Distinct values for the filter form
    pub fn filter_options(&mut self, catalog: &CatalogCollection) -> &FilterOptions {
        self.options.get(catalog)
    }
}
