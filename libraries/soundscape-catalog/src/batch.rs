//! Lazy result batching
//!
//! A [`Batcher`] hands out a sorted result list one fixed-size page at a
//! time so the UI never renders the whole list at once. It is
//! non-restartable: once drained it only yields empty batches, and any
//! re-filter or re-sort must start a fresh one.
//!
//! Each batcher carries a unique [`BatcherId`]. Callers that render
//! asynchronously compare the id of a finished pull against the batcher
//! currently in use and drop stale results.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use soundscape_core::{CatalogEntry, ElementId, PlayingLookup};

static NEXT_BATCHER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatcherId(u64);

/// Items that can be addressed by a numeric id.
pub trait Addressable {
    /// The normalized numeric id (type prefix stripped)
    fn element_id(&self) -> ElementId;
}

impl Addressable for CatalogEntry {
    fn element_id(&self) -> ElementId {
        self.id
    }
}

impl<T: Addressable + ?Sized> Addressable for Arc<T> {
    fn element_id(&self) -> ElementId {
        (**self).element_id()
    }
}

/// One result decorated for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem<T> {
    /// Numeric id for addressing play/stop actions
    pub id: ElementId,
    /// Whether it was playing when the batch was materialized
    pub playing: bool,
    /// The underlying result
    pub entry: T,
}

/// Splits a sorted sequence into pages of at most `batch_size` items.
#[derive(Debug)]
pub struct Batcher<T> {
    id: BatcherId,
    items: std::vec::IntoIter<T>,
    batch_size: NonZeroUsize,
    in_flight: Arc<AtomicBool>,
}

impl<T> Batcher<T> {
    /// Start a new segmentation of `sorted`.
    pub fn segment<I>(sorted: I, batch_size: NonZeroUsize) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            id: BatcherId(NEXT_BATCHER_ID.fetch_add(1, Ordering::Relaxed)),
            items: sorted.into_iter().collect::<Vec<_>>().into_iter(),
            batch_size,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Identity of this segmentation
    pub fn id(&self) -> BatcherId {
        self.id
    }

    /// Page size
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Number of items not yet handed out
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// Check if every item has been handed out
    pub fn is_exhausted(&self) -> bool {
        self.items.as_slice().is_empty()
    }

    /// Whether a pull taken with [`try_pull`](Self::try_pull) is still alive
    pub fn is_pull_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn take_page(&mut self) -> Vec<T> {
        self.items.by_ref().take(self.batch_size.get()).collect()
    }
}

impl<T: Addressable> Batcher<T> {
    /// Materialize the next page.
    ///
    /// `playing` is queried now, not at segmentation time. Returns an empty
    /// vector once the input is exhausted.
    pub fn next_batch(&mut self, playing: &dyn PlayingLookup) -> Vec<BatchItem<T>> {
        self.take_page()
            .into_iter()
            .map(|entry| {
                let id = entry.element_id();
                BatchItem {
                    id,
                    playing: playing.is_element_playing(id),
                    entry,
                }
            })
            .collect()
    }

    /// Materialize the next page unless another pull is still in flight.
    ///
    /// The in-flight flag is set before this returns and cleared when the
    /// returned [`PulledBatch`] is dropped, so hold on to it for the whole
    /// asynchronous rendering step.
    pub fn try_pull(&mut self, playing: &dyn PlayingLookup) -> Option<PulledBatch<T>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        let permit = PullPermit {
            flag: Arc::clone(&self.in_flight),
        };
        Some(PulledBatch {
            batcher: self.id,
            items: self.next_batch(playing),
            _permit: permit,
        })
    }
}

impl<T> Iterator for Batcher<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.take_page();
        if page.is_empty() {
            None
        } else {
            Some(page)
        }
    }
}

/// Clears the in-flight flag of its batcher on drop.
#[derive(Debug)]
struct PullPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for PullPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A page taken under the re-entrancy guard.
#[derive(Debug)]
pub struct PulledBatch<T> {
    batcher: BatcherId,
    items: Vec<BatchItem<T>>,
    _permit: PullPermit,
}

impl<T> PulledBatch<T> {
    /// The batcher this page came from
    pub fn batcher_id(&self) -> BatcherId {
        self.batcher
    }

    /// The decorated items
    pub fn items(&self) -> &[BatchItem<T>] {
        &self.items
    }

    /// Check if the page is empty (input exhausted)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take the items, releasing the in-flight flag
    pub fn into_items(self) -> Vec<BatchItem<T>> {
        self.items
    }
}
