//! Playback tracker
//!
//! Mirrors what the remote service reports as playing. One global map
//! `ElementId -> PlaybackEntry` is the authority for [`PlaybackTracker::is_playing`];
//! three per-kind id sets shadow it for kind-scoped queries.
//!
//! Every id in a kind set is in the global map with that kind, and every
//! global entry is in the set of its kind. Each operation restores this
//! before returning; none of them suspend.

use std::collections::{HashMap, HashSet};

use soundscape_core::{
    ElementId, PlaybackDetail, PlaybackEntry, PlaybackKind, PlayingLookup, ToElementId,
};
use tracing::{debug, warn};

/// What to stop.
#[derive(Debug, Clone, PartialEq)]
pub enum StopTarget {
    /// The element named by the detail
    Entry(PlaybackDetail),
    /// Everything of the given kind (the service's "stop all" for moods)
    All,
}

/// Outcome of one tracker operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// An entry was inserted or overwritten
    Started {
        /// Kind of the start
        kind: PlaybackKind,
        /// Element now playing
        id: ElementId,
        /// Mood that was displaced to make room, if any
        evicted: Option<ElementId>,
    },

    /// A single element stop was processed
    Stopped {
        /// Kind of the stop
        kind: PlaybackKind,
        /// Element named by the stop
        id: ElementId,
        /// Whether a matching entry was actually removed
        removed: bool,
    },

    /// Every entry of a kind was cleared
    StoppedAll {
        /// Kind that was cleared
        kind: PlaybackKind,
        /// Number of entries removed
        count: usize,
    },

    /// The frame was incomplete and dropped
    Ignored,
}

/// In-memory record of what is currently playing.
#[derive(Debug, Clone, Default)]
pub struct PlaybackTracker {
    /// Authoritative "is playing" map
    playing: HashMap<ElementId, PlaybackEntry>,

    samples: HashSet<ElementId>,
    elements: HashSet<ElementId>,
    moods: HashSet<ElementId>,
}

impl PlaybackTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    fn set_mut(&mut self, kind: PlaybackKind) -> &mut HashSet<ElementId> {
        match kind {
            PlaybackKind::Sample => &mut self.samples,
            PlaybackKind::Element => &mut self.elements,
            PlaybackKind::Mood => &mut self.moods,
        }
    }

    fn set(&self, kind: PlaybackKind) -> &HashSet<ElementId> {
        match kind {
            PlaybackKind::Sample => &self.samples,
            PlaybackKind::Element => &self.elements,
            PlaybackKind::Mood => &self.moods,
        }
    }

    /// Record a start event.
    ///
    /// A mood start first evicts the active mood. A repeated start for the
    /// same id overwrites the previous entry, even across kinds.
    pub fn record_start(&mut self, kind: PlaybackKind, detail: PlaybackDetail) -> Applied {
        let Some(id) = detail.element_id else {
            warn!(kind = %kind, hints = ?detail.hints, "Start event without elementId, ignoring");
            return Applied::Ignored;
        };

        let evicted = if kind == PlaybackKind::Mood {
            self.evict_moods(id)
        } else {
            None
        };

        let entry = PlaybackEntry {
            element_id: id,
            kind,
            hints: detail.hints,
        };
        if let Some(previous) = self.playing.insert(id, entry) {
            if previous.kind != kind {
                self.set_mut(previous.kind).remove(&id);
            }
        }
        self.set_mut(kind).insert(id);

        debug!(kind = %kind, element_id = %id, evicted = ?evicted, "Playback started");
        Applied::Started { kind, id, evicted }
    }

    /// Remove every mood other than `keep` from both structures.
    fn evict_moods(&mut self, keep: ElementId) -> Option<ElementId> {
        let moods: Vec<ElementId> = self.moods.drain().collect();
        let mut evicted = None;
        for mood in moods {
            self.playing.remove(&mood);
            if mood != keep {
                evicted = Some(mood);
            }
        }
        evicted
    }

    /// Record a stop event.
    ///
    /// A single stop removes the id whatever kind it is tracked under, from
    /// the global map and from that kind's set.
    pub fn record_stop(&mut self, kind: PlaybackKind, target: StopTarget) -> Applied {
        match target {
            StopTarget::All => {
                let ids: Vec<ElementId> = self.set_mut(kind).drain().collect();
                for id in &ids {
                    self.playing.remove(id);
                }
                debug!(kind = %kind, count = ids.len(), "Stopped all");
                Applied::StoppedAll {
                    kind,
                    count: ids.len(),
                }
            }
            StopTarget::Entry(detail) => {
                let Some(id) = detail.element_id else {
                    warn!(kind = %kind, hints = ?detail.hints, "Stop event without elementId, ignoring");
                    return Applied::Ignored;
                };

                let removed = match self.playing.remove(&id) {
                    Some(entry) => {
                        self.set_mut(entry.kind).remove(&id);
                        if entry.kind != kind {
                            debug!(
                                kind = %kind,
                                playing_as = %entry.kind,
                                element_id = %id,
                                "Stop kind differs from the running kind"
                            );
                        }
                        true
                    }
                    None => false,
                };

                debug!(kind = %kind, element_id = %id, removed, "Playback stopped");
                Applied::Stopped { kind, id, removed }
            }
        }
    }

    /// Whether `id` is playing, in any kind.
    ///
    /// Accepts numeric ids and prefixed strings alike (`12`, `"m:12"`,
    /// `"e:12"`); anything that does not normalize is not playing.
    pub fn is_playing<Q: ToElementId + ?Sized>(&self, id: &Q) -> bool {
        id.to_element_id()
            .is_some_and(|id| self.playing.contains_key(&id))
    }

    /// Whether `id` is playing as the given kind
    pub fn is_kind_playing<Q: ToElementId + ?Sized>(&self, kind: PlaybackKind, id: &Q) -> bool {
        id.to_element_id()
            .is_some_and(|id| self.set(kind).contains(&id))
    }

    /// Entry for `id`, if playing
    pub fn get(&self, id: ElementId) -> Option<&PlaybackEntry> {
        self.playing.get(&id)
    }

    /// The mood currently playing
    pub fn active_mood(&self) -> Option<&PlaybackEntry> {
        self.moods.iter().next().and_then(|id| self.playing.get(id))
    }

    /// Ids playing as `kind`, in no particular order
    pub fn playing_ids(&self, kind: PlaybackKind) -> impl Iterator<Item = ElementId> + '_ {
        self.set(kind).iter().copied()
    }

    /// Every playing entry, in no particular order
    pub fn entries(&self) -> impl Iterator<Item = &PlaybackEntry> {
        self.playing.values()
    }

    /// Number of playing entries
    pub fn len(&self) -> usize {
        self.playing.len()
    }

    /// Check if nothing is playing
    pub fn is_empty(&self) -> bool {
        self.playing.is_empty()
    }

    /// Forget everything (session teardown)
    pub fn clear(&mut self) {
        self.playing.clear();
        self.samples.clear();
        self.elements.clear();
        self.moods.clear();
    }

    /// Check that the kind sets and the global map agree
    pub fn is_consistent(&self) -> bool {
        let sets_total = self.samples.len() + self.elements.len() + self.moods.len();
        sets_total == self.playing.len()
            && self.moods.len() <= 1
            && self
                .playing
                .iter()
                .all(|(id, entry)| entry.element_id == *id && self.set(entry.kind).contains(id))
    }
}

impl PlayingLookup for PlaybackTracker {
    fn is_element_playing(&self, id: ElementId) -> bool {
        self.playing.contains_key(&id)
    }
}
