/// Core traits for Soundscape Control
use crate::types::{ElementId, SoundId};

/// Anything that can be normalized to the numeric id the tracker keys on.
///
/// Strings may carry a type prefix (`m:12`, `e:12`); the prefix is
/// stripped before parsing. Values that do not normalize are never playing.
pub trait ToElementId {
    /// Normalize to an [`ElementId`], if possible
    fn to_element_id(&self) -> Option<ElementId>;
}

impl ToElementId for ElementId {
    fn to_element_id(&self) -> Option<ElementId> {
        Some(*self)
    }
}

impl ToElementId for SoundId {
    fn to_element_id(&self) -> Option<ElementId> {
        Some(self.element_id())
    }
}

impl ToElementId for u64 {
    fn to_element_id(&self) -> Option<ElementId> {
        Some(ElementId::new(*self))
    }
}

impl ToElementId for str {
    fn to_element_id(&self) -> Option<ElementId> {
        ElementId::from_prefixed(self)
    }
}

impl ToElementId for String {
    fn to_element_id(&self) -> Option<ElementId> {
        ElementId::from_prefixed(self)
    }
}

impl<T: ToElementId + ?Sized> ToElementId for &T {
    fn to_element_id(&self) -> Option<ElementId> {
        (**self).to_element_id()
    }
}

/// Read-only view of "what is playing right now".
///
/// Implemented by the playback tracker; consumed by the result batcher and
/// every UI surface that renders a play/stop affordance.
pub trait PlayingLookup {
    /// Whether `id` is present in the global playing map
    fn is_element_playing(&self, id: ElementId) -> bool;
}

/// Classifies catalog elements as one-shots.
///
/// Implemented by the catalog collection; consumed when a sample stops so
/// host references to one-shots can be forced to "not playing".
pub trait OneShotLookup {
    /// Whether the element with this id is a one-shot
    fn is_one_shot(&self, id: ElementId) -> bool;
}
