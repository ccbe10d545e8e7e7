//! Playback event payload types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::ids::ElementId;
use crate::error::{CoreError, Result};

/// What kind of unit a playback event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackKind {
    /// Low-level sample underlying an element or mood
    Sample,
    /// A triggered element
    Element,
    /// The (single) active mood
    Mood,
}

impl PlaybackKind {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackKind::Sample => "sample",
            PlaybackKind::Element => "element",
            PlaybackKind::Mood => "mood",
        }
    }
}

impl fmt::Display for PlaybackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(PlaybackKind::Sample),
            "element" => Ok(PlaybackKind::Element),
            "mood" => Ok(PlaybackKind::Mood),
            _ => Err(CoreError::UnknownPlaybackKind(s.to_string())),
        }
    }
}

/// Scheduling hints the service attaches to an event.
///
/// Stored verbatim (`playlistEntryId`, `timeToStop`,
/// `timeToStopOrNextSample`, ...) and never interpreted.
pub type PlaybackHints = Map<String, Value>;

/// The `detail` payload of a start or stop event.
///
/// The service may send partial frames, so `element_id` is optional here
/// and checked by the tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackDetail {
    /// Element the event refers to
    #[serde(default, alias = "element_id")]
    pub element_id: Option<ElementId>,

    /// Everything else in the frame
    #[serde(flatten)]
    pub hints: PlaybackHints,
}

impl PlaybackDetail {
    /// Detail carrying only an element id
    pub fn for_element(element_id: impl Into<ElementId>) -> Self {
        Self {
            element_id: Some(element_id.into()),
            hints: Map::new(),
        }
    }

    /// Builder-style hint insertion
    #[must_use]
    pub fn with_hint(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.hints.insert(key.into(), value.into());
        self
    }
}

/// One currently-sounding unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackEntry {
    /// Element id the service reported
    pub element_id: ElementId,
    /// Kind of the start event that created this entry
    pub kind: PlaybackKind,
    /// Opaque scheduling hints from the start event
    #[serde(default)]
    pub hints: PlaybackHints,
}
