//! Remote playback events
//!
//! Frames pushed by the remote service, decoded from JSON:
//!
//! ```json
//! {"event": "sampleStart", "detail": {"elementId": 12, "timeToStop": 4.2}}
//! {"event": "elementStop", "detail": {"elementId": 12}}
//! {"event": "moodMessage", "kind": "full", "params": {"moodId": 3}}
//! {"event": "moodMessage", "kind": "stopAll"}
//! ```
//!
//! Events are applied in arrival order; nothing is reordered or coalesced.

use serde::{Deserialize, Serialize};
use soundscape_core::{ElementId, PlaybackDetail, PlaybackHints, PlaybackKind};
use std::io::BufRead;
use tracing::warn;

use crate::error::Result;
use crate::tracker::{Applied, PlaybackTracker, StopTarget};

/// One frame from the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RemoteEvent {
    /// A sample began sounding
    SampleStart {
        /// Event payload
        #[serde(default)]
        detail: PlaybackDetail,
    },
    /// A sample finished
    SampleStop {
        /// Event payload
        #[serde(default)]
        detail: PlaybackDetail,
    },
    /// An element was started
    ElementStart {
        /// Event payload
        #[serde(default)]
        detail: PlaybackDetail,
    },
    /// An element was stopped
    ElementStop {
        /// Event payload
        #[serde(default)]
        detail: PlaybackDetail,
    },
    /// Mood change notification
    MoodMessage(MoodMessage),
}

/// Kind of mood notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoodMessageKind {
    /// A mood was started from scratch
    Full,
    /// The running mood was changed in place
    Partial,
    /// The service stopped everything
    StopAll,
}

/// Payload of a mood notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodMessage {
    /// What happened
    pub kind: MoodMessageKind,
    /// Parameters; `moodId` identifies the mood
    #[serde(default)]
    pub params: MoodParams,
}

/// Mood parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodParams {
    /// Mood being played
    #[serde(default, alias = "mood_id", alias = "elementId")]
    pub mood_id: Option<ElementId>,

    /// Everything else in the frame
    #[serde(flatten)]
    pub hints: PlaybackHints,
}

impl MoodParams {
    /// Map `moodId` onto `elementId` so the tracker sees a regular detail
    pub fn into_detail(self) -> PlaybackDetail {
        PlaybackDetail {
            element_id: self.mood_id,
            hints: self.hints,
        }
    }
}

impl RemoteEvent {
    /// Decode one JSON frame
    pub fn from_json(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }

    /// Kind of playback this event concerns
    pub fn kind(&self) -> PlaybackKind {
        match self {
            RemoteEvent::SampleStart { .. } | RemoteEvent::SampleStop { .. } => {
                PlaybackKind::Sample
            }
            RemoteEvent::ElementStart { .. } | RemoteEvent::ElementStop { .. } => {
                PlaybackKind::Element
            }
            RemoteEvent::MoodMessage(_) => PlaybackKind::Mood,
        }
    }
}

/// Apply one event to the tracker.
///
/// Full and partial mood messages are both mood starts; `stopAll` clears
/// the moods only.
pub fn apply_event(tracker: &mut PlaybackTracker, event: RemoteEvent) -> Applied {
    let kind = event.kind();
    match event {
        RemoteEvent::SampleStart { detail } | RemoteEvent::ElementStart { detail } => {
            tracker.record_start(kind, detail)
        }
        RemoteEvent::SampleStop { detail } | RemoteEvent::ElementStop { detail } => {
            tracker.record_stop(kind, StopTarget::Entry(detail))
        }
        RemoteEvent::MoodMessage(message) => match message.kind {
            MoodMessageKind::Full | MoodMessageKind::Partial => {
                tracker.record_start(kind, message.params.into_detail())
            }
            MoodMessageKind::StopAll => tracker.record_stop(kind, StopTarget::All),
        },
    }
}

/// Decode a recorded event stream, one JSON frame per line.
///
/// Blank lines are skipped. A frame that does not decode is logged with its
/// line number and dropped; the rest of the stream is still returned. Only
/// a failure to read the stream is an error.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<RemoteEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match RemoteEvent::from_json(&line) {
            Ok(event) => events.push(event),
            Err(e) => warn!(line = index + 1, error = %e, "Dropping undecodable event"),
        }
    }
    Ok(events)
}
