//! Integration tests for event-driven tracking
//!
//! Replays realistic frame sequences through the public API.

use soundscape_core::{ElementId, PlaybackKind, PlayingLookup};
use soundscape_playback::{apply_event, Applied, PlaybackTracker, RemoteEvent};

fn replay(tracker: &mut PlaybackTracker, frames: &[&str]) -> Vec<Applied> {
    frames
        .iter()
        .map(|frame| apply_event(tracker, RemoteEvent::from_json(frame).unwrap()))
        .collect()
}

#[test]
fn mood_exclusivity_across_events() {
    let mut tracker = PlaybackTracker::new();
    replay(
        &mut tracker,
        &[
            r#"{"event":"moodMessage","kind":"full","params":{"moodId":10}}"#,
            r#"{"event":"moodMessage","kind":"full","params":{"moodId":11}}"#,
        ],
    );

    assert!(!tracker.is_playing(&10u64));
    assert!(tracker.is_playing(&11u64));
}

#[test]
fn stop_all_scenario() {
    let mut tracker = PlaybackTracker::new();
    let applied = replay(
        &mut tracker,
        &[
            r#"{"event":"moodMessage","kind":"full","params":{"moodId":5}}"#,
            r#"{"event":"elementStart","detail":{"elementId":7}}"#,
            r#"{"event":"moodMessage","kind":"stopAll","params":{}}"#,
        ],
    );

    assert_eq!(
        applied[2],
        Applied::StoppedAll {
            kind: PlaybackKind::Mood,
            count: 1
        }
    );
    assert!(!tracker.is_playing(&5u64));
    assert!(tracker.is_playing(&7u64));
}

#[test]
fn sample_lifecycle_reports_stop() {
    let mut tracker = PlaybackTracker::new();
    let applied = replay(
        &mut tracker,
        &[
            r#"{"event":"sampleStart","detail":{"elementId":"e:42","timeToStop":3.5}}"#,
            r#"{"event":"sampleStop","detail":{"elementId":42,"sampleId":900}}"#,
        ],
    );

    assert_eq!(
        applied[1],
        Applied::Stopped {
            kind: PlaybackKind::Sample,
            id: ElementId::new(42),
            removed: true
        }
    );
    assert!(!tracker.is_element_playing(ElementId::new(42)));
}

#[test]
fn partial_frames_do_not_disturb_state() {
    let mut tracker = PlaybackTracker::new();
    let applied = replay(
        &mut tracker,
        &[
            r#"{"event":"elementStart","detail":{"elementId":1}}"#,
            r#"{"event":"elementStop","detail":{"sampleId":3}}"#,
            r#"{"event":"moodMessage","kind":"full","params":{}}"#,
        ],
    );

    assert_eq!(applied[1], Applied::Ignored);
    assert_eq!(applied[2], Applied::Ignored);
    assert!(tracker.is_playing(&1u64));
    assert!(tracker.is_consistent());
}
