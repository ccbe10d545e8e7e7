//! Host integration seam
//!
//! The host owns its documents, its audio abstraction and its UI. The
//! controller reaches it only through [`HostAdapter`], and sees host sounds
//! as [`SoundReference`]s.

use serde::{Deserialize, Serialize};
use soundscape_core::{ElementId, SoundId, SoundType, Volume, VolumeScope};
use tracing::debug;

/// A host playlist or ambient sound routed to the service.
///
/// The routing lives in two flags, `soundType` and `soundId`. A reference
/// without both flags is an ordinary host sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundReference {
    /// Host document id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// `mood` or `element`
    #[serde(default)]
    pub sound_type: Option<String>,
    /// Id on the service, bare or prefixed
    #[serde(default)]
    pub sound_id: Option<String>,
    /// Whether the host believes it is playing
    #[serde(default)]
    pub playing: bool,
    /// Resume position, seconds
    #[serde(default)]
    pub paused_time: Option<f64>,
}

impl SoundReference {
    /// Reference to a service sound
    pub fn new(id: impl Into<String>, sound_type: SoundType, sound_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            sound_type: Some(sound_type.as_str().to_string()),
            sound_id: Some(sound_id.into()),
            playing: false,
            paused_time: None,
        }
    }

    /// Parsed flags, if both are present and valid
    pub fn target(&self) -> Option<(SoundType, SoundId)> {
        let sound_type = self.sound_type.as_deref()?.parse().ok()?;
        let sound_id: SoundId = self.sound_id.as_deref()?.trim().parse().ok()?;
        Some((sound_type, sound_id))
    }

    /// Whether this sound is routed to the service
    pub fn is_service_backed(&self) -> bool {
        self.target().is_some()
    }

    /// Service path, e.g. `moods/1234`
    pub fn service_path(&self) -> Option<String> {
        let (sound_type, sound_id) = self.target()?;
        Some(format!("{}/{}", sound_type.path_segment(), sound_id.element_id()))
    }

    /// Element id on the service
    pub fn element_id(&self) -> Option<ElementId> {
        self.target().map(|(_, sound_id)| sound_id.element_id())
    }

    /// Update the playing flag.
    ///
    /// The service cannot resume, so stopping a service-backed sound also
    /// forgets its paused position.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        if !playing && self.is_service_backed() {
            self.paused_time = None;
        }
    }
}

/// What the controller needs from the host.
pub trait HostAdapter: Send {
    /// Every sound reference the host currently knows
    fn sound_references(&self) -> Vec<SoundReference>;

    /// Mark a reference as not playing
    fn force_not_playing(&mut self, reference_id: &str);

    /// Apply a volume change to the host's audio
    fn apply_volume(&mut self, volume: Volume, scope: VolumeScope);
}

/// Host state kept in memory, for the CLI and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    references: Vec<SoundReference>,
    local_volume: Volume,
    global_volume: Volume,
}

impl InMemoryHost {
    /// Create a host with the given references
    pub fn new(references: Vec<SoundReference>) -> Self {
        Self {
            references,
            ..Self::default()
        }
    }

    /// Look up a reference by host id
    pub fn reference(&self, id: &str) -> Option<&SoundReference> {
        self.references.iter().find(|r| r.id == id)
    }

    /// References, in insertion order
    pub fn references(&self) -> &[SoundReference] {
        &self.references
    }

    /// Last applied volume for a scope
    pub fn volume(&self, scope: VolumeScope) -> Volume {
        match scope {
            VolumeScope::Local => self.local_volume,
            VolumeScope::Global => self.global_volume,
        }
    }
}

impl HostAdapter for InMemoryHost {
    fn sound_references(&self) -> Vec<SoundReference> {
        self.references.clone()
    }

    fn force_not_playing(&mut self, reference_id: &str) {
        if let Some(reference) = self.references.iter_mut().find(|r| r.id == reference_id) {
            reference.set_playing(false);
            debug!(reference = %reference_id, "Reference forced to not playing");
        }
    }

    fn apply_volume(&mut self, volume: Volume, scope: VolumeScope) {
        match scope {
            VolumeScope::Local => self.local_volume = volume,
            VolumeScope::Global => self.global_volume = volume,
        }
    }
}
