//! Play and stop commands.

use crate::client::ServiceClient;
use crate::error::Result;
use serde_json::Value;
use soundscape_core::{SoundId, SoundType};
use tracing::info;

/// Service path of a command for `sound`.
///
/// Bare ids are taken to be of `default_kind`; prefixed ids keep their own
/// type.
pub fn command_path(sound: SoundId, default_kind: SoundType, action: &str) -> String {
    let kind = sound.kind().unwrap_or(default_kind);
    format!("{}/{}/{}/", kind.path_segment(), sound.element_id(), action)
}

impl ServiceClient {
    /// Start a mood or element.
    pub async fn play(&self, sound: SoundId, default_kind: SoundType) -> Result<Value> {
        let path = command_path(sound, default_kind, "play");
        let response = self.fetch_json(&path).await?;
        info!(sound = %sound, path = %path, "Play requested");
        Ok(response)
    }

    /// Stop a mood or element.
    pub async fn stop(&self, sound: SoundId, default_kind: SoundType) -> Result<Value> {
        let path = command_path(sound, default_kind, "stop");
        let response = self.fetch_json(&path).await?;
        info!(sound = %sound, path = %path, "Stop requested");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_overrides_default_kind() {
        let mood: SoundId = "m:12".parse().unwrap();
        assert_eq!(command_path(mood, SoundType::Element, "play"), "moods/12/play/");

        let bare = SoundId::from(12);
        assert_eq!(command_path(bare, SoundType::Element, "stop"), "elements/12/stop/");
    }
}
