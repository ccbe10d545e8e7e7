mod catalog;
mod ids;
mod playback;
mod volume;

pub use catalog::{CatalogEntry, CatalogRow, SoundType};
pub use ids::{ElementId, SoundId};
pub use playback::{PlaybackDetail, PlaybackEntry, PlaybackHints, PlaybackKind};
pub use volume::{Volume, VolumeScope};
