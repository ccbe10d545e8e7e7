//! Controller context
//!
//! One [`ControlContext`] is built at startup and passed to whatever needs
//! it. It owns the service client, the catalog, the playback tracker, the
//! browser and the host seams; there is no ambient global state.

use std::num::NonZeroUsize;

use soundscape_catalog::{CatalogCollection, CatalogSource, CsvFileSource, FilterOptions};
use soundscape_client::{ServiceClient, Soundset};
use soundscape_core::{
    CatalogRow, ElementId, OneShotLookup, PlaybackKind, SoundId, SoundType, ToElementId, Volume,
    VolumeScope,
};
use soundscape_playback::{apply_event, read_events, Applied, PlaybackTracker, RemoteEvent};
use tracing::{debug, info, warn};

use crate::browser::Browser;
use crate::config::{CatalogSourceKind, ControllerConfig};
use crate::error::{ControllerError, Result};
use crate::host::HostAdapter;
use crate::settings::{SettingKey, SettingsStore};

/// Everything a running controller needs.
pub struct ControlContext {
    config: ControllerConfig,
    client: ServiceClient,
    catalog: CatalogCollection,
    tracker: PlaybackTracker,
    browser: Browser,
    settings: Box<dyn SettingsStore>,
    host: Box<dyn HostAdapter>,
    last_local_volume: Option<Volume>,
}

impl ControlContext {
    /// Build a context; nothing is fetched until [`init`](Self::init).
    pub fn new(
        config: ControllerConfig,
        settings: Box<dyn SettingsStore>,
        host: Box<dyn HostAdapter>,
    ) -> Result<Self> {
        config.validate()?;

        let mut client_config = config.client_config();
        if client_config.auth_token.is_none() {
            client_config.auth_token = settings.get_string(SettingKey::AuthToken);
        }
        let client = ServiceClient::new(client_config)?;

        let page_size = NonZeroUsize::new(config.browser.page_size)
            .ok_or_else(|| ControllerError::Config("page size must be at least 1".to_string()))?;

        Ok(Self {
            config,
            client,
            catalog: CatalogCollection::new(),
            tracker: PlaybackTracker::new(),
            browser: Browser::new(page_size),
            settings,
            host,
            last_local_volume: None,
        })
    }

    /// Start the session.
    ///
    /// Restores the cached catalog, then opens a service session if an auth
    /// token is configured. A failed session is logged, not raised: the
    /// cached catalog stays browsable.
    pub async fn init(&mut self) -> Result<()> {
        self.settings.set(
            SettingKey::Address,
            serde_json::Value::String(self.config.service.address.clone()),
        )?;

        if let Some(rows) = self.settings.get_as::<Vec<CatalogRow>>(SettingKey::BulkData) {
            match self.catalog.rebuild(rows) {
                Ok(()) => info!(entries = self.catalog.len(), "Restored cached catalog"),
                Err(e) => warn!(error = %e, "Cached catalog is unusable, ignoring"),
            }
        }

        let has_token = self.config.service.auth_token.is_some()
            || self.settings.get_string(SettingKey::AuthToken).is_some();
        if !has_token {
            info!("No auth token configured, running without a session");
            return Ok(());
        }

        match self.client.authenticate().await {
            Ok(session) => {
                self.settings.set(
                    SettingKey::SessionId,
                    serde_json::Value::String(session.session_id),
                )?;
            }
            Err(e) => warn!(error = %e, "Could not open a service session"),
        }

        Ok(())
    }

    /// Rebuild the catalog from the configured source.
    ///
    /// On failure the previous catalog stays in place. Returns the number of
    /// entries.
    pub async fn refresh_catalog(&mut self) -> Result<usize> {
        match self.config.catalog.source {
            CatalogSourceKind::Bulk => {
                let rows = self.client.fetch_rows().await?;
                self.catalog.rebuild(rows.iter().cloned())?;
                // Only a catalog that built replaces the cached export
                self.settings.set_as(SettingKey::BulkData, &rows)?;
            }
            CatalogSourceKind::Csv => {
                let rows = CsvFileSource::new(self.config.catalog.csv_path.clone())
                    .fetch_rows()
                    .await?;
                self.catalog.rebuild(rows)?;
            }
        }
        self.browser.invalidate();

        info!(
            entries = self.catalog.len(),
            moods = self.catalog.by_type(SoundType::Mood).len(),
            elements = self.catalog.by_type(SoundType::Element).len(),
            "Catalog refreshed"
        );
        Ok(self.catalog.len())
    }

    /// List soundsets and cache them in the settings.
    pub async fn soundsets(&mut self) -> Result<Vec<Soundset>> {
        let sets = self.client.soundsets().await?;
        self.settings.set_as(SettingKey::SoundsetInfo, &sets)?;
        Ok(sets)
    }

    /// Apply one pushed event.
    ///
    /// When a one-shot's sample stops, every host reference to that element
    /// is forced to "not playing"; the service will not replay it.
    pub fn handle_event(&mut self, event: RemoteEvent) -> Applied {
        let applied = apply_event(&mut self.tracker, event);

        if let Applied::Stopped {
            kind: PlaybackKind::Sample,
            id,
            ..
        } = applied
        {
            if self.catalog.is_one_shot(id) {
                self.release_references(id);
            }
        }

        applied
    }

    /// Apply a recorded event stream, one JSON frame per line.
    ///
    /// Undecodable frames are logged and skipped. Returns the outcome of
    /// every applied event in order.
    pub fn replay<R: std::io::BufRead>(&mut self, reader: R) -> Result<Vec<Applied>> {
        let events = read_events(reader)?;
        Ok(events
            .into_iter()
            .map(|event| self.handle_event(event))
            .collect())
    }

    fn release_references(&mut self, id: ElementId) {
        for reference in self.host.sound_references() {
            let is_element = matches!(
                reference.target(),
                Some((SoundType::Element, sound)) if sound.element_id() == id
            );
            if is_element {
                debug!(reference = %reference.id, element_id = %id, "One-shot finished");
                self.host.force_not_playing(&reference.id);
            }
        }
    }

    /// Whether `id` is playing
    pub fn is_playing<Q: ToElementId + ?Sized>(&self, id: &Q) -> bool {
        self.tracker.is_playing(id)
    }

    /// Type to use for a bare id: the catalog's, else mood.
    fn kind_of(&self, sound: SoundId) -> SoundType {
        sound
            .kind()
            .or_else(|| self.catalog.get_by_id(sound).map(|entry| entry.sound_type))
            .unwrap_or(SoundType::Mood)
    }

    /// Ask the service to play a sound.
    ///
    /// Returns whether the request succeeded; failures are logged.
    pub async fn play(&self, sound: SoundId) -> bool {
        match self.client.play(sound, self.kind_of(sound)).await {
            Ok(_) => true,
            Err(e) => {
                warn!(sound = %sound, error = %e, "Play failed");
                false
            }
        }
    }

    /// Ask the service to stop a sound.
    ///
    /// Returns whether the request succeeded; failures are logged.
    pub async fn stop(&self, sound: SoundId) -> bool {
        match self.client.stop(sound, self.kind_of(sound)).await {
            Ok(_) => true,
            Err(e) => {
                warn!(sound = %sound, error = %e, "Stop failed");
                false
            }
        }
    }

    /// Stop the active mood and every element known to be playing.
    ///
    /// Returns whether every request succeeded.
    pub async fn stop_all(&self) -> bool {
        let mut targets: Vec<SoundId> = self
            .tracker
            .playing_ids(PlaybackKind::Mood)
            .map(|id| SoundId::typed(SoundType::Mood, id))
            .collect();

        let mut elements: Vec<ElementId> = self
            .tracker
            .playing_ids(PlaybackKind::Element)
            .chain(self.tracker.playing_ids(PlaybackKind::Sample))
            .collect();
        elements.sort_unstable();
        elements.dedup();
        targets.extend(
            elements
                .into_iter()
                .map(|id| SoundId::typed(SoundType::Element, id)),
        );

        let mut all_ok = true;
        for sound in targets {
            all_ok &= self.stop(sound).await;
        }
        info!(all_ok, "Stop all requested");
        all_ok
    }

    /// Stop the sound behind a host reference and clear its resume position.
    pub async fn stop_reference(&mut self, reference_id: &str) -> Result<bool> {
        let reference = self
            .host
            .sound_references()
            .into_iter()
            .find(|r| r.id == reference_id)
            .ok_or_else(|| ControllerError::NotFound(format!("sound reference {reference_id}")))?;

        let (sound_type, sound) = reference.target().ok_or_else(|| {
            ControllerError::InvalidInput(format!("{reference_id} is not routed to the service"))
        })?;

        let stopped = match self.client.stop(sound, sound_type).await {
            Ok(_) => true,
            Err(e) => {
                warn!(reference = %reference_id, error = %e, "Stop failed");
                false
            }
        };
        self.host.force_not_playing(reference_id);
        Ok(stopped)
    }

    /// Validate and apply a volume change.
    pub fn set_volume(&mut self, value: f32, scope: VolumeScope) -> Result<Volume> {
        let volume = Volume::new(value)?;
        self.host.apply_volume(volume, scope);
        if scope == VolumeScope::Local {
            self.last_local_volume = Some(volume);
        }
        debug!(volume = volume.get(), scope = ?scope, "Volume changed");
        Ok(volume)
    }

    /// Last local volume set through this context
    pub fn last_local_volume(&self) -> Option<Volume> {
        self.last_local_volume
    }

    /// Segment the browser results for the current tab and filters.
    pub fn show_results(&mut self) -> soundscape_catalog::BatcherId {
        self.browser.show_results(&self.catalog)
    }

    /// Render the next browser page; returns the number of rows added.
    pub fn next_page(&mut self) -> usize {
        self.browser.next_page(&self.tracker)
    }

    /// Distinct values for the browser's filter form
    pub fn filter_options(&mut self) -> &FilterOptions {
        self.browser.filter_options(&self.catalog)
    }

    /// End the session: forget playback state and close the service session.
    pub async fn teardown(&mut self) {
        self.tracker.clear();
        self.browser.invalidate();
        self.client.logout().await;
        info!("Controller torn down");
    }

    /// Configuration in use
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Service client
    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Current catalog
    pub fn catalog(&self) -> &CatalogCollection {
        &self.catalog
    }

    /// Playback tracker
    pub fn tracker(&self) -> &PlaybackTracker {
        &self.tracker
    }

    /// Browser state
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Mutable browser state
    pub fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Settings store
    pub fn settings(&self) -> &(dyn SettingsStore + 'static) {
        self.settings.as_ref()
    }

    /// Host adapter
    pub fn host(&self) -> &dyn HostAdapter {
        self.host.as_ref()
    }
}
