//! Host settings store
//!
//! The host keeps a small key/value store per world. The controller only
//! needs a handful of keys, listed in [`SettingKey`].

use crate::error::{ControllerError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keys the controller reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Long-lived token issued to the user
    AuthToken,
    /// Session id of the last opened session
    SessionId,
    /// Cached bulk export rows
    BulkData,
    /// Cached soundset listing
    SoundsetInfo,
    /// API address override
    Address,
}

impl SettingKey {
    /// Every key
    pub const ALL: [SettingKey; 5] = [
        SettingKey::AuthToken,
        SettingKey::SessionId,
        SettingKey::BulkData,
        SettingKey::SoundsetInfo,
        SettingKey::Address,
    ];

    /// Name under which the host stores the value
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::AuthToken => "authToken",
            SettingKey::SessionId => "sessionId",
            SettingKey::BulkData => "bulkData",
            SettingKey::SoundsetInfo => "soundsetInfo",
            SettingKey::Address => "address",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value settings provided by the host.
pub trait SettingsStore: Send + Sync {
    /// Raw value for `key`
    fn get(&self, key: SettingKey) -> Option<Value>;

    /// Store a value
    fn set(&mut self, key: SettingKey, value: Value) -> Result<()>;

    /// Remove a value
    fn remove(&mut self, key: SettingKey) -> Result<()>;
}

impl dyn SettingsStore {
    /// Value for `key` as a non-empty string
    pub fn get_string(&self, key: SettingKey) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    /// Value for `key` decoded into `T`; `None` if absent or undecodable
    pub fn get_as<T: DeserializeOwned>(&self, key: SettingKey) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(key = %key, error = %e, "Ignoring undecodable setting");
                None
            }
        }
    }

    /// Encode and store a value
    pub fn set_as<T: Serialize>(&mut self, key: SettingKey, value: &T) -> Result<()> {
        self.set(key, serde_json::to_value(value)?)
    }
}

/// Settings held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<SettingKey, Value>,
}

impl MemorySettings {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: SettingKey) -> Option<Value> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: SettingKey, value: Value) -> Result<()> {
        self.values.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: SettingKey) -> Result<()> {
        self.values.remove(&key);
        Ok(())
    }
}

/// Settings persisted as one JSON object on disk.
///
/// Every write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileSettings {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str(&text)? {
                Value::Object(values) => values,
                _ => {
                    return Err(ControllerError::Settings(format!(
                        "{} does not hold a JSON object",
                        path.display()
                    )))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = values.len(), "Opened settings");
        Ok(Self { path, values })
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: SettingKey) -> Option<Value> {
        self.values.get(key.as_str()).cloned()
    }

    fn set(&mut self, key: SettingKey, value: Value) -> Result<()> {
        self.values.insert(key.as_str().to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: SettingKey) -> Result<()> {
        if self.values.remove(key.as_str()).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store: Box<dyn SettingsStore> = Box::new(MemorySettings::new());
        store.set(SettingKey::AuthToken, json!("abc")).unwrap();

        assert_eq!(store.get_string(SettingKey::AuthToken).as_deref(), Some("abc"));
        store.remove(SettingKey::AuthToken).unwrap();
        assert!(store.get(SettingKey::AuthToken).is_none());
    }

    #[test]
    fn test_blank_strings_are_absent() {
        let mut store: Box<dyn SettingsStore> = Box::new(MemorySettings::new());
        store.set(SettingKey::Address, json!("   ")).unwrap();
        assert!(store.get_string(SettingKey::Address).is_none());
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileSettings::open(&path).unwrap();
        store.set(SettingKey::SessionId, json!("s-1")).unwrap();
        store
            .set(SettingKey::SoundsetInfo, json!([{"id": 1, "name": "Tavern", "uuid": "u"}]))
            .unwrap();

        let reopened = JsonFileSettings::open(&path).unwrap();
        assert_eq!(reopened.get(SettingKey::SessionId), Some(json!("s-1")));

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("soundsetInfo").is_some());
    }

    #[test]
    fn test_file_store_rejects_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            JsonFileSettings::open(&path),
            Err(ControllerError::Settings(_))
        ));
    }

    #[test]
    fn test_undecodable_values_are_ignored() {
        let mut store: Box<dyn SettingsStore> = Box::new(MemorySettings::new());
        store.set(SettingKey::BulkData, json!("not rows")).unwrap();
        assert!(store
            .get_as::<Vec<soundscape_core::CatalogRow>>(SettingKey::BulkData)
            .is_none());
    }
}
