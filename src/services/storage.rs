// Settings and cache store.
// A single JSON document on disk holding top-level keys, like a browser's local storage area:
// `extension_data` (settings, collections, cache) and `pendingLink`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::platform;
use crate::types::collection::Collection;
use crate::types::errors::StorageError;
use crate::types::settings::{
    CacheData, ExtensionSettings, PendingLink, SettingsUpdate, StorageData,
};

/// Key of the settings, collections and cache record.
pub const EXTENSION_DATA_KEY: &str = "extension_data";

/// Key of the link captured from the context menu.
pub const PENDING_LINK_KEY: &str = "pendingLink";

/// Trait defining the settings/cache store interface.
///
/// No transaction spans two calls; a concurrent writer may interleave.
pub trait StorageServiceTrait: Send + Sync {
    fn get_storage_data(&self) -> Result<StorageData, StorageError>;
    /// Replaces the whole extension data record.
    fn set_storage_data(&self, data: &StorageData) -> Result<(), StorageError>;
    fn get_settings(&self) -> Result<ExtensionSettings, StorageError>;
    /// Merges a partial update into the stored settings and returns the result.
    fn set_settings(&self, update: SettingsUpdate) -> Result<ExtensionSettings, StorageError>;
    fn get_collections(&self) -> Result<Vec<Collection>, StorageError>;
    fn set_collections(&self, collections: &[Collection]) -> Result<(), StorageError>;
    /// Stores the collections in the cache stamped with the current time; returns the stamp.
    fn update_cache(&self, collections: &[Collection]) -> Result<String, StorageError>;
    fn get_cache(&self) -> Result<CacheData, StorageError>;
    /// Drops the extension data record. The pending link is kept.
    fn clear_storage(&self) -> Result<(), StorageError>;
    fn get_pending_link(&self) -> Result<Option<PendingLink>, StorageError>;
    fn set_pending_link(&self, link: &PendingLink) -> Result<(), StorageError>;
    fn remove_pending_link(&self) -> Result<(), StorageError>;
}

/// Collections were written either as a bare list or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCollections {
    List(Vec<Collection>),
    Wrapped { collections: Vec<Collection> },
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredExtensionData {
    settings: ExtensionSettings,
    collections: Option<StoredCollections>,
    cache: CacheData,
}

impl From<StoredExtensionData> for StorageData {
    fn from(stored: StoredExtensionData) -> Self {
        let collections = match stored.collections {
            Some(StoredCollections::List(list)) => list,
            Some(StoredCollections::Wrapped { collections }) => collections,
            None => Vec::new(),
        };
        StorageData {
            settings: stored.settings,
            collections,
            cache: stored.cache,
        }
    }
}

/// JSON file backed implementation of [`StorageServiceTrait`].
pub struct StorageService {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StorageService {
    /// Creates a store at `path_override`, or `storage.json` in the platform config directory.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let path = path_override.unwrap_or_else(platform::storage_path);
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_document(&self) -> Result<Map<String, Value>, StorageError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::IoError(format!("Failed to read storage file: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            StorageError::SerializationError(format!("Failed to parse storage file: {}", e))
        })
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::IoError(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|e| {
            StorageError::SerializationError(format!("Failed to serialize storage: {}", e))
        })?;
        fs::write(&self.path, json)
            .map_err(|e| StorageError::IoError(format!("Failed to write storage file: {}", e)))
    }

    fn decode_extension_data(document: &Map<String, Value>) -> Result<StorageData, StorageError> {
        match document.get(EXTENSION_DATA_KEY) {
            None | Some(Value::Null) => Ok(StorageData::default()),
            Some(value) => {
                let stored: StoredExtensionData =
                    serde_json::from_value(value.clone()).map_err(|e| {
                        StorageError::SerializationError(format!(
                            "Failed to decode extension data: {}",
                            e
                        ))
                    })?;
                Ok(stored.into())
            }
        }
    }

    fn load_data(&self) -> Result<StorageData, StorageError> {
        Self::decode_extension_data(&self.read_document()?)
    }

    fn store_data(&self, data: &StorageData) -> Result<(), StorageError> {
        let mut document = self.read_document()?;
        let value = serde_json::to_value(data).map_err(|e| {
            StorageError::SerializationError(format!("Failed to serialize extension data: {}", e))
        })?;
        document.insert(EXTENSION_DATA_KEY.to_string(), value);
        self.write_document(&document)
    }

    /// Read-modify-write of the extension data record under the store lock.
    fn modify<R>(&self, f: impl FnOnce(&mut StorageData) -> R) -> Result<R, StorageError> {
        let _guard = self.guard();
        let mut data = self.load_data()?;
        let result = f(&mut data);
        self.store_data(&data)?;
        Ok(result)
    }
}

impl StorageServiceTrait for StorageService {
    fn get_storage_data(&self) -> Result<StorageData, StorageError> {
        let _guard = self.guard();
        self.load_data()
    }

    fn set_storage_data(&self, data: &StorageData) -> Result<(), StorageError> {
        let _guard = self.guard();
        self.store_data(data)
    }

    fn get_settings(&self) -> Result<ExtensionSettings, StorageError> {
        Ok(self.get_storage_data()?.settings)
    }

    fn set_settings(&self, update: SettingsUpdate) -> Result<ExtensionSettings, StorageError> {
        self.modify(|data| {
            data.settings.apply(update);
            data.settings.clone()
        })
    }

    fn get_collections(&self) -> Result<Vec<Collection>, StorageError> {
        Ok(self.get_storage_data()?.collections)
    }

    fn set_collections(&self, collections: &[Collection]) -> Result<(), StorageError> {
        self.modify(|data| data.collections = collections.to_vec())
    }

    fn update_cache(&self, collections: &[Collection]) -> Result<String, StorageError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.modify(|data| {
            data.cache = CacheData {
                collections: collections.to_vec(),
                last_sync: now.clone(),
            };
        })?;
        Ok(now)
    }

    fn get_cache(&self) -> Result<CacheData, StorageError> {
        Ok(self.get_storage_data()?.cache)
    }

    fn clear_storage(&self) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut document = self.read_document()?;
        if document.remove(EXTENSION_DATA_KEY).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }

    fn get_pending_link(&self) -> Result<Option<PendingLink>, StorageError> {
        let _guard = self.guard();
        match self.read_document()?.remove(PENDING_LINK_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                StorageError::SerializationError(format!("Failed to decode pending link: {}", e))
            }),
        }
    }

    fn set_pending_link(&self, link: &PendingLink) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut document = self.read_document()?;
        let value = serde_json::to_value(link).map_err(|e| {
            StorageError::SerializationError(format!("Failed to serialize pending link: {}", e))
        })?;
        document.insert(PENDING_LINK_KEY.to_string(), value);
        self.write_document(&document)
    }

    fn remove_pending_link(&self) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut document = self.read_document()?;
        if document.remove(PENDING_LINK_KEY).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}
