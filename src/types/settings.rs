use serde::{Deserialize, Serialize};

use super::collection::Collection;

/// Remote service used when the user has not configured one.
pub const DEFAULT_BASE_URL: &str = "https://www.mylinks.app";

/// User-facing extension settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionSettings {
    pub base_url: String,
    pub api_key: String,
    pub is_initialized: bool,
    /// RFC 3339 timestamp of the last successful fetch, empty when never synced.
    pub last_sync: String,
    /// UI language tag such as `en` or `fr-FR`; system locale when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            is_initialized: false,
            last_sync: String::new(),
            language: None,
        }
    }
}

impl ExtensionSettings {
    /// True when both a base URL and an API key are present.
    pub fn has_credentials(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Applies a partial update. The base URL loses any trailing slash.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(base_url) = update.base_url {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(api_key) = update.api_key {
            self.api_key = api_key;
        }
        if let Some(is_initialized) = update.is_initialized {
            self.is_initialized = is_initialized;
        }
        if let Some(last_sync) = update.last_sync {
            self.last_sync = last_sync;
        }
        if let Some(language) = update.language {
            self.language = if language.trim().is_empty() {
                None
            } else {
                Some(language)
            };
        }
    }
}

/// Partial settings change; absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub is_initialized: Option<bool>,
    pub last_sync: Option<String>,
    /// An empty string clears the override.
    pub language: Option<String>,
}

/// Last-known collection list with the time it was fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheData {
    pub collections: Vec<Collection>,
    pub last_sync: String,
}

/// Everything stored under the extension data key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageData {
    pub settings: ExtensionSettings,
    pub collections: Vec<Collection>,
    pub cache: CacheData,
}

/// A page captured from the context menu, waiting to be filed into a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingLink {
    pub url: String,
    pub name: String,
}
