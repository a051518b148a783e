use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::collection::{AddLinkRequest, CreateCollectionRequest, UpdateCollectionRequest};
use super::settings::SettingsUpdate;

/// A request sent by the popup, options page or content script to the background controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    InitializeExtension,
    SyncCollections,
    AddLinkToCollection {
        #[serde(rename = "collectionId")]
        collection_id: String,
        link: AddLinkRequest,
    },
    CreateCollection {
        collection: CreateCollectionRequest,
    },
    UpdateCollection {
        id: String,
        collection: UpdateCollectionRequest,
    },
    DeleteCollection {
        id: String,
    },
    GetCollections,
    GetSettings,
    UpdateSettings {
        settings: SettingsUpdate,
    },
    ResetExtension,
    /// A tab, window or page became visible; schedules a debounced sync.
    PageVisibility,
    /// Context-menu capture of the current page.
    AddToCollection {
        url: String,
        name: String,
    },
}

/// Reply to a [`Message`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn with_data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
