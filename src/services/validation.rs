// Input validation for links, collections and settings.
// Lengths count characters, not bytes.

use crate::types::collection::{AddLinkRequest, CreateCollectionRequest, UpdateCollectionRequest};
use crate::types::errors::SyncError;
use crate::types::settings::SettingsUpdate;

pub const URL_MAX_LENGTH: usize = 2048;
pub const TITLE_MAX_LENGTH: usize = 255;
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;
pub const COLLECTION_NAME_MAX_LENGTH: usize = 100;

/// `http://` or `https://` followed by at least one character.
pub fn validate_url(url: &str) -> bool {
    if url.chars().count() > URL_MAX_LENGTH {
        return false;
    }
    ["https://", "http://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

pub fn validate_title(title: &str) -> bool {
    let length = title.trim().chars().count();
    (1..=TITLE_MAX_LENGTH).contains(&length)
}

/// An absent description is valid.
pub fn validate_description(description: Option<&str>) -> bool {
    description.map_or(true, |d| d.chars().count() <= DESCRIPTION_MAX_LENGTH)
}

pub fn validate_collection_name(name: &str) -> bool {
    let length = name.trim().chars().count();
    (1..=COLLECTION_NAME_MAX_LENGTH).contains(&length)
}

/// Letters, digits, `_` and `-` only.
pub fn validate_api_key(api_key: &str) -> bool {
    let key = api_key.trim();
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Base URL of the remote service: an http(s) URL with a host.
pub fn validate_base_url(url: &str) -> bool {
    validate_url(url.trim())
}

fn into_result(errors: Vec<&str>) -> Result<(), SyncError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SyncError::Validation(errors.join(", ")))
    }
}

pub fn validate_link(request: &AddLinkRequest) -> Result<(), SyncError> {
    let mut errors = Vec::new();
    if !validate_title(&request.name) {
        errors.push("Invalid title");
    }
    if !validate_url(&request.url) {
        errors.push("Invalid URL");
    }
    if !validate_description(request.description.as_deref()) {
        errors.push("Invalid description");
    }
    into_result(errors)
}

pub fn validate_new_collection(request: &CreateCollectionRequest) -> Result<(), SyncError> {
    let mut errors = Vec::new();
    if !validate_collection_name(&request.name) {
        errors.push("Invalid collection name");
    }
    if !validate_description(request.description.as_deref()) {
        errors.push("Invalid description");
    }
    into_result(errors)
}

pub fn validate_collection_update(request: &UpdateCollectionRequest) -> Result<(), SyncError> {
    let mut errors = Vec::new();
    if !validate_collection_name(&request.name) {
        errors.push("Invalid collection name");
    }
    if !validate_description(request.description.as_deref()) {
        errors.push("Invalid description");
    }
    into_result(errors)
}

/// Only the fields present in the update are checked.
pub fn validate_settings_update(update: &SettingsUpdate) -> Result<(), SyncError> {
    let mut errors = Vec::new();
    if let Some(base_url) = &update.base_url {
        if !validate_base_url(base_url) {
            errors.push("Invalid base URL");
        }
    }
    if let Some(api_key) = &update.api_key {
        if !api_key.trim().is_empty() && !validate_api_key(api_key) {
            errors.push("Invalid API key");
        }
    }
    into_result(errors)
}
