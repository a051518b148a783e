//! Message dispatch for the CollectionBar background controller.
//!
//! Kept apart from `rpc_server.rs` so it can be tested without stdin/stdout.
//! `handle_message` decodes a raw JSON message, runs it against the `App`
//! and always answers with a [`MessageResponse`], never an error.

use std::sync::Arc;

use log::{debug, error};
use serde_json::{json, Value};

use crate::app::App;
use crate::types::errors::SyncError;
use crate::types::message::{Message, MessageResponse};

/// Every `type` tag the controller understands.
pub const MESSAGE_TYPES: &[&str] = &[
    "INITIALIZE_EXTENSION",
    "SYNC_COLLECTIONS",
    "ADD_LINK_TO_COLLECTION",
    "CREATE_COLLECTION",
    "UPDATE_COLLECTION",
    "DELETE_COLLECTION",
    "GET_COLLECTIONS",
    "GET_SETTINGS",
    "UPDATE_SETTINGS",
    "RESET_EXTENSION",
    "PAGE_VISIBILITY",
    "ADD_TO_COLLECTION",
];

/// Decodes a raw message. Unknown or missing `type` tags are reported as such.
pub fn parse_message(raw: &Value) -> Result<Message, String> {
    let kind = raw.get("type").and_then(Value::as_str).unwrap_or("");
    if !MESSAGE_TYPES.contains(&kind) {
        return Err("Unknown message type".to_string());
    }
    serde_json::from_value(raw.clone()).map_err(|e| format!("Invalid {} message: {}", kind, e))
}

/// Handles one raw message.
pub async fn handle_message(app: &Arc<App>, raw: &Value) -> MessageResponse {
    let message = match parse_message(raw) {
        Ok(message) => message,
        Err(e) => {
            debug!("Rejected message: {}", e);
            return MessageResponse::failure(e);
        }
    };

    match dispatch(app, message).await {
        Ok(Some(data)) => MessageResponse::with_data(data),
        Ok(None) => MessageResponse::ok(),
        Err(e) => {
            error!("Error handling message: {}", e);
            MessageResponse::failure(e.to_string())
        }
    }
}

/// Runs a decoded message; `Some` carries the response data.
pub async fn dispatch(app: &Arc<App>, message: Message) -> Result<Option<Value>, SyncError> {
    match message {
        Message::InitializeExtension => {
            app.initialize().await?;
            Ok(None)
        }
        Message::SyncCollections => {
            let collections = app.sync_and_notify().await?;
            Ok(Some(json!(collections)))
        }
        Message::AddLinkToCollection {
            collection_id,
            link,
        } => {
            let link = app.add_link(&collection_id, link).await?;
            Ok(Some(json!(link)))
        }
        Message::CreateCollection { collection } => {
            let created = app.create_collection(collection).await?;
            Ok(Some(json!(created)))
        }
        Message::UpdateCollection { id, collection } => {
            let updated = app.update_collection(&id, collection).await?;
            Ok(Some(json!(updated)))
        }
        Message::DeleteCollection { id } => {
            app.delete_collection(&id).await?;
            Ok(None)
        }
        Message::GetCollections => Ok(Some(json!(app.get_collections()?))),
        Message::GetSettings => Ok(Some(json!(app.get_settings()?))),
        Message::UpdateSettings { settings } => {
            let settings = app.update_settings(settings)?;
            Ok(Some(json!(settings)))
        }
        Message::ResetExtension => {
            let restored = app.reset().await?;
            Ok(Some(json!({ "restored": restored })))
        }
        Message::PageVisibility => {
            app.request_sync();
            Ok(None)
        }
        Message::AddToCollection { url, name } => {
            let queued = app.queue_pending_link(&url, &name)?;
            Ok(Some(json!({ "queued": queued })))
        }
    }
}
