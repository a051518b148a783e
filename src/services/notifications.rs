// User notifications.
// The sink shows a message however the host can; a failure to display is logged and dropped.

use std::sync::Arc;

use log::{error, info, warn};

use crate::types::notification::Severity;

const ERROR_TITLE: &str = "Error";

/// Somewhere a notification can be displayed.
pub trait NotificationSink: Send + Sync {
    fn show(&self, title: &str, message: &str, severity: Severity) -> Result<(), String>;
}

/// Writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn show(&self, title: &str, message: &str, severity: Severity) -> Result<(), String> {
        match severity {
            Severity::Error => error!("[{}] {}: {}", severity.as_str(), title, message),
            Severity::Warning => warn!("[{}] {}: {}", severity.as_str(), title, message),
            Severity::Success | Severity::Info => {
                info!("[{}] {}: {}", severity.as_str(), title, message)
            }
        }
        Ok(())
    }
}

/// Fire-and-forget notifications with the application's canned messages.
#[derive(Clone)]
pub struct NotificationService {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub fn show(&self, title: &str, message: &str, severity: Severity) {
        if let Err(e) = self.sink.show(title, message, severity) {
            error!("Failed to show notification '{}': {}", title, e);
        }
    }

    pub fn success(&self, title: &str, message: &str) {
        self.show(title, message, Severity::Success);
    }

    pub fn error(&self, title: &str, message: &str) {
        self.show(title, message, Severity::Error);
    }

    pub fn warning(&self, title: &str, message: &str) {
        self.show(title, message, Severity::Warning);
    }

    pub fn info(&self, title: &str, message: &str) {
        self.show(title, message, Severity::Info);
    }

    pub fn link_added(&self) {
        self.success("Link Added", "Link added to collection successfully");
    }

    pub fn collection_created(&self) {
        self.success("Collection Created", "Collection created successfully");
    }

    pub fn collection_updated(&self) {
        self.success("Collection Updated", "Collection updated successfully");
    }

    pub fn collection_deleted(&self) {
        self.success("Collection Deleted", "Collection deleted successfully");
    }

    pub fn settings_updated(&self) {
        self.success("Settings Updated", "Your settings have been saved successfully");
    }

    pub fn backup_created(&self) {
        self.success("Backup Created", "Your bookmarks have been backed up successfully");
    }

    pub fn no_collections(&self) {
        self.error(
            ERROR_TITLE,
            "No collections available. Please create a collection first.",
        );
    }

    pub fn invalid_token(&self, reason: Option<&str>) {
        let message = match reason {
            Some(reason) => format!("Your API key is no longer valid: {}", reason),
            None => "Your API key is no longer valid".to_string(),
        };
        self.warning("Invalid API Key", &message);
    }

    pub fn api_error(&self, error: &str) {
        self.error(ERROR_TITLE, error);
    }

    pub fn initialization_error(&self, error: &str) {
        self.error(ERROR_TITLE, &format!("Failed to initialize: {}", error));
    }

    pub fn sync_error(&self, error: &str) {
        self.error(ERROR_TITLE, &format!("Failed to sync collections: {}", error));
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new(Arc::new(LogNotifier))
    }
}
