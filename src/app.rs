//! Background controller for CollectionBar.
//!
//! Wires the bookmark store, the settings store, the remote client and the
//! notification sink together, and implements every user-level operation the
//! popup, options page and context menu ask for.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::database::connection::Database;
use crate::managers::backup_manager::BackupManager;
use crate::managers::bookmark_tree::{BookmarkTreeApi, SqliteBookmarkTree};
use crate::managers::link_mutators::BookmarkMutator;
use crate::managers::sync_engine::BookmarkSync;
use crate::platform;
use crate::services::collections_client::{CollectionsApi, CollectionsClient};
use crate::services::locale::Locale;
use crate::services::notifications::NotificationService;
use crate::services::storage::{StorageService, StorageServiceTrait};
use crate::services::sync_scheduler::DebouncedTrigger;
use crate::services::validation;
use crate::types::bookmark::BrowserLayout;
use crate::types::collection::{
    AddLinkRequest, Collection, CreateCollectionRequest, Link, TokenCheck, UpdateCollectionRequest,
};
use crate::types::errors::SyncError;
use crate::types::settings::{ExtensionSettings, PendingLink, SettingsUpdate};

/// Interval between background token checks.
pub const TOKEN_VALIDATION_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Interval between background full syncs.
pub const SYNC_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Central struct holding the stores and services of the extension.
pub struct App {
    bookmarks: Arc<dyn BookmarkTreeApi>,
    storage: Arc<dyn StorageServiceTrait>,
    notifications: NotificationService,
    scheduler: DebouncedTrigger,
}

impl App {
    pub fn new(
        bookmarks: Arc<dyn BookmarkTreeApi>,
        storage: Arc<dyn StorageServiceTrait>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            bookmarks,
            storage,
            notifications,
            scheduler: DebouncedTrigger::default(),
        }
    }

    /// Replaces the quiet period of [`App::request_sync`].
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.scheduler = DebouncedTrigger::new(delay);
        self
    }

    /// Opens the on-disk stores under `data_dir`, or the platform directories.
    ///
    /// A fresh bookmark store is seeded with the default folders of `layout`.
    pub fn open(
        data_dir: Option<&Path>,
        layout: BrowserLayout,
        notifications: NotificationService,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (db_path, storage_path): (PathBuf, PathBuf) = match data_dir {
            Some(dir) => (dir.join("bookmarks.db"), dir.join("storage.json")),
            None => (platform::bookmarks_db_path(), platform::storage_path()),
        };
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Arc::new(Database::open(&db_path)?);
        let tree = SqliteBookmarkTree::new(db);
        tree.seed_layout(layout)?;
        info!("Opened bookmark store at {}", db_path.display());

        let storage = StorageService::new(Some(storage_path));
        Ok(Self::new(Arc::new(tree), Arc::new(storage), notifications))
    }

    pub fn bookmarks(&self) -> &dyn BookmarkTreeApi {
        self.bookmarks.as_ref()
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    fn client(settings: &ExtensionSettings) -> Result<CollectionsClient, SyncError> {
        Ok(CollectionsClient::new(&settings.base_url, &settings.api_key)?)
    }

    /// Locale of the `language` setting, else the system locale.
    pub fn locale(&self) -> Result<Locale, SyncError> {
        let settings = self.storage.get_settings()?;
        Ok(Self::locale_for(&settings))
    }

    fn locale_for(settings: &ExtensionSettings) -> Locale {
        match &settings.language {
            Some(tag) => Locale::from_language_tag(tag),
            None => Locale::detect_system_locale(),
        }
    }

    fn cached_collection_name(&self, collection_id: &str) -> Result<Option<String>, SyncError> {
        Ok(self
            .storage
            .get_collections()?
            .into_iter()
            .find(|c| c.id == collection_id)
            .map(|c| c.name))
    }

    // === Lifecycle ===

    /// Moves the existing bookmark bar into the backup folder and marks the extension initialized.
    ///
    /// Does nothing once initialized. Returns whether a backup was made.
    pub async fn initialize(&self) -> Result<bool, SyncError> {
        let settings = self.storage.get_settings()?;
        if settings.is_initialized {
            return Ok(false);
        }

        let result = self.backup_and_mark_initialized().await;
        if let Err(e) = &result {
            error!("Failed to initialize extension: {}", e);
            self.notifications.initialization_error(&e.to_string());
        }
        result
    }

    async fn backup_and_mark_initialized(&self) -> Result<bool, SyncError> {
        let backup = BackupManager::new(self.bookmarks.as_ref());
        let backed_up = if backup.has_bookmarks_to_backup().await? {
            backup.backup_bookmarks().await?;
            self.notifications.backup_created();
            info!("Extension initialized with bookmarks backup");
            true
        } else {
            info!("Extension initialized (no bookmarks to backup)");
            false
        };

        self.storage.set_settings(SettingsUpdate {
            is_initialized: Some(true),
            ..Default::default()
        })?;
        Ok(backed_up)
    }

    /// Restores the user's original bookmark bar and forgets every setting.
    ///
    /// The bar is only cleared when the extension was initialized, since
    /// before that it still holds the user's own bookmarks. Returns the
    /// number of bookmarks restored.
    pub async fn reset(&self) -> Result<usize, SyncError> {
        info!("Resetting extension");
        self.scheduler.cancel();

        let settings = self.storage.get_settings()?;
        let mut restored = 0;
        if settings.is_initialized {
            let backup = BackupManager::new(self.bookmarks.as_ref());
            backup.clear_bookmark_bar().await?;
            restored = backup.restore_bookmarks().await?;
        }

        self.storage.clear_storage()?;
        self.storage.remove_pending_link()?;
        info!("Extension reset completed");
        Ok(restored)
    }

    // === Sync ===

    /// Fetches collections, refreshes the cache and mirrors them into the bookmark bar.
    ///
    /// Without credentials nothing is fetched and the cached collections are
    /// returned. The bookmark bar is only touched once the extension is initialized.
    pub async fn sync_collections(&self) -> Result<Vec<Collection>, SyncError> {
        let settings = self.storage.get_settings()?;
        if !settings.has_credentials() {
            info!("Skipping sync: remote service is not configured");
            return Ok(self.storage.get_collections()?);
        }

        let collections = Self::client(&settings)?.get_collections().await?;
        self.storage.set_collections(&collections)?;
        let stamp = self.storage.update_cache(&collections)?;
        self.storage.set_settings(SettingsUpdate {
            last_sync: Some(stamp),
            ..Default::default()
        })?;

        if settings.is_initialized {
            let favorites = Collection::favorites(&collections);
            BookmarkSync::new(self.bookmarks.as_ref(), Self::locale_for(&settings))
                .sync_to_bookmarks(&favorites, &collections)
                .await?;
        }

        info!("Collections synced successfully");
        Ok(collections)
    }

    /// Runs a full sync and shows a notification when it fails.
    pub async fn sync_and_notify(&self) -> Result<Vec<Collection>, SyncError> {
        let result = self.sync_collections().await;
        if let Err(e) = &result {
            error!("Failed to sync collections: {}", e);
            self.notifications.sync_error(&e.to_string());
        }
        result
    }

    /// Schedules a debounced full sync; bursts of calls lead to one sync.
    pub fn request_sync(self: &Arc<Self>) {
        let app = Arc::clone(self);
        self.scheduler.trigger(move || async move {
            if let Err(e) = app.sync_and_notify().await {
                debug!("Debounced sync failed: {}", e);
            }
        });
    }

    pub fn is_sync_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Follow-up sync after a remote change; its failure is already notified.
    async fn refresh(&self) {
        if let Err(e) = self.sync_and_notify().await {
            warn!("Refresh after remote change failed: {}", e);
        }
    }

    // === Collections ===

    pub async fn create_collection(&self, request: CreateCollectionRequest) -> Result<Collection, SyncError> {
        validation::validate_new_collection(&request)?;
        let settings = self.storage.get_settings()?;
        let created = Self::client(&settings)?.create_collection(&request).await?;
        info!("Created collection {}", created.name);

        self.notifications.collection_created();
        self.refresh().await;
        Ok(created)
    }

    pub async fn update_collection(
        &self,
        id: &str,
        request: UpdateCollectionRequest,
    ) -> Result<Collection, SyncError> {
        validation::validate_collection_update(&request)?;
        let settings = self.storage.get_settings()?;
        let updated = Self::client(&settings)?.update_collection(id, &request).await?;
        info!("Updated collection {}", updated.name);

        self.notifications.collection_updated();
        self.refresh().await;
        Ok(updated)
    }

    /// Deletes a collection remotely, then drops its folder right away.
    pub async fn delete_collection(&self, id: &str) -> Result<(), SyncError> {
        let settings = self.storage.get_settings()?;
        let name = self.cached_collection_name(id)?;
        Self::client(&settings)?.delete_collection(id).await?;
        info!("Deleted collection {}", id);

        if let (Some(name), true) = (name, settings.is_initialized) {
            let mutator = BookmarkMutator::new(self.bookmarks.as_ref());
            if let Err(e) = mutator.remove_collection_from_bookmarks(&name).await {
                warn!("Failed to remove collection folder '{}': {}", name, e);
            }
        }

        self.notifications.collection_deleted();
        self.refresh().await;
        Ok(())
    }

    /// Adds a link to a collection remotely, then to its folder right away.
    pub async fn add_link(&self, collection_id: &str, mut request: AddLinkRequest) -> Result<Link, SyncError> {
        request.collection_id = collection_id.to_string();
        validation::validate_link(&request)?;

        let settings = self.storage.get_settings()?;
        let link = Self::client(&settings)?.add_link(&request).await?;
        info!("Added link {} to collection {}", link.name, collection_id);

        if let Some(name) = self.cached_collection_name(collection_id)? {
            let mutator = BookmarkMutator::new(self.bookmarks.as_ref());
            if let Err(e) = mutator.add_link_to_bookmarks(&link, &name).await {
                warn!("Failed to add link '{}' to bookmarks: {}", link.name, e);
            }
        }

        self.notifications.link_added();
        self.refresh().await;
        Ok(link)
    }

    pub fn get_collections(&self) -> Result<Vec<Collection>, SyncError> {
        Ok(self.storage.get_collections()?)
    }

    // === Settings ===

    pub fn get_settings(&self) -> Result<ExtensionSettings, SyncError> {
        Ok(self.storage.get_settings()?)
    }

    pub fn update_settings(&self, update: SettingsUpdate) -> Result<ExtensionSettings, SyncError> {
        validation::validate_settings_update(&update)?;
        let settings = self.storage.set_settings(update)?;
        self.notifications.settings_updated();
        Ok(settings)
    }

    /// Asks the remote service whether the API key is still valid.
    ///
    /// Returns `None` when no credentials are configured.
    pub async fn validate_token(&self) -> Result<Option<TokenCheck>, SyncError> {
        let settings = self.storage.get_settings()?;
        if !settings.has_credentials() {
            return Ok(None);
        }

        let check = Self::client(&settings)?.check_token().await;
        if !check.valid {
            warn!("Invalid API token detected");
            self.notifications.invalid_token(check.message.as_deref());
        }
        Ok(Some(check))
    }

    // === Context menu ===

    /// Stores a page captured from the context menu for the popup to file.
    ///
    /// Returns `false`, with an error notification, when no collection exists yet.
    pub fn queue_pending_link(&self, url: &str, name: &str) -> Result<bool, SyncError> {
        let result = self.store_pending_link(url, name);
        if let Err(e) = &result {
            self.notifications.api_error(&e.to_string());
        }
        result
    }

    fn store_pending_link(&self, url: &str, name: &str) -> Result<bool, SyncError> {
        if self.storage.get_collections()?.is_empty() {
            self.notifications.no_collections();
            return Ok(false);
        }

        let name = if name.trim().is_empty() { "My Links" } else { name };
        self.storage.set_pending_link(&PendingLink {
            url: url.to_string(),
            name: name.to_string(),
        })?;
        Ok(true)
    }

    pub fn get_pending_link(&self) -> Result<Option<PendingLink>, SyncError> {
        Ok(self.storage.get_pending_link()?)
    }
}
