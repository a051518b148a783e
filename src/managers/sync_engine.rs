//! Collection to bookmark bar reconciliation.
//!
//! A full sync tears down every managed folder in the bookmark bar and
//! rebuilds it from the input. A bar child is managed when its title looks like
//! a collection or favorites folder, whether it is a folder or a link. Unmanaged
//! nodes are never touched, so their relative order survives; managed folders
//! are recreated at the end of the bar.

use std::collections::HashSet;

use log::{debug, error, info, warn};

use crate::managers::bookmark_tree::BookmarkTreeApi;
use crate::managers::tree_accessor::TreeAccessor;
use crate::services::folder_naming::{
    collection_folder_title, favorites_folder_title, is_collection_prefixed,
    is_favorites_folder_title, normalize_name, strip_icon_prefix,
};
use crate::services::locale::Locale;
use crate::types::bookmark::CreateDetails;
use crate::types::collection::{Collection, Link};
use crate::types::errors::SyncError;

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Managed bar children removed during cleanup, links included.
    pub removed_folders: usize,
    pub created_folders: usize,
    pub created_links: usize,
}

/// Mirrors collections and favorites into the bookmark bar.
pub struct BookmarkSync<'a, T: BookmarkTreeApi + ?Sized> {
    api: &'a T,
    locale: Locale,
}

impl<'a, T: BookmarkTreeApi + ?Sized> BookmarkSync<'a, T> {
    pub fn new(api: &'a T, locale: Locale) -> Self {
        Self { api, locale }
    }

    /// Makes the bookmark bar's managed folders an exact image of the input.
    ///
    /// Cleanup always finishes before the first folder is created. The first
    /// failed creation aborts the pass; the next sync cleans up what was left.
    pub async fn sync_to_bookmarks(
        &self,
        favorites: &[Link],
        collections: &[Collection],
    ) -> Result<SyncReport, SyncError> {
        info!(
            "Syncing {} favorites and {} collections to bookmarks",
            favorites.len(),
            collections.len()
        );

        let bar_id = TreeAccessor::new(self.api).bookmark_bar_id().await?;
        let mut report = SyncReport::default();

        report.removed_folders += self.cleanup_collection_folders(&bar_id, collections).await?;
        report.removed_folders += self.cleanup_favorites(&bar_id).await?;

        if !favorites.is_empty() {
            report.created_links += self.create_favorites_folder(&bar_id, favorites).await?;
            report.created_folders += 1;
        }

        for collection in collections {
            if collection.name.trim().is_empty() {
                warn!("Skipping collection {} with an empty name", collection.id);
                continue;
            }
            report.created_links += self.create_collection_folder(&bar_id, collection).await?;
            report.created_folders += 1;
        }

        info!(
            "Synchronized {} favorites and {} collections ({:?})",
            favorites.len(),
            collections.len(),
            report
        );
        Ok(report)
    }

    pub async fn sync_collections_to_bookmarks(
        &self,
        collections: &[Collection],
    ) -> Result<SyncReport, SyncError> {
        self.sync_to_bookmarks(&[], collections).await
    }

    /// Removes bar children carrying the collection prefix or named after a current collection.
    async fn cleanup_collection_folders(
        &self,
        bar_id: &str,
        collections: &[Collection],
    ) -> Result<usize, SyncError> {
        let names: HashSet<String> = collections
            .iter()
            .map(|c| normalize_name(&c.name))
            .filter(|n| !n.is_empty())
            .collect();

        let children = self.api.get_children(bar_id).await?;
        let mut removed = 0;
        for child in &children {
            let managed = is_collection_prefixed(&child.title)
                || names.contains(&normalize_name(strip_icon_prefix(&child.title)));
            if !managed {
                continue;
            }
            self.api.remove_tree(&child.id).await.map_err(|e| {
                error!("Failed to remove collection folder '{}': {}", child.title, e);
                e
            })?;
            debug!("Removed existing collection folder: {}", child.title);
            removed += 1;
        }
        Ok(removed)
    }

    /// Removes bar children titled as a favorites folder under any locale.
    async fn cleanup_favorites(&self, bar_id: &str) -> Result<usize, SyncError> {
        let children = self.api.get_children(bar_id).await?;
        let mut removed = 0;
        for child in children.iter().filter(|c| is_favorites_folder_title(&c.title)) {
            self.api.remove_tree(&child.id).await.map_err(|e| {
                error!("Failed to remove favorites folder '{}': {}", child.title, e);
                e
            })?;
            debug!("Removed existing favorites folder: {}", child.title);
            removed += 1;
        }
        Ok(removed)
    }

    async fn create_favorites_folder(&self, bar_id: &str, favorites: &[Link]) -> Result<usize, SyncError> {
        let title = favorites_folder_title(self.locale);
        let folder = self.api.create(CreateDetails::folder(bar_id, &title)).await?;
        for favorite in favorites {
            self.api
                .create(CreateDetails::link(&folder.id, &favorite.name, &favorite.url))
                .await
                .map_err(|e| {
                    error!("Failed to add favorite '{}': {}", favorite.name, e);
                    e
                })?;
        }
        debug!("Created favorites folder with {} favorites", favorites.len());
        Ok(favorites.len())
    }

    async fn create_collection_folder(&self, bar_id: &str, collection: &Collection) -> Result<usize, SyncError> {
        let title = collection_folder_title(&collection.name, collection.icon.as_deref());
        let folder = self
            .api
            .create(CreateDetails::folder(bar_id, &title))
            .await
            .map_err(|e| {
                error!("Failed to create folder for collection '{}': {}", collection.name, e);
                e
            })?;
        debug!("Created folder: {} with ID: {}", folder.title, folder.id);

        for link in &collection.links {
            self.api
                .create(CreateDetails::link(&folder.id, &link.name, &link.url))
                .await
                .map_err(|e| {
                    error!("Failed to add link '{}' to '{}': {}", link.name, collection.name, e);
                    e
                })?;
        }
        Ok(collection.links.len())
    }
}
