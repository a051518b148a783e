//! Single-item bookmark updates applied right after a user action.
//!
//! These do not wait for a full sync and are not kept consistent with one
//! running concurrently; the caller schedules a full sync afterwards. A missing
//! folder or link is a logged no-op, any other native failure propagates.

use log::{info, warn};

use crate::managers::bookmark_tree::BookmarkTreeApi;
use crate::managers::tree_accessor::TreeAccessor;
use crate::services::folder_naming::collection_folder_title;
use crate::types::bookmark::{BookmarkNode, CreateDetails, UpdateChanges};
use crate::types::collection::Link;
use crate::types::errors::SyncError;

pub struct BookmarkMutator<'a, T: BookmarkTreeApi + ?Sized> {
    api: &'a T,
}

impl<'a, T: BookmarkTreeApi + ?Sized> BookmarkMutator<'a, T> {
    pub fn new(api: &'a T) -> Self {
        Self { api }
    }

    fn accessor(&self) -> TreeAccessor<'a, T> {
        TreeAccessor::new(self.api)
    }

    /// The collection's folder in the bookmark bar, if any.
    async fn collection_folder(&self, collection_name: &str) -> Result<Option<BookmarkNode>, SyncError> {
        let accessor = self.accessor();
        let bar_id = accessor.bookmark_bar_id().await?;
        accessor.find_collection_folder(&bar_id, collection_name).await
    }

    /// The link inside the collection's folder whose url is `url`.
    async fn find_link(&self, url: &str, collection_name: &str) -> Result<Option<BookmarkNode>, SyncError> {
        let folder = match self.collection_folder(collection_name).await? {
            Some(folder) => folder,
            None => {
                warn!("Collection folder not found: {}", collection_name);
                return Ok(None);
            }
        };
        let children = self.api.get_children(&folder.id).await?;
        Ok(children.into_iter().find(|c| c.url.as_deref() == Some(url)))
    }

    /// Appends the link to the collection's folder, creating the folder when absent.
    ///
    /// Does nothing until the backup folder exists. Returns whether a bookmark was created.
    pub async fn add_link_to_bookmarks(&self, link: &Link, collection_name: &str) -> Result<bool, SyncError> {
        let accessor = self.accessor();
        if accessor.find_backup_folder().await?.is_none() {
            warn!("Backup folder not found, cannot add link");
            return Ok(false);
        }

        let bar_id = accessor.bookmark_bar_id().await?;
        let folder = match accessor.find_collection_folder(&bar_id, collection_name).await? {
            Some(folder) => folder,
            None => {
                let title = collection_folder_title(collection_name, None);
                self.api.create(CreateDetails::folder(&bar_id, &title)).await?
            }
        };

        self.api
            .create(CreateDetails::link(&folder.id, &link.name, &link.url))
            .await?;
        info!("Added link to bookmarks: {}", link.name);
        Ok(true)
    }

    /// Removes the link with this url from the collection's folder.
    pub async fn remove_link_from_bookmarks(&self, url: &str, collection_name: &str) -> Result<bool, SyncError> {
        match self.find_link(url, collection_name).await? {
            Some(node) => {
                self.api.remove(&node.id).await?;
                info!("Removed link from bookmarks: {}", node.title);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rewrites the title and url of the bookmark whose url matches `link.url`.
    pub async fn update_link_in_bookmarks(&self, link: &Link, collection_name: &str) -> Result<bool, SyncError> {
        match self.find_link(&link.url, collection_name).await? {
            Some(node) => {
                let changes = UpdateChanges {
                    title: Some(link.name.clone()),
                    url: Some(link.url.clone()),
                };
                self.api.update(&node.id, changes).await?;
                info!("Updated link in bookmarks: {}", link.name);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Deletes the collection's folder and everything in it.
    pub async fn remove_collection_from_bookmarks(&self, collection_name: &str) -> Result<bool, SyncError> {
        match self.collection_folder(collection_name).await? {
            Some(folder) => {
                self.api.remove_tree(&folder.id).await?;
                info!("Removed collection from bookmarks: {}", collection_name);
                Ok(true)
            }
            None => {
                warn!("Collection folder not found: {}", collection_name);
                Ok(false)
            }
        }
    }
}
