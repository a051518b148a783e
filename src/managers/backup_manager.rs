//! Backup Manager.
//!
//! On first run the user's bookmark bar contents are moved into a
//! "Backup Favorites" folder under the catch-all folder, leaving the bar free
//! for collection folders. On reset the backup is copied back into the bar and
//! deleted. Every native API failure propagates; a half-finished backup must
//! be visible to the caller.

use std::collections::VecDeque;

use log::{error, info};

use crate::managers::bookmark_tree::BookmarkTreeApi;
use crate::managers::tree_accessor::{find_backup_child, TreeAccessor};
use crate::services::folder_naming::BACKUP_FOLDER_NAME;
use crate::types::bookmark::{BookmarkNode, CreateDetails};
use crate::types::errors::SyncError;

/// Moves bookmark bar contents into the backup folder and back.
pub struct BackupManager<'a, T: BookmarkTreeApi + ?Sized> {
    api: &'a T,
}

impl<'a, T: BookmarkTreeApi + ?Sized> BackupManager<'a, T> {
    pub fn new(api: &'a T) -> Self {
        Self { api }
    }

    /// Bookmark bar children other than the backup folder itself.
    ///
    /// Only matters when the bar and the catch-all folder are the same node;
    /// a user folder on the bar that merely carries the backup title is an
    /// ordinary item.
    async fn bar_items(&self) -> Result<Vec<BookmarkNode>, SyncError> {
        let accessor = TreeAccessor::new(self.api);
        let bar_id = accessor.bookmark_bar_id().await?;
        let backup_id = accessor.find_backup_folder().await?.map(|folder| folder.id);
        let children = self.api.get_children(&bar_id).await?;
        Ok(children
            .into_iter()
            .filter(|child| Some(&child.id) != backup_id.as_ref())
            .collect())
    }

    /// True when the bookmark bar holds anything besides the backup folder.
    pub async fn has_bookmarks_to_backup(&self) -> Result<bool, SyncError> {
        Ok(!self.bar_items().await?.is_empty())
    }

    /// Moves every bookmark bar item into the backup folder, keeping sibling order.
    ///
    /// The backup folder lives directly under the catch-all folder; an
    /// existing one there is reused, anything elsewhere is ignored. Returns
    /// the number of items moved.
    pub async fn backup_bookmarks(&self) -> Result<usize, SyncError> {
        let items = self.bar_items().await?;
        if items.is_empty() {
            info!("No bookmarks or folders to backup");
            return Ok(0);
        }

        let accessor = TreeAccessor::new(self.api);
        let parent_id = accessor.catch_all_id().await?;
        let siblings = self.api.get_children(&parent_id).await?;
        let backup_id = match find_backup_child(&siblings) {
            Some(folder) => folder.id.clone(),
            None => {
                let folder = self
                    .api
                    .create(CreateDetails::folder(&parent_id, BACKUP_FOLDER_NAME))
                    .await
                    .map_err(|e| {
                        error!("Failed to create backup folder under {}: {}", parent_id, e);
                        e
                    })?;
                info!("Created backup folder {} under {}", folder.id, parent_id);
                folder.id
            }
        };

        for item in &items {
            self.api.move_node(&item.id, &backup_id).await.map_err(|e| {
                error!("Failed to move '{}' into backup folder: {}", item.title, e);
                e
            })?;
        }

        info!("Backed up {} items successfully", items.len());
        Ok(items.len())
    }

    /// Recreates the backup folder's contents in the bookmark bar, then deletes the backup.
    ///
    /// Folders are recreated level by level so nested structure and sibling
    /// order survive. Returns the number of nodes recreated; `0` when there
    /// is no backup or it is empty, in which case nothing is touched.
    pub async fn restore_bookmarks(&self) -> Result<usize, SyncError> {
        let accessor = TreeAccessor::new(self.api);
        let backup = match accessor.find_backup_folder().await? {
            Some(folder) => folder,
            None => {
                info!("No backup folder to restore");
                return Ok(0);
            }
        };
        if backup.child_nodes().is_empty() {
            info!("Backup folder is empty, nothing to restore");
            return Ok(0);
        }

        let bar_id = accessor.bookmark_bar_id().await?;
        let mut pending: VecDeque<(String, Vec<BookmarkNode>)> = VecDeque::new();
        pending.push_back((bar_id, backup.child_nodes().to_vec()));

        let mut restored = 0;
        while let Some((parent_id, nodes)) = pending.pop_front() {
            for node in nodes {
                let is_folder = node.is_folder();
                let created = self
                    .api
                    .create(CreateDetails {
                        parent_id: parent_id.clone(),
                        title: node.title,
                        url: node.url,
                    })
                    .await
                    .map_err(|e| {
                        error!("Failed to restore bookmark into {}: {}", parent_id, e);
                        e
                    })?;
                restored += 1;

                if is_folder {
                    pending.push_back((created.id, node.children.unwrap_or_default()));
                }
            }
        }

        self.api.remove_tree(&backup.id).await?;
        info!("Restored {} bookmarks from backup", restored);
        Ok(restored)
    }

    /// Deletes every direct child of the bookmark bar except the backup folder.
    pub async fn clear_bookmark_bar(&self) -> Result<usize, SyncError> {
        let items = self.bar_items().await?;
        for item in &items {
            self.api.remove_tree(&item.id).await?;
        }
        info!("Cleared {} items from the bookmark bar", items.len());
        Ok(items.len())
    }
}
