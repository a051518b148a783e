//! Locates the browser's special bookmark folders.
//!
//! Browsers do not label their top-level folders in a portable way: Chromium
//! uses numeric ids (`1` = bookmarks bar, `2` = other bookmarks), Firefox uses
//! padded GUIDs (`toolbar_____`, `menu________`) and localizes titles. Both
//! resolutions below are ordered fallback chains over the root's direct children.

use crate::managers::bookmark_tree::BookmarkTreeApi;
use crate::services::folder_naming::{folder_matches_collection, BACKUP_FOLDER_NAME};
use crate::types::bookmark::BookmarkNode;
use crate::types::errors::{ResolutionError, SyncError};

/// Chromium id of the bookmarks bar.
pub const CHROMIUM_BOOKMARK_BAR_ID: &str = "1";

/// Chromium id of "Other bookmarks".
pub const CHROMIUM_OTHER_BOOKMARKS_ID: &str = "2";

const TOOLBAR_TITLES: &[&str] = &["Bookmarks Toolbar", "Bookmark Toolbar", "Barre de favoris"];
const TOOLBAR_ID_SUFFIX: &str = "toolbar";

/// Titles of the bookmarks-menu folder; it must never be taken for the toolbar.
const MENU_TITLES: &[&str] = &[
    "Bookmarks Menu",
    "Bookmark Menu",
    "Menu des marque-pages",
    "Menu des favoris",
];
const MENU_ID_SUFFIX: &str = "menu";

const OTHER_BOOKMARKS_TITLES: &[&str] = &["Other Bookmarks", "Other bookmarks", "Autres favoris"];

/// Firefox pads its GUIDs with underscores: `toolbar_____`.
fn id_has_suffix(id: &str, suffix: &str) -> bool {
    id.trim_end_matches('_').ends_with(suffix)
}

fn is_menu_folder(node: &BookmarkNode) -> bool {
    MENU_TITLES.contains(&node.title.as_str()) || id_has_suffix(&node.id, MENU_ID_SUFFIX)
}

/// Resolves the bookmark bar among the root's children.
///
/// 1. Chromium's fixed id
/// 2. a known toolbar title
/// 3. an id ending in `toolbar`
/// 4. the first child that is not the bookmarks menu
/// 5. the first child
pub fn resolve_bookmark_bar(root: &BookmarkNode) -> Result<&BookmarkNode, ResolutionError> {
    let top = root.child_nodes();
    top.iter()
        .find(|n| n.id == CHROMIUM_BOOKMARK_BAR_ID)
        .or_else(|| top.iter().find(|n| TOOLBAR_TITLES.contains(&n.title.as_str())))
        .or_else(|| top.iter().find(|n| id_has_suffix(&n.id, TOOLBAR_ID_SUFFIX)))
        .or_else(|| top.iter().find(|n| !MENU_TITLES.contains(&n.title.as_str())))
        .or_else(|| top.first())
        .ok_or(ResolutionError::EmptyRoot)
}

/// Resolves the catch-all folder that hosts the backup folder.
///
/// Prefers the Firefox bookmarks menu, then Chromium's "Other bookmarks",
/// then the second child, then the first.
pub fn resolve_catch_all(root: &BookmarkNode) -> Result<&BookmarkNode, ResolutionError> {
    let top = root.child_nodes();
    top.iter()
        .find(|n| is_menu_folder(n))
        .or_else(|| {
            top.iter().find(|n| {
                n.id == CHROMIUM_OTHER_BOOKMARKS_ID
                    || OTHER_BOOKMARKS_TITLES.contains(&n.title.as_str())
            })
        })
        .or_else(|| top.get(1))
        .or_else(|| top.first())
        .ok_or(ResolutionError::EmptyRoot)
}

/// Depth-first search for a folder with exactly this title.
pub fn find_folder_by_title<'a>(node: &'a BookmarkNode, title: &str) -> Option<&'a BookmarkNode> {
    for child in node.child_nodes() {
        if child.is_folder() && child.title == title {
            return Some(child);
        }
        if let Some(found) = find_folder_by_title(child, title) {
            return Some(found);
        }
    }
    None
}

/// The backup folder among one folder's direct children.
pub fn find_backup_child(children: &[BookmarkNode]) -> Option<&BookmarkNode> {
    children
        .iter()
        .find(|child| child.is_folder() && child.title == BACKUP_FOLDER_NAME)
}

/// Reads the live tree and resolves folders on each call; nothing is cached.
pub struct TreeAccessor<'a, T: BookmarkTreeApi + ?Sized> {
    api: &'a T,
}

impl<'a, T: BookmarkTreeApi + ?Sized> TreeAccessor<'a, T> {
    pub fn new(api: &'a T) -> Self {
        Self { api }
    }

    pub async fn bookmark_bar_id(&self) -> Result<String, SyncError> {
        let tree = self.api.get_tree().await?;
        Ok(resolve_bookmark_bar(&tree)?.id.clone())
    }

    pub async fn catch_all_id(&self) -> Result<String, SyncError> {
        let tree = self.api.get_tree().await?;
        Ok(resolve_catch_all(&tree)?.id.clone())
    }

    /// Locates the backup folder.
    ///
    /// A direct child of the catch-all folder wins. Otherwise every top-level
    /// folder except the bookmark bar is searched; a folder on the bar with
    /// the backup title belongs to the user.
    pub async fn find_backup_folder(&self) -> Result<Option<BookmarkNode>, SyncError> {
        let tree = self.api.get_tree().await?;
        let catch_all = resolve_catch_all(&tree)?;
        if let Some(folder) = find_backup_child(catch_all.child_nodes()) {
            return Ok(Some(folder.clone()));
        }

        let bar_id = &resolve_bookmark_bar(&tree)?.id;
        Ok(tree
            .child_nodes()
            .iter()
            .filter(|top| &top.id != bar_id)
            .find_map(|top| find_folder_by_title(top, BACKUP_FOLDER_NAME))
            .cloned())
    }

    /// Finds the first direct folder child of `parent_id` whose de-prefixed title matches `name`.
    pub async fn find_collection_folder(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Option<BookmarkNode>, SyncError> {
        let children = self.api.get_children(parent_id).await?;
        Ok(children
            .into_iter()
            .find(|child| child.is_folder() && folder_matches_collection(&child.title, name)))
    }
}
