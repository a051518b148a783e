//! Native bookmark tree access.
//!
//! `BookmarkTreeApi` is the narrow operation set every sync component goes
//! through. `SqliteBookmarkTree` implements it over a local SQLite adjacency
//! list with the same rules a browser enforces: the root and its special
//! top-level folders cannot be moved, renamed or removed, and `remove` refuses
//! non-empty folders.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::database::connection::Database;
use crate::types::bookmark::{BookmarkNode, BrowserLayout, CreateDetails, UpdateChanges};
use crate::types::errors::NativeApiError;

/// Operations of the browser's native bookmark API.
///
/// Every call is a suspension point; the tree may change between two calls.
#[async_trait]
pub trait BookmarkTreeApi: Send + Sync {
    /// Returns the root node with all descendants populated.
    async fn get_tree(&self) -> Result<BookmarkNode, NativeApiError>;
    /// Lists the direct children of a folder, without their own children.
    async fn get_children(&self, folder_id: &str) -> Result<Vec<BookmarkNode>, NativeApiError>;
    /// Creates a folder (no url) or link at the end of `parent_id`.
    async fn create(&self, details: CreateDetails) -> Result<BookmarkNode, NativeApiError>;
    /// Moves a node, with its subtree, to the end of another folder.
    async fn move_node(&self, id: &str, parent_id: &str) -> Result<BookmarkNode, NativeApiError>;
    async fn update(&self, id: &str, changes: UpdateChanges) -> Result<BookmarkNode, NativeApiError>;
    /// Removes a link or an empty folder.
    async fn remove(&self, id: &str) -> Result<(), NativeApiError>;
    /// Removes a node and everything below it.
    async fn remove_tree(&self, id: &str) -> Result<(), NativeApiError>;
}

/// Bookmark tree persisted in the local SQLite database.
pub struct SqliteBookmarkTree {
    db: Arc<Database>,
}

impl SqliteBookmarkTree {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Installs the browser's default special folders when the store is empty.
    pub fn seed_layout(&self, layout: BrowserLayout) -> Result<(), NativeApiError> {
        let conn = self.db.connection();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM bookmark_nodes", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let (root_id, folders) = layout.special_folders();
        let now = Self::now();
        conn.execute(
            "INSERT INTO bookmark_nodes (id, parent_id, title, url, position, date_added) VALUES (?1, NULL, '', NULL, 0, ?2)",
            params![root_id, now],
        )?;
        for (position, (id, title)) in folders.iter().enumerate() {
            conn.execute(
                "INSERT INTO bookmark_nodes (id, parent_id, title, url, position, date_added) VALUES (?1, ?2, ?3, NULL, ?4, ?5)",
                params![id, root_id, title, position as i64, now],
            )?;
        }
        log::debug!("Seeded {:?} bookmark layout", layout);
        Ok(())
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<BookmarkNode> {
        Ok(BookmarkNode {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            children: None,
        })
    }

    fn load_node(conn: &Connection, id: &str) -> Result<BookmarkNode, NativeApiError> {
        conn.query_row(
            "SELECT id, parent_id, title, url FROM bookmark_nodes WHERE id = ?1",
            params![id],
            Self::row_to_node,
        )
        .optional()?
        .ok_or_else(|| NativeApiError::NotFound(id.to_string()))
    }

    fn load_children(conn: &Connection, parent_id: &str) -> Result<Vec<BookmarkNode>, NativeApiError> {
        let mut stmt = conn.prepare(
            "SELECT id, parent_id, title, url FROM bookmark_nodes \
             WHERE parent_id = ?1 ORDER BY position, rowid",
        )?;
        let rows = stmt.query_map(params![parent_id], Self::row_to_node)?;

        let mut children = Vec::new();
        for row in rows {
            children.push(row?);
        }
        Ok(children)
    }

    fn populate(conn: &Connection, node: &mut BookmarkNode) -> Result<(), NativeApiError> {
        if !node.is_folder() {
            return Ok(());
        }
        let mut children = Self::load_children(conn, &node.id)?;
        for child in children.iter_mut() {
            Self::populate(conn, child)?;
        }
        node.children = Some(children);
        Ok(())
    }

    fn load_folder(conn: &Connection, id: &str) -> Result<BookmarkNode, NativeApiError> {
        let node = Self::load_node(conn, id)?;
        if !node.is_folder() {
            return Err(NativeApiError::NotAFolder(id.to_string()));
        }
        Ok(node)
    }

    /// The root and its direct children are owned by the browser.
    fn ensure_modifiable(conn: &Connection, node: &BookmarkNode) -> Result<(), NativeApiError> {
        let protected = match &node.parent_id {
            None => true,
            Some(parent_id) => Self::load_node(conn, parent_id)?.parent_id.is_none(),
        };
        if protected {
            return Err(NativeApiError::ProtectedNode(node.id.clone()));
        }
        Ok(())
    }

    fn next_position(conn: &Connection, parent_id: &str) -> Result<i64, NativeApiError> {
        let position = conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM bookmark_nodes WHERE parent_id = ?1",
            params![parent_id],
            |row| row.get(0),
        )?;
        Ok(position)
    }

    /// Walks up from `candidate` looking for `ancestor`.
    fn is_within(conn: &Connection, candidate: &str, ancestor: &str) -> Result<bool, NativeApiError> {
        let mut current = Some(candidate.to_string());
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = Self::load_node(conn, &id)?.parent_id;
        }
        Ok(false)
    }

    fn get_tree_blocking(&self) -> Result<BookmarkNode, NativeApiError> {
        let conn = self.db.connection();
        let mut root = conn
            .query_row(
                "SELECT id, parent_id, title, url FROM bookmark_nodes \
                 WHERE parent_id IS NULL ORDER BY position, rowid LIMIT 1",
                [],
                Self::row_to_node,
            )
            .optional()?
            .ok_or_else(|| NativeApiError::NotFound("root".to_string()))?;
        Self::populate(&conn, &mut root)?;
        Ok(root)
    }

    fn get_children_blocking(&self, folder_id: &str) -> Result<Vec<BookmarkNode>, NativeApiError> {
        let conn = self.db.connection();
        Self::load_folder(&conn, folder_id)?;
        Self::load_children(&conn, folder_id)
    }

    fn create_blocking(&self, details: CreateDetails) -> Result<BookmarkNode, NativeApiError> {
        let conn = self.db.connection();
        Self::load_folder(&conn, &details.parent_id)?;

        let id = Uuid::new_v4().to_string();
        let position = Self::next_position(&conn, &details.parent_id)?;
        conn.execute(
            "INSERT INTO bookmark_nodes (id, parent_id, title, url, position, date_added) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, details.parent_id, details.title, details.url, position, Self::now()],
        )?;

        Ok(BookmarkNode {
            id,
            parent_id: Some(details.parent_id),
            title: details.title,
            url: details.url,
            children: None,
        })
    }

    fn move_blocking(&self, id: &str, parent_id: &str) -> Result<BookmarkNode, NativeApiError> {
        let conn = self.db.connection();
        let node = Self::load_node(&conn, id)?;
        Self::ensure_modifiable(&conn, &node)?;
        Self::load_folder(&conn, parent_id)?;

        if node.is_folder() && Self::is_within(&conn, parent_id, id)? {
            return Err(NativeApiError::InvalidOperation(format!(
                "cannot move folder {} into its own subtree",
                id
            )));
        }

        let position = Self::next_position(&conn, parent_id)?;
        conn.execute(
            "UPDATE bookmark_nodes SET parent_id = ?1, position = ?2 WHERE id = ?3",
            params![parent_id, position, id],
        )?;

        Ok(BookmarkNode {
            parent_id: Some(parent_id.to_string()),
            ..node
        })
    }

    fn update_blocking(&self, id: &str, changes: UpdateChanges) -> Result<BookmarkNode, NativeApiError> {
        let conn = self.db.connection();
        let node = Self::load_node(&conn, id)?;
        Self::ensure_modifiable(&conn, &node)?;

        if node.is_folder() && changes.url.is_some() {
            return Err(NativeApiError::InvalidOperation(format!(
                "cannot set a url on folder {}",
                id
            )));
        }

        conn.execute(
            "UPDATE bookmark_nodes SET title = COALESCE(?1, title), url = COALESCE(?2, url) WHERE id = ?3",
            params![changes.title, changes.url, id],
        )?;
        Self::load_node(&conn, id)
    }

    fn remove_blocking(&self, id: &str) -> Result<(), NativeApiError> {
        let conn = self.db.connection();
        let node = Self::load_node(&conn, id)?;
        Self::ensure_modifiable(&conn, &node)?;

        if node.is_folder() {
            let children: i64 = conn.query_row(
                "SELECT COUNT(*) FROM bookmark_nodes WHERE parent_id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            if children > 0 {
                return Err(NativeApiError::FolderNotEmpty(id.to_string()));
            }
        }

        conn.execute("DELETE FROM bookmark_nodes WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn remove_tree_blocking(&self, id: &str) -> Result<(), NativeApiError> {
        let conn = self.db.connection();
        let node = Self::load_node(&conn, id)?;
        Self::ensure_modifiable(&conn, &node)?;

        conn.execute(
            "WITH RECURSIVE subtree(id) AS ( \
                 SELECT id FROM bookmark_nodes WHERE id = ?1 \
                 UNION ALL \
                 SELECT n.id FROM bookmark_nodes n JOIN subtree s ON n.parent_id = s.id \
             ) \
             DELETE FROM bookmark_nodes WHERE id IN (SELECT id FROM subtree)",
            params![id],
        )?;
        Ok(())
    }
}

#[async_trait]
impl BookmarkTreeApi for SqliteBookmarkTree {
    async fn get_tree(&self) -> Result<BookmarkNode, NativeApiError> {
        self.get_tree_blocking()
    }

    async fn get_children(&self, folder_id: &str) -> Result<Vec<BookmarkNode>, NativeApiError> {
        self.get_children_blocking(folder_id)
    }

    async fn create(&self, details: CreateDetails) -> Result<BookmarkNode, NativeApiError> {
        self.create_blocking(details)
    }

    async fn move_node(&self, id: &str, parent_id: &str) -> Result<BookmarkNode, NativeApiError> {
        self.move_blocking(id, parent_id)
    }

    async fn update(&self, id: &str, changes: UpdateChanges) -> Result<BookmarkNode, NativeApiError> {
        self.update_blocking(id, changes)
    }

    async fn remove(&self, id: &str) -> Result<(), NativeApiError> {
        self.remove_blocking(id)
    }

    async fn remove_tree(&self, id: &str) -> Result<(), NativeApiError> {
        self.remove_tree_blocking(id)
    }
}
