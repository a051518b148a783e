//! Unit tests for the bookmark store database layer (connection + migrations).

use std::sync::Arc;

use collectionbar::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use collectionbar::database::Database;
use collectionbar::managers::bookmark_tree::{BookmarkTreeApi, SqliteBookmarkTree};
use collectionbar::types::bookmark::{BrowserLayout, CreateDetails};
use tempfile::TempDir;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_tree_table_and_index() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for (kind, name) in [("table", "bookmark_nodes"), ("index", "idx_bookmark_nodes_parent")] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = ?1 AND name = ?2",
                [kind, name],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "{} '{}' should exist after migrations", kind, name);
    }
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();
    assert!(run_all(&conn).is_ok(), "Running migrations twice should succeed");
    assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_node_schema_accepts_folders_and_links() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute(
        "INSERT INTO bookmark_nodes (id, parent_id, title, url, position, date_added)
         VALUES ('f', NULL, 'Folder', NULL, 0, 1700000000),
                ('l', 'f', 'Link', 'https://example.com', 0, 1700000000)",
        [],
    )
    .expect("Should insert nodes");

    let url: Option<String> = conn
        .query_row("SELECT url FROM bookmark_nodes WHERE id = 'f'", [], |row| row.get(0))
        .expect("Should query folder");
    assert!(url.is_none());
}

#[tokio::test]
async fn test_file_database_persists_tree() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("bookmarks.db");

    {
        let tree = SqliteBookmarkTree::new(Arc::new(Database::open(&db_path).unwrap()));
        tree.seed_layout(BrowserLayout::Chromium).unwrap();
        tree.create(CreateDetails::link("1", "Saved", "https://saved.example"))
            .await
            .unwrap();
    }
    assert!(db_path.exists(), "Database file should exist on disk");

    let tree = SqliteBookmarkTree::new(Arc::new(Database::open(&db_path).unwrap()));
    tree.seed_layout(BrowserLayout::Chromium).unwrap();
    let bar = tree.get_children("1").await.unwrap();
    assert_eq!(bar.len(), 1);
    assert_eq!(bar[0].title, "Saved");
}
