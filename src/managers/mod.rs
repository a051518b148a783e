// Bookmark tree managers.
// Everything that reads or mutates the native bookmark tree lives here.

pub mod backup_manager;
pub mod bookmark_tree;
pub mod link_mutators;
pub mod sync_engine;
pub mod tree_accessor;
