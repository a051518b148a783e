//! CollectionBar: mirrors link collections from a remote service into the
//! browser's bookmark bar, keeping the user's own bookmarks safe in a backup folder.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
