// collectionbar shared type definitions
// Each submodule defines types used across the crate.

pub mod bookmark;
pub mod collection;
pub mod errors;
pub mod message;
pub mod notification;
pub mod settings;
