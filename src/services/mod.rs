// Collaborators of the sync engine: naming convention, locale, settings store,
// remote client, notifications, debounced scheduling and input validation.

pub mod collections_client;
pub mod folder_naming;
pub mod locale;
pub mod notifications;
pub mod storage;
pub mod sync_scheduler;
pub mod validation;
