//! Naming convention for the folders the sync engine owns.
//!
//! Folder titles are the only key linking a bookmark folder back to a
//! collection, so every component that creates or matches a managed folder
//! goes through these functions.
//!
//! - collection folder: `"<icon> <collection name>"`, icon defaults to [`DEFAULT_COLLECTION_ICON`]
//! - favorites folder: `"⭐ Favorites"` / `"⭐ Favoris"` depending on locale
//! - backup folder: [`BACKUP_FOLDER_NAME`], never inside the bookmark bar

use crate::services::locale::Locale;

/// Icon placed before a collection name when the collection has none of its own.
pub const DEFAULT_COLLECTION_ICON: &str = "📁";

/// Title prefix of a collection folder created with the default icon.
pub const COLLECTION_PREFIX: &str = "📁 ";

/// Glyph placed before the favorites folder name.
pub const FAVORITES_STAR: &str = "⭐";

/// Title of the folder holding the user's pre-existing bookmark bar contents.
pub const BACKUP_FOLDER_NAME: &str = "Backup Favorites";

/// Untranslated favorites folder name for a locale.
pub fn favorites_base_name(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Favorites",
        Locale::French => "Favoris",
    }
}

/// Title of the favorites folder under the given locale.
pub fn favorites_folder_title(locale: Locale) -> String {
    format!("{} {}", FAVORITES_STAR, favorites_base_name(locale))
}

/// True for any favorites folder title written under any known locale, starred or not.
pub fn is_favorites_folder_title(title: &str) -> bool {
    Locale::ALL.iter().any(|locale| {
        title == favorites_base_name(*locale) || title == favorites_folder_title(*locale)
    })
}

/// Title of the folder mirroring a collection.
pub fn collection_folder_title(name: &str, icon: Option<&str>) -> String {
    let icon = icon
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_COLLECTION_ICON);
    format!("{} {}", icon, name.trim())
}

/// Drops the leading icon token (everything up to the first whitespace) and trims.
///
/// A title without whitespace is all icon and yields `""`; a title that starts
/// with whitespace has no icon token and is only trimmed.
pub fn strip_icon_prefix(title: &str) -> &str {
    title
        .trim_start_matches(|c: char| !c.is_whitespace())
        .trim()
}

/// Case-insensitive comparison of a folder's de-prefixed title with a collection name.
pub fn folder_matches_collection(title: &str, collection_name: &str) -> bool {
    normalize_name(strip_icon_prefix(title)) == normalize_name(collection_name)
}

/// True when the title carries the default collection prefix.
pub fn is_collection_prefixed(title: &str) -> bool {
    title.starts_with(COLLECTION_PREFIX)
}

/// Form used to compare collection names.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
