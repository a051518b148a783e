//! UI locale selection.
//!
//! Only the languages the bookmark folder names are translated into are modelled.
//! The locale is always passed explicitly to code that depends on it.

use std::env;

/// Languages with their own favorites-folder spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    English,
    French,
}

impl Locale {
    /// Every known locale; used when matching names written under any of them.
    pub const ALL: [Locale; 2] = [Locale::English, Locale::French];

    /// Maps a language tag such as `fr`, `fr-CA` or `fr_FR.UTF-8` to a locale.
    /// Anything that is not French falls back to English.
    pub fn from_language_tag(tag: &str) -> Self {
        if tag.trim().to_lowercase().starts_with("fr") {
            Locale::French
        } else {
            Locale::English
        }
    }

    /// Detects the locale from `LC_ALL`, then `LANG`.
    pub fn detect_system_locale() -> Self {
        let tag = ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_default();
        Self::from_language_tag(&tag)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::French => "fr",
        }
    }
}
