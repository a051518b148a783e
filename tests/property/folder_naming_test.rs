//! Property-based tests for collection folder titles.
//!
//! A folder written for a collection must always be recognised as that
//! collection's folder again, whatever icon it carries.

use collectionbar::services::folder_naming::{
    collection_folder_title, favorites_folder_title, folder_matches_collection,
    is_collection_prefixed, is_favorites_folder_title, normalize_name, strip_icon_prefix,
};
use collectionbar::services::locale::Locale;
use proptest::prelude::*;

/// Collection names with inner spaces and optional padding.
fn arb_name() -> impl Strategy<Value = String> {
    (" {0,2}", "[A-Za-z0-9][A-Za-z0-9 ]{0,20}", " {0,2}")
        .prop_map(|(lead, body, trail)| format!("{}{}{}", lead, body.trim_end(), trail))
}

fn arb_icon() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop_oneof![
        Just("🍳".to_string()),
        Just("★".to_string()),
        Just("🎵🎶".to_string()),
        Just("#".to_string()),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn written_title_matches_its_collection(name in arb_name(), icon in arb_icon()) {
        let title = collection_folder_title(&name, icon.as_deref());

        prop_assert!(folder_matches_collection(&title, &name));
        prop_assert!(folder_matches_collection(&title, &name.to_uppercase()));
        prop_assert_eq!(strip_icon_prefix(&title), name.trim());
    }

    #[test]
    fn default_icon_is_prefixed(name in arb_name()) {
        let title = collection_folder_title(&name, None);
        prop_assert!(is_collection_prefixed(&title));
        prop_assert!(!is_favorites_folder_title(&title));
    }

    #[test]
    fn normalize_is_idempotent(name in arb_name()) {
        let once = normalize_name(&name);
        prop_assert_eq!(normalize_name(&once), once.clone());
    }
}

#[test]
fn favorites_titles_are_recognised_in_every_locale() {
    for locale in Locale::ALL {
        assert!(is_favorites_folder_title(&favorites_folder_title(locale)));
    }
}
