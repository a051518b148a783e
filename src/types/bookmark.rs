use serde::{Deserialize, Serialize};

/// A node in the browser's native bookmark tree. A node without `url` is a folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Populated by `get_tree`; `None` for links and for shallow listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    /// Direct children, or an empty slice when they were not loaded.
    pub fn child_nodes(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Arguments for creating a bookmark or folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDetails {
    pub parent_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CreateDetails {
    pub fn folder(parent_id: &str, title: &str) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            url: None,
        }
    }

    pub fn link(parent_id: &str, title: &str, url: &str) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
        }
    }
}

/// In-place changes for `update`; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Default special-folder layout of a browser family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowserLayout {
    Chromium,
    Firefox,
}

impl BrowserLayout {
    /// Parses `chromium`/`chrome` or `firefox`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "chromium" | "chrome" => Some(BrowserLayout::Chromium),
            "firefox" => Some(BrowserLayout::Firefox),
            _ => None,
        }
    }

    /// Root id followed by `(id, title)` for each special top-level folder.
    pub fn special_folders(&self) -> (&'static str, &'static [(&'static str, &'static str)]) {
        match self {
            BrowserLayout::Chromium => (
                "0",
                &[
                    ("1", "Bookmarks bar"),
                    ("2", "Other bookmarks"),
                    ("3", "Mobile bookmarks"),
                ],
            ),
            BrowserLayout::Firefox => (
                "root________",
                &[
                    ("menu________", "Bookmarks Menu"),
                    ("toolbar_____", "Bookmarks Toolbar"),
                    ("unfiled_____", "Other Bookmarks"),
                    ("mobile______", "Mobile Bookmarks"),
                ],
            ),
        }
    }
}
