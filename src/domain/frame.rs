//! Site frame data: top bar, footer and branding shared by every page.

use serde::{Deserialize, Serialize};

/// Which list of the website settings a top bar item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "top_bar_field", rename_all = "snake_case")]
pub enum TopBarField {
    TopBar,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBarItemRecord {
    pub field: TopBarField,
    pub idx: i32,
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent_label: Option<String>,
}

impl TopBarItemRecord {
    fn parent(&self) -> Option<&str> {
        self.parent_label
            .as_deref()
            .filter(|label| !label.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteSettingsRecord {
    /// Name of the web page served for `index`.
    #[serde(default)]
    pub home_page: Option<String>,
    #[serde(default)]
    pub brand_html: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameLink {
    pub label: String,
    pub url: Option<String>,
}

impl From<TopBarItemRecord> for FrameLink {
    fn from(item: TopBarItemRecord) -> Self {
        Self {
            label: item.label,
            url: item.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopBarEntry {
    pub label: String,
    pub url: Option<String>,
    pub child_items: Vec<FrameLink>,
}

/// Group a flat, `idx`-ordered list of top bar items into a two-level menu.
///
/// Items without a parent label become top-level entries. Every other item is
/// attached to the first top-level entry whose label equals its parent label;
/// items whose parent does not exist are dropped.
pub fn group_top_bar(items: Vec<TopBarItemRecord>) -> Vec<TopBarEntry> {
    let (top, children): (Vec<_>, Vec<_>) =
        items.into_iter().partition(|item| item.parent().is_none());

    let mut entries: Vec<TopBarEntry> = top
        .into_iter()
        .map(|item| TopBarEntry {
            label: item.label,
            url: item.url,
            child_items: Vec::new(),
        })
        .collect();

    for child in children {
        let Some(parent) = child.parent().map(str::to_string) else {
            continue;
        };
        if let Some(entry) = entries.iter_mut().find(|entry| entry.label == parent) {
            entry.child_items.push(FrameLink::from(child));
        }
    }

    entries
}

/// Global context merged into every rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteFrame {
    pub top_bar_items: Vec<TopBarEntry>,
    pub footer_items: Vec<FrameLink>,
    pub brand: String,
    pub copyright: Option<String>,
    pub favicon: Option<String>,
}
