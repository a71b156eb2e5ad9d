//! In-process repositories, optionally seeded from a TOML content file.
//!
//! Used when no database URL is configured and throughout the tests.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::application::repos::{ContentRepo, RepoError, WebsiteSettingsRepo};
use crate::domain::content::{BlogPost, ContentRecord, ProductItem, RecordKind, WebPage};
use crate::domain::frame::{TopBarField, TopBarItemRecord, WebsiteSettingsRecord};

use super::error::InfraError;

/// Content file layout accepted by [`MemoryRepositories::from_seed`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentSeed {
    pub settings: WebsiteSettingsRecord,
    pub web_pages: Vec<WebPage>,
    pub blog_posts: Vec<BlogPost>,
    pub product_items: Vec<ProductItem>,
    pub top_bar_items: Vec<TopBarItemRecord>,
}

impl ContentSeed {
    pub fn parse(source: &str) -> Result<Self, InfraError> {
        toml::from_str(source).map_err(|err| InfraError::seed(err.to_string()))
    }
}

#[derive(Default)]
pub struct MemoryRepositories {
    records: RwLock<Vec<ContentRecord>>,
    settings: RwLock<WebsiteSettingsRecord>,
    top_bar_items: RwLock<Vec<TopBarItemRecord>>,
}

impl MemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: ContentSeed) -> Self {
        let ContentSeed {
            settings,
            web_pages,
            blog_posts,
            product_items,
            top_bar_items,
        } = seed;

        let records = web_pages
            .into_iter()
            .map(ContentRecord::WebPage)
            .chain(blog_posts.into_iter().map(ContentRecord::BlogPost))
            .chain(product_items.into_iter().map(ContentRecord::ProductItem))
            .collect();

        Self {
            records: RwLock::new(records),
            settings: RwLock::new(settings),
            top_bar_items: RwLock::new(top_bar_items),
        }
    }

    pub async fn load_seed_file(path: &Path) -> Result<Self, InfraError> {
        let source = tokio::fs::read_to_string(path).await?;
        let seed = ContentSeed::parse(&source).map_err(|err| {
            InfraError::seed(format!("{}: {err}", path.display()))
        })?;
        Ok(Self::from_seed(seed))
    }

    /// Insert or replace a record by kind and name.
    pub async fn upsert_record(&self, record: ContentRecord) {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|existing| existing.kind() == record.kind() && existing.name() == record.name())
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    pub async fn set_settings(&self, settings: WebsiteSettingsRecord) {
        *self.settings.write().await = settings;
    }

    pub async fn push_top_bar_item(&self, item: TopBarItemRecord) {
        self.top_bar_items.write().await.push(item);
    }

    pub async fn record(&self, kind: RecordKind, name: &str) -> Option<ContentRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.kind() == kind && record.name() == name)
            .cloned()
    }
}

#[async_trait]
impl ContentRepo for MemoryRepositories {
    async fn find_visible_by_slug(
        &self,
        kind: RecordKind,
        slug: &str,
    ) -> Result<Option<String>, RepoError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.kind() == kind && record.slug() == slug && record.is_visible())
            .map(|record| record.name().to_string()))
    }

    async fn load_record(
        &self,
        kind: RecordKind,
        name: &str,
    ) -> Result<Option<ContentRecord>, RepoError> {
        Ok(self.record(kind, name).await)
    }

    async fn slug_in_use(
        &self,
        kind: RecordKind,
        slug: &str,
        exclude_name: &str,
    ) -> Result<bool, RepoError> {
        Ok(self.records.read().await.iter().any(|record| {
            record.kind() == kind && record.slug() == slug && record.name() != exclude_name
        }))
    }

    async fn update_title(
        &self,
        kind: RecordKind,
        name: &str,
        title: &str,
        slug: &str,
    ) -> Result<(), RepoError> {
        let mut records = self.records.write().await;

        // Same rule as the `<table>_slug_key` unique indexes.
        let taken = !slug.is_empty()
            && records.iter().any(|record| {
                record.kind() == kind && record.slug() == slug && record.name() != name
            });
        if taken {
            return Err(RepoError::Duplicate {
                constraint: format!("{}_slug_key", kind.table()),
            });
        }

        let record = records
            .iter_mut()
            .find(|record| record.kind() == kind && record.name() == name)
            .ok_or(RepoError::NotFound)?;
        record.set_title(title);
        record.set_slug(slug);
        Ok(())
    }
}

#[async_trait]
impl WebsiteSettingsRepo for MemoryRepositories {
    async fn load_website_settings(&self) -> Result<WebsiteSettingsRecord, RepoError> {
        Ok(self.settings.read().await.clone())
    }

    async fn list_top_bar_items(
        &self,
        field: TopBarField,
    ) -> Result<Vec<TopBarItemRecord>, RepoError> {
        let mut items: Vec<_> = self
            .top_bar_items
            .read()
            .await
            .iter()
            .filter(|item| item.field == field)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.idx);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[settings]
home_page = "Home"
brand_html = "<b>Acme</b>"

[[web_pages]]
name = "Home"
title = "Welcome"
slug = "welcome"
published = true
main_section = "<p>hello</p>"

[[blog_posts]]
name = "POST-1"
title = "Draft"
slug = "draft"
published_on = "2024-03-01"

[[product_items]]
name = "ITEM-1"
item_name = "Widget"
slug = "widget"
show_in_website = true
price = 9.5

[[top_bar_items]]
field = "footer"
idx = 2
label = "Privacy"

[[top_bar_items]]
field = "footer"
idx = 1
label = "Terms"

[[top_bar_items]]
field = "top_bar"
idx = 1
label = "Home"
url = "/"
"#;

    #[tokio::test]
    async fn seed_populates_every_collection() {
        let repos = MemoryRepositories::from_seed(ContentSeed::parse(SEED).expect("seed"));

        let settings = repos.load_website_settings().await.expect("settings");
        assert_eq!(settings.home_page.as_deref(), Some("Home"));

        let footer = repos
            .list_top_bar_items(TopBarField::Footer)
            .await
            .expect("footer");
        let labels: Vec<_> = footer.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, ["Terms", "Privacy"]);

        let post = repos
            .load_record(RecordKind::BlogPost, "POST-1")
            .await
            .expect("load")
            .expect("post");
        assert!(!post.is_visible());
    }

    #[tokio::test]
    async fn hidden_records_do_not_resolve() {
        let repos = MemoryRepositories::from_seed(ContentSeed::parse(SEED).expect("seed"));

        let draft = repos
            .find_visible_by_slug(RecordKind::BlogPost, "draft")
            .await
            .expect("query");
        assert!(draft.is_none());

        let widget = repos
            .find_visible_by_slug(RecordKind::ProductItem, "widget")
            .await
            .expect("query");
        assert_eq!(widget.as_deref(), Some("ITEM-1"));
    }

    #[tokio::test]
    async fn slug_in_use_ignores_the_record_itself() {
        let repos = MemoryRepositories::from_seed(ContentSeed::parse(SEED).expect("seed"));

        assert!(
            !repos
                .slug_in_use(RecordKind::WebPage, "welcome", "Home")
                .await
                .expect("query")
        );
        assert!(
            repos
                .slug_in_use(RecordKind::WebPage, "welcome", "Other")
                .await
                .expect("query")
        );
        assert!(
            !repos
                .slug_in_use(RecordKind::BlogPost, "welcome", "Other")
                .await
                .expect("query")
        );
    }

    #[tokio::test]
    async fn update_title_of_unknown_record_fails() {
        let repos = MemoryRepositories::new();
        let err = repos
            .update_title(RecordKind::WebPage, "ghost", "Boo", "boo")
            .await
            .expect_err("missing");
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn update_title_stores_title_and_slug() {
        let repos = MemoryRepositories::from_seed(ContentSeed::parse(SEED).expect("seed"));

        repos
            .update_title(RecordKind::ProductItem, "ITEM-1", "Gadget Pro", "gadget-pro")
            .await
            .expect("update");

        let Some(ContentRecord::ProductItem(item)) =
            repos.record(RecordKind::ProductItem, "ITEM-1").await
        else {
            panic!("product missing");
        };
        assert_eq!(item.item_name, "Gadget Pro");
        assert_eq!(item.slug, "gadget-pro");
    }

    #[tokio::test]
    async fn update_title_rejects_slug_held_by_sibling() {
        let repos = MemoryRepositories::from_seed(ContentSeed::parse(SEED).expect("seed"));
        repos
            .upsert_record(ContentRecord::WebPage(WebPage {
                name: "About".to_string(),
                title: "About".to_string(),
                slug: "about".to_string(),
                published: true,
                main_section: String::new(),
                description: None,
            }))
            .await;

        let err = repos
            .update_title(RecordKind::WebPage, "About", "Welcome", "welcome")
            .await
            .expect_err("slug taken");
        assert!(matches!(
            err,
            RepoError::Duplicate { ref constraint } if constraint == "web_pages_slug_key"
        ));

        let about = repos
            .record(RecordKind::WebPage, "About")
            .await
            .expect("record");
        assert_eq!(about.slug(), "about");
    }

    #[test]
    fn malformed_seed_is_reported() {
        let err = ContentSeed::parse("[[web_pages]]\nname = 1").expect_err("invalid");
        assert!(matches!(err, InfraError::Seed { .. }));
    }
}
