//! Content records that can be rendered as website pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{Date, macros::format_description};

use super::error::DomainError;

/// The kinds of records a slug can resolve to, in resolution priority order.
pub const RESOLUTION_ORDER: [RecordKind; 3] = [
    RecordKind::WebPage,
    RecordKind::BlogPost,
    RecordKind::ProductItem,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    WebPage,
    BlogPost,
    ProductItem,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::WebPage => "web_page",
            RecordKind::BlogPost => "blog_post",
            RecordKind::ProductItem => "product_item",
        }
    }

    /// Human-facing name used in user messages.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::WebPage => "Web Page",
            RecordKind::BlogPost => "Blog Post",
            RecordKind::ProductItem => "Product Item",
        }
    }

    /// Backing table for the Postgres repositories.
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::WebPage => "web_pages",
            RecordKind::BlogPost => "blog_posts",
            RecordKind::ProductItem => "product_items",
        }
    }

    /// Column holding the record's display title.
    pub fn title_column(self) -> &'static str {
        match self {
            RecordKind::WebPage | RecordKind::BlogPost => "title",
            RecordKind::ProductItem => "item_name",
        }
    }

    /// Column that marks a record as visible on the website.
    pub fn visibility_column(self) -> &'static str {
        match self {
            RecordKind::WebPage | RecordKind::BlogPost => "published",
            RecordKind::ProductItem => "show_in_website",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "web_page" => Ok(RecordKind::WebPage),
            "blog_post" => Ok(RecordKind::BlogPost),
            "product_item" => Ok(RecordKind::ProductItem),
            other => Err(DomainError::validation(format!(
                "unknown record kind `{other}`"
            ))),
        }
    }
}

/// Ordered mapping of template variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateArgs(Map<String, Value>);

impl TemplateArgs {
    pub const TEMPLATE_KEY: &'static str = "template";

    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Serialize a record into its fields. Non-object values are rejected.
    pub fn from_fields<T: Serialize>(fields: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(fields)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(serde::ser::Error::custom(format!(
                "expected an object of fields, got `{other}`"
            ))),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn template(&self) -> Option<&str> {
        self.get_str(Self::TEMPLATE_KEY)
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.insert(Self::TEMPLATE_KEY, template.into());
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn extend(&mut self, other: TemplateArgs) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-kind hook run after a record's fields are serialized and before the
/// template is rendered.
pub trait TemplateArgsHook {
    fn prepare_template_args(&self, _args: &mut TemplateArgs) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebPage {
    pub name: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub main_section: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TemplateArgsHook for WebPage {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub name: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_on: Option<Date>,
}

impl TemplateArgsHook for BlogPost {
    fn prepare_template_args(&self, args: &mut TemplateArgs) {
        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .unwrap_or("Anonymous");
        args.insert("author_display", author);

        let display = self
            .published_on
            .and_then(|date| {
                date.format(format_description!(
                    "[month repr:long] [day padding:none], [year]"
                ))
                .ok()
            })
            .unwrap_or_default();
        args.insert("published_display", display);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    pub name: String,
    pub item_name: String,
    pub slug: String,
    #[serde(default)]
    pub show_in_website: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl TemplateArgsHook for ProductItem {
    fn prepare_template_args(&self, args: &mut TemplateArgs) {
        if let Some(price) = self.price {
            let formatted = match self.currency.as_deref() {
                Some(currency) if !currency.is_empty() => format!("{currency} {price:.2}"),
                _ => format!("{price:.2}"),
            };
            args.insert("formatted_price", formatted);
        }
    }
}

/// A persisted record of one of the renderable kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRecord {
    WebPage(WebPage),
    BlogPost(BlogPost),
    ProductItem(ProductItem),
}

impl ContentRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            ContentRecord::WebPage(_) => RecordKind::WebPage,
            ContentRecord::BlogPost(_) => RecordKind::BlogPost,
            ContentRecord::ProductItem(_) => RecordKind::ProductItem,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ContentRecord::WebPage(page) => &page.name,
            ContentRecord::BlogPost(post) => &post.name,
            ContentRecord::ProductItem(item) => &item.name,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            ContentRecord::WebPage(page) => &page.slug,
            ContentRecord::BlogPost(post) => &post.slug,
            ContentRecord::ProductItem(item) => &item.slug,
        }
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        let slug = slug.into();
        match self {
            ContentRecord::WebPage(page) => page.slug = slug,
            ContentRecord::BlogPost(post) => post.slug = slug,
            ContentRecord::ProductItem(item) => item.slug = slug,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        match self {
            ContentRecord::WebPage(page) => page.title = title,
            ContentRecord::BlogPost(post) => post.title = title,
            ContentRecord::ProductItem(item) => item.item_name = title,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            ContentRecord::WebPage(page) => page.published,
            ContentRecord::BlogPost(post) => post.published,
            ContentRecord::ProductItem(item) => item.show_in_website,
        }
    }

    /// Serialize the record's fields and run its template hook.
    pub fn template_args(&self) -> Result<TemplateArgs, serde_json::Error> {
        let mut args = match self {
            ContentRecord::WebPage(page) => TemplateArgs::from_fields(page)?,
            ContentRecord::BlogPost(post) => TemplateArgs::from_fields(post)?,
            ContentRecord::ProductItem(item) => TemplateArgs::from_fields(item)?,
        };
        self.hook().prepare_template_args(&mut args);
        Ok(args)
    }

    fn hook(&self) -> &dyn TemplateArgsHook {
        match self {
            ContentRecord::WebPage(page) => page,
            ContentRecord::BlogPost(post) => post,
            ContentRecord::ProductItem(item) => item,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn post(author: Option<&str>, published_on: Option<Date>) -> BlogPost {
        BlogPost {
            name: "POST-0001".to_string(),
            title: "Release Notes".to_string(),
            slug: "release-notes".to_string(),
            published: true,
            content: "<p>Shipped.</p>".to_string(),
            author: author.map(str::to_string),
            published_on,
        }
    }

    #[test]
    fn record_kind_round_trips_through_str() {
        for kind in RESOLUTION_ORDER {
            assert_eq!(kind.as_str().parse::<RecordKind>().expect("kind"), kind);
        }
        assert!("page".parse::<RecordKind>().is_err());
    }

    #[test]
    fn resolution_order_prefers_web_pages() {
        assert_eq!(RESOLUTION_ORDER[0], RecordKind::WebPage);
        assert_eq!(RESOLUTION_ORDER[2], RecordKind::ProductItem);
    }

    #[test]
    fn web_page_args_are_plain_fields() {
        let record = ContentRecord::WebPage(WebPage {
            name: "About".to_string(),
            title: "About Us".to_string(),
            slug: "about-us".to_string(),
            published: true,
            main_section: "<p>Hi</p>".to_string(),
            description: None,
        });

        let args = record.template_args().expect("args");
        assert_eq!(args.get_str("slug"), Some("about-us"));
        assert_eq!(args.get_str("main_section"), Some("<p>Hi</p>"));
        assert!(args.template().is_none());
    }

    #[test]
    fn blog_post_hook_formats_date_and_author() {
        let record = ContentRecord::BlogPost(post(Some("Ada"), Some(date!(2024 - 01 - 05))));
        let args = record.template_args().expect("args");

        assert_eq!(args.get_str("published_display"), Some("January 5, 2024"));
        assert_eq!(args.get_str("author_display"), Some("Ada"));
    }

    #[test]
    fn blog_post_hook_defaults_missing_values() {
        let record = ContentRecord::BlogPost(post(Some("  "), None));
        let args = record.template_args().expect("args");

        assert_eq!(args.get_str("published_display"), Some(""));
        assert_eq!(args.get_str("author_display"), Some("Anonymous"));
    }

    #[test]
    fn product_hook_formats_price() {
        let mut item = ProductItem {
            name: "ITEM-7".to_string(),
            item_name: "Widget".to_string(),
            slug: "widget".to_string(),
            show_in_website: true,
            description: String::new(),
            price: Some(12.5),
            currency: Some("USD".to_string()),
            image: None,
        };

        let args = ContentRecord::ProductItem(item.clone())
            .template_args()
            .expect("args");
        assert_eq!(args.get_str("formatted_price"), Some("USD 12.50"));

        item.price = None;
        let args = ContentRecord::ProductItem(item).template_args().expect("args");
        assert!(args.get("formatted_price").is_none());
    }

    #[test]
    fn set_slug_updates_variant() {
        let mut record = ContentRecord::BlogPost(post(None, None));
        record.set_slug("new-slug");
        assert_eq!(record.slug(), "new-slug");
        assert_eq!(record.kind(), RecordKind::BlogPost);
    }

    #[test]
    fn set_title_writes_item_name_for_products() {
        let mut record = ContentRecord::ProductItem(ProductItem {
            name: "ITEM-1".to_string(),
            item_name: "Widget".to_string(),
            slug: "widget".to_string(),
            show_in_website: true,
            description: String::new(),
            price: None,
            currency: None,
            image: None,
        });
        record.set_title("Gadget");

        let ContentRecord::ProductItem(item) = record else {
            panic!("variant changed");
        };
        assert_eq!(item.item_name, "Gadget");
        assert_eq!(RecordKind::ProductItem.title_column(), "item_name");
    }

    #[test]
    fn template_args_extend_overrides_keys() {
        let mut base = TemplateArgs::new();
        base.insert("brand", "old");
        base.insert("title", "Kept");

        let mut frame = TemplateArgs::new();
        frame.insert("brand", "new");

        base.extend(frame);
        assert_eq!(base.get_str("brand"), Some("new"));
        assert_eq!(base.get_str("title"), Some("Kept"));
        assert_eq!(base.len(), 2);
    }
}
