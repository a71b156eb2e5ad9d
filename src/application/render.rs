//! Page argument preparation and template rendering.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::application::error::{PageError, TemplateError};
use crate::application::frame::SiteFrameService;
use crate::application::repos::{ContentRepo, WebsiteSettingsRepo};
use crate::application::resolver::PageResolver;
use crate::domain::content::{RESOLUTION_ORDER, RecordKind, TemplateArgs};
use crate::domain::error::DomainError;

/// Slug that stands for the configured home page.
pub const INDEX_SLUG: &str = "index";
/// Page served as the home page when none is configured.
pub const LOGIN_SLUG: &str = "login";
/// Static page rendered when anything on the normal path fails.
pub const NOT_FOUND_SLUG: &str = "404";

const STATIC_PAGES_DIR: &str = "pages";

/// Renders a named template against prepared arguments.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, args: &TemplateArgs) -> Result<String, TemplateError>;
}

/// Lists the page names served straight from static templates.
#[async_trait]
pub trait StaticPageCatalog: Send + Sync {
    async fn page_names(&self) -> std::io::Result<Vec<String>>;
}

/// Template path of the static page `name`.
pub fn static_page_template(name: &str) -> String {
    format!("{STATIC_PAGES_DIR}/{name}.html")
}

/// Template used for each record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMap {
    templates: HashMap<RecordKind, String>,
}

impl TemplateMap {
    pub fn new(templates: HashMap<RecordKind, String>) -> Self {
        Self { templates }
    }

    pub fn template_for(&self, kind: RecordKind) -> Result<&str, PageError> {
        self.templates
            .get(&kind)
            .map(String::as_str)
            .ok_or(PageError::UnmappedTemplate { kind })
    }

    pub fn insert(&mut self, kind: RecordKind, template: impl Into<String>) {
        self.templates.insert(kind, template.into());
    }

    pub fn without(mut self, kind: RecordKind) -> Self {
        self.templates.remove(&kind);
        self
    }
}

impl Default for TemplateMap {
    fn default() -> Self {
        let templates = RESOLUTION_ORDER
            .into_iter()
            .map(|kind| {
                let path = match kind {
                    RecordKind::WebPage => "html/web_page.html",
                    RecordKind::BlogPost => "html/blog_page.html",
                    RecordKind::ProductItem => "html/product_page.html",
                };
                (kind, path.to_string())
            })
            .collect();
        Self { templates }
    }
}

/// Collaborators needed to turn a slug into markup.
#[derive(Clone)]
pub struct PageComposer {
    resolver: PageResolver,
    content: Arc<dyn ContentRepo>,
    settings: Arc<dyn WebsiteSettingsRepo>,
    frame: SiteFrameService,
    static_pages: Arc<dyn StaticPageCatalog>,
    renderer: Arc<dyn TemplateRenderer>,
    templates: TemplateMap,
}

impl PageComposer {
    pub fn new(
        content: Arc<dyn ContentRepo>,
        settings: Arc<dyn WebsiteSettingsRepo>,
        frame: SiteFrameService,
        static_pages: Arc<dyn StaticPageCatalog>,
        renderer: Arc<dyn TemplateRenderer>,
        templates: TemplateMap,
    ) -> Self {
        Self {
            resolver: PageResolver::new(Arc::clone(&content)),
            content,
            settings,
            frame,
            static_pages,
            renderer,
            templates,
        }
    }

    /// Map `index` to the home page slug; other names pass through.
    pub async fn resolve_page_name(&self, page_name: &str) -> Result<String, PageError> {
        if page_name != INDEX_SLUG {
            return Ok(page_name.to_string());
        }

        let settings = self.settings.load_website_settings().await?;
        let home_page = settings
            .home_page
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let Some(home_page) = home_page else {
            return Ok(LOGIN_SLUG.to_string());
        };

        let record = self
            .content
            .load_record(RecordKind::WebPage, &home_page)
            .await?
            .filter(|record| !record.slug().is_empty())
            .ok_or_else(|| DomainError::missing("home page", home_page.clone()))?;

        debug!(%home_page, slug = record.slug(), "index resolved to home page");
        Ok(record.slug().to_string())
    }

    /// Collect the template and its variables for `page_name`.
    #[instrument(skip(self))]
    pub async fn prepare_args(&self, page_name: &str) -> Result<TemplateArgs, PageError> {
        let page_name = self.resolve_page_name(page_name).await?;

        let static_pages = self
            .static_pages
            .page_names()
            .await
            .map_err(PageError::StaticPages)?;

        let mut args = if static_pages.iter().any(|name| *name == page_name) {
            let mut args = TemplateArgs::new();
            args.set_template(static_page_template(&page_name));
            args.insert("name", page_name.clone());
            args
        } else {
            self.record_args(&page_name).await?
        };

        self.frame.merge_into(&mut args).await?;
        Ok(args)
    }

    async fn record_args(&self, slug: &str) -> Result<TemplateArgs, PageError> {
        let resolved = self
            .resolver
            .resolve(slug)
            .await?
            .ok_or_else(|| PageError::not_found(slug))?;

        let record = self
            .content
            .load_record(resolved.kind, &resolved.name)
            .await?
            .ok_or_else(|| PageError::not_found(slug))?;

        let mut args = record.template_args()?;
        args.set_template(self.templates.template_for(resolved.kind)?);
        Ok(args)
    }

    /// Render the template named by `args`.
    pub fn build_html(&self, args: &TemplateArgs) -> Result<String, PageError> {
        let template = args.template().ok_or(PageError::MissingTemplate)?;
        Ok(self.renderer.render(template, args)?)
    }
}
