#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pagewright::application::frame::{DEFAULT_BRAND, SiteFrameService};
use pagewright::application::render::{PageComposer, TemplateMap};
use pagewright::application::site::SiteRenderer;
use pagewright::application::slugs::SlugService;
use pagewright::cache::{CacheConfig, MemoryCacheStore, PageCache};
use pagewright::domain::content::{BlogPost, ContentRecord, ProductItem, WebPage};
use pagewright::infra::memory::MemoryRepositories;
use pagewright::infra::templates::{MiniJinjaRenderer, StaticPageDirectory};
use tempfile::TempDir;

pub const WEB_PAGE_TEMPLATE: &str = "<b>{{ brand }}</b><nav>{% for item in top_bar_items %}[{{ item.label }}{% for child in item.child_items %}/{{ child.label }}{% endfor %}]{% endfor %}</nav><h1>{{ title }}</h1>{{ main_section|safe }}";
pub const BLOG_TEMPLATE: &str = "<h1>{{ title }}</h1><p>{{ author_display }}|{{ published_display }}</p>";
pub const PRODUCT_TEMPLATE: &str = "<h1>{{ item_name }}</h1><p>{{ formatted_price }}</p>";

pub struct FixtureOptions {
    pub auto_cache_clear: bool,
    pub page_limit: usize,
    pub templates: TemplateMap,
    pub with_not_found_page: bool,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            auto_cache_clear: false,
            page_limit: 100,
            templates: TemplateMap::default(),
            with_not_found_page: true,
        }
    }
}

pub struct SiteFixture {
    pub dir: TempDir,
    pub repos: Arc<MemoryRepositories>,
    pub store: Arc<MemoryCacheStore>,
    pub cache: PageCache,
    pub renderer: SiteRenderer,
    pub slugs: SlugService,
}

pub fn write_template(root: &Path, name: &str, body: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create template dir");
    }
    fs::write(path, body).expect("write template");
}

pub fn site(options: FixtureOptions) -> SiteFixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let templates = dir.path().to_path_buf();

    write_template(&templates, "html/web_page.html", WEB_PAGE_TEMPLATE);
    write_template(&templates, "html/blog_page.html", BLOG_TEMPLATE);
    write_template(&templates, "html/product_page.html", PRODUCT_TEMPLATE);
    write_template(&templates, "pages/login.html", "<h1>Login</h1>");
    write_template(
        &templates,
        "pages/about-us.html",
        "<h1>About static {{ name }}</h1>",
    );
    if options.with_not_found_page {
        write_template(&templates, "pages/404.html", "<h1>Not Found</h1>");
    }

    let repos = Arc::new(MemoryRepositories::new());
    let composer = PageComposer::new(
        repos.clone(),
        repos.clone(),
        SiteFrameService::new(repos.clone(), DEFAULT_BRAND),
        Arc::new(StaticPageDirectory::new(&templates)),
        Arc::new(MiniJinjaRenderer::new(templates.clone())),
        options.templates,
    );

    let config = CacheConfig {
        auto_cache_clear: options.auto_cache_clear,
        page_limit: options.page_limit,
    };
    let store = Arc::new(MemoryCacheStore::new(&config));
    let cache = PageCache::new(store.clone(), config);

    SiteFixture {
        renderer: SiteRenderer::new(composer, cache.clone()),
        slugs: SlugService::new(repos.clone(), cache.clone()),
        dir,
        repos,
        store,
        cache,
    }
}

pub fn web_page(name: &str, title: &str, slug: &str) -> ContentRecord {
    ContentRecord::WebPage(WebPage {
        name: name.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        published: true,
        main_section: format!("<p>{name} body</p>"),
        description: None,
    })
}

pub fn blog_post(name: &str, title: &str, slug: &str, published: bool) -> ContentRecord {
    ContentRecord::BlogPost(BlogPost {
        name: name.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        published,
        content: String::new(),
        author: None,
        published_on: None,
    })
}

pub fn product(name: &str, item_name: &str, slug: &str) -> ContentRecord {
    ContentRecord::ProductItem(ProductItem {
        name: name.to_string(),
        item_name: item_name.to_string(),
        slug: slug.to_string(),
        show_in_website: true,
        description: String::new(),
        price: Some(12.5),
        currency: Some("USD".to_string()),
        image: None,
    })
}
