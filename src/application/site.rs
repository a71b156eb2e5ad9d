//! Top-level page rendering.
//!
//! [`SiteRenderer::render`] always produces a page: anything that goes wrong
//! on the way to the requested page is logged, captured as a trace and served
//! inside the `404` page as an HTML comment.

use std::fmt;
use std::time::Instant;

use axum::http::StatusCode;
use metrics::{counter, histogram};
use tracing::{error, info, instrument, warn};

use crate::application::error::{ErrorReport, PageError};
use crate::application::render::{INDEX_SLUG, NOT_FOUND_SLUG, PageComposer};
use crate::cache::PageCache;
use crate::domain::slug::scrub_page_name;
use crate::presentation::views::render_fallback_page;

pub const METRIC_RENDER_FALLBACK: &str = "pagewright_render_fallback_total";
pub const METRIC_RENDER_MS: &str = "pagewright_render_ms";

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const RENDER_SOURCE: &str = "application::site::SiteRenderer";

/// Where the markup of a page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Cache,
    Fresh,
}

impl LoadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Cache => "cache",
            LoadStatus::Fresh => "fresh",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub content_type: &'static str,
    pub status: StatusCode,
    pub body: String,
}

impl RenderedPage {
    fn found(body: String) -> Self {
        Self {
            content_type: HTML_CONTENT_TYPE,
            status: StatusCode::OK,
            body,
        }
    }

    fn not_found(body: String) -> Self {
        Self {
            content_type: HTML_CONTENT_TYPE,
            status: StatusCode::NOT_FOUND,
            body,
        }
    }
}

#[derive(Clone)]
pub struct SiteRenderer {
    composer: PageComposer,
    cache: PageCache,
}

impl SiteRenderer {
    pub fn new(composer: PageComposer, cache: PageCache) -> Self {
        Self { composer, cache }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Render the page addressed by `slug`. Never fails.
    #[instrument(skip(self))]
    pub async fn render(&self, slug: &str) -> RenderedPage {
        let started = Instant::now();

        let page = match self.render_requested(slug).await {
            Ok(body) => RenderedPage::found(body),
            Err(err) => self.render_not_found(slug, &err).await,
        };

        histogram!(METRIC_RENDER_MS).record(started.elapsed().as_secs_f64() * 1000.0);
        page
    }

    async fn render_requested(&self, slug: &str) -> Result<String, PageError> {
        let page_name = self.composer.resolve_page_name(normalize_slug(slug)).await?;
        let (html, status) = self.get_html(&page_name).await?;
        Ok(append_comment(
            html,
            &format!("page: {page_name}\nload status: {status}"),
        ))
    }

    async fn render_not_found(&self, slug: &str, err: &PageError) -> RenderedPage {
        let trace = ErrorReport::from_error(RENDER_SOURCE, StatusCode::NOT_FOUND, err).trace();
        warn!(slug, error = %trace, "page render failed, serving 404");
        counter!(METRIC_RENDER_FALLBACK).increment(1);

        match self.get_html(NOT_FOUND_SLUG).await {
            Ok((html, _)) => RenderedPage::not_found(append_comment(html, &format!("error: {trace}"))),
            Err(fallback_err) => {
                let fallback_trace = ErrorReport::from_error(
                    RENDER_SOURCE,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &fallback_err,
                )
                .trace();
                error!(slug, error = %fallback_trace, "404 page failed to render");
                RenderedPage::not_found(render_fallback_page(
                    &sanitize_comment(&trace),
                    &sanitize_comment(&fallback_trace),
                ))
            }
        }
    }

    /// Markup for `page_name`, from the cache when present. Fresh renders are
    /// written back to the cache.
    pub async fn get_html(&self, page_name: &str) -> Result<(String, LoadStatus), PageError> {
        if let Some(html) = self.cache.get(page_name) {
            return Ok((html, LoadStatus::Cache));
        }

        let args = self.composer.prepare_args(page_name).await?;
        let html = self.composer.build_html(&args)?;
        self.cache.put(page_name, &html);
        Ok((html, LoadStatus::Fresh))
    }

    /// Drop one cached page, or every cached page when `page_name` is `None`.
    pub fn clear_cache(&self, page_name: Option<&str>) -> usize {
        match page_name.map(scrub_page_name).filter(|name| !name.is_empty()) {
            Some(page_name) => {
                self.cache.invalidate(page_name);
                info!(page_name, "cached page cleared");
                1
            }
            None => {
                let removed = self.cache.invalidate_all();
                info!(removed, "page cache cleared");
                removed
            }
        }
    }
}

/// Empty slugs address the home page; a trailing `.html` is ignored.
pub fn normalize_slug(slug: &str) -> &str {
    let slug = slug.trim_matches('/');
    if slug.is_empty() {
        INDEX_SLUG
    } else {
        scrub_page_name(slug)
    }
}

fn append_comment(mut html: String, text: &str) -> String {
    html.push_str("\n<!-- ");
    html.push_str(&sanitize_comment(text));
    html.push_str(" -->");
    html
}

/// Break up `--` runs so `text` cannot close an HTML comment.
fn sanitize_comment(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut previous = None;
    for ch in text.chars() {
        if ch == '-' && previous == Some('-') {
            sanitized.push(' ');
        }
        sanitized.push(ch);
        previous = Some(ch);
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slug_is_index() {
        assert_eq!(normalize_slug(""), INDEX_SLUG);
        assert_eq!(normalize_slug("/"), INDEX_SLUG);
        assert_eq!(normalize_slug("about-us.html"), "about-us");
        assert_eq!(normalize_slug("/blog/first"), "blog/first");
    }

    #[test]
    fn comment_text_cannot_close_comment() {
        let html = append_comment("<p>x</p>".to_string(), "bad --> input ---");
        assert_eq!(html, "<p>x</p>\n<!-- bad - -> input - - - -->");
        assert_eq!(html.matches("-->").count(), 1);
    }

    #[test]
    fn load_status_labels() {
        assert_eq!(LoadStatus::Cache.to_string(), "cache");
        assert_eq!(LoadStatus::Fresh.to_string(), "fresh");
    }
}
