//! Filesystem-backed templates.
//!
//! Templates live under `<site root>/templates`. Record templates are mapped
//! by kind (for example `html/blog_page.html`); every file in
//! `templates/pages` is also a page of its own, addressed by its file name
//! without `.html`.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use minijinja::{Environment, Error as JinjaError, ErrorKind, path_loader};
use tracing::debug;

use crate::application::error::TemplateError;
use crate::application::render::{StaticPageCatalog, TemplateRenderer};
use crate::domain::content::TemplateArgs;
use crate::domain::slug::scrub_page_name;

const TEMPLATES_DIR: &str = "templates";
const STATIC_PAGES_DIR: &str = "pages";

/// Directory holding all templates of a site rooted at `root`.
pub fn templates_dir(root: &Path) -> PathBuf {
    root.join(TEMPLATES_DIR)
}

/// Template renderer backed by MiniJinja with a path loader.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(templates_dir.into()));
        Self { env }
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, args: &TemplateArgs) -> Result<String, TemplateError> {
        let compiled = self
            .env
            .get_template(template)
            .map_err(|err| map_jinja_error(template, &err))?;
        compiled
            .render(args)
            .map_err(|err| map_jinja_error(template, &err))
    }
}

fn map_jinja_error(template: &str, err: &JinjaError) -> TemplateError {
    match err.kind() {
        ErrorKind::TemplateNotFound => TemplateError::NotFound {
            name: err.name().unwrap_or(template).to_string(),
        },
        _ => TemplateError::Render {
            name: template.to_string(),
            message: format!("{err:#}"),
        },
    }
}

/// Static pages found by listing `templates/pages`.
#[derive(Debug, Clone)]
pub struct StaticPageDirectory {
    dir: PathBuf,
}

impl StaticPageDirectory {
    pub fn new(templates_dir: &Path) -> Self {
        Self {
            dir: templates_dir.join(STATIC_PAGES_DIR),
        }
    }
}

#[async_trait]
impl StaticPageCatalog for StaticPageDirectory {
    async fn page_names(&self) -> std::io::Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                debug!(dir = %self.dir.display(), "static pages directory missing");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(file_name) = entry.file_name().to_str() {
                names.push(scrub_page_name(file_name).to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
