use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::content::{RESOLUTION_ORDER, RecordKind};

/// Identity of the record a slug resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub kind: RecordKind,
    pub name: String,
}

#[derive(Clone)]
pub struct PageResolver {
    content: Arc<dyn ContentRepo>,
}

impl PageResolver {
    pub fn new(content: Arc<dyn ContentRepo>) -> Self {
        Self { content }
    }

    /// Find the first visible record carrying `slug`, searching kinds in
    /// [`RESOLUTION_ORDER`]. A slug shared across kinds resolves to the
    /// earliest kind.
    #[instrument(skip(self))]
    pub async fn resolve(&self, slug: &str) -> Result<Option<ResolvedRecord>, RepoError> {
        for kind in RESOLUTION_ORDER {
            if let Some(name) = self.content.find_visible_by_slug(kind, slug).await? {
                debug!(%kind, %name, "slug resolved");
                return Ok(Some(ResolvedRecord { kind, name }));
            }
        }

        debug!("slug did not resolve");
        Ok(None)
    }
}
