use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::error::SlugAssignError;
use crate::application::repos::{ContentRepo, RepoError};
use crate::cache::PageCache;
use crate::domain::content::RecordKind;
use crate::domain::error::DomainError;
use crate::domain::slug::derive_slug;

/// Assigns title-derived slugs, unique within a record kind.
#[derive(Clone)]
pub struct SlugService {
    content: Arc<dyn ContentRepo>,
    cache: PageCache,
}

impl SlugService {
    pub fn new(content: Arc<dyn ContentRepo>, cache: PageCache) -> Self {
        Self { content, cache }
    }

    /// Store `title` on the record `name` together with the slug derived from it.
    ///
    /// Fails without touching the record when another record of the same
    /// kind already carries the slug, including one that claims it while this
    /// call is in flight. The cached pages under both the old and
    /// the new slug are dropped.
    #[instrument(skip(self))]
    pub async fn assign_and_validate(
        &self,
        kind: RecordKind,
        name: &str,
        title: &str,
    ) -> Result<String, SlugAssignError> {
        let slug = derive_slug(title);
        if slug.is_empty() {
            return Err(DomainError::validation(format!(
                "title `{title}` does not produce a usable slug"
            ))
            .into());
        }

        let record = self
            .content
            .load_record(kind, name)
            .await?
            .ok_or_else(|| DomainError::missing(kind.label(), name))?;

        let duplicate = || SlugAssignError::Duplicate {
            kind,
            name: name.to_string(),
        };

        if self.content.slug_in_use(kind, &slug, name).await? {
            return Err(duplicate());
        }

        match self.content.update_title(kind, name, title, &slug).await {
            Ok(()) => {}
            Err(RepoError::Duplicate { .. }) => return Err(duplicate()),
            Err(err) => return Err(err.into()),
        }

        let previous = record.slug();
        if !previous.is_empty() && previous != slug {
            self.cache.invalidate(previous);
        }
        self.cache.invalidate(&slug);

        info!(%kind, name, title, %slug, "title and slug saved");
        Ok(slug)
    }
}
