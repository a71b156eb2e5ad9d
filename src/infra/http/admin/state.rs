use std::sync::Arc;

use crate::application::{site::SiteRenderer, slugs::SlugService};
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct AdminState {
    pub renderer: Arc<SiteRenderer>,
    pub slugs: Arc<SlugService>,
    /// Present when content is served from Postgres.
    pub db: Option<Arc<PostgresRepositories>>,
}
