use async_trait::async_trait;

use crate::application::repos::{RepoError, WebsiteSettingsRepo};
use crate::domain::frame::{TopBarField, TopBarItemRecord, WebsiteSettingsRecord};

use super::{PostgresRepositories, map_sqlx_error};

const SETTINGS_ROW_ID: i16 = 1;

#[derive(sqlx::FromRow)]
struct WebsiteSettingsRow {
    home_page: Option<String>,
    brand_html: Option<String>,
    copyright: Option<String>,
    favicon: Option<String>,
}

impl From<WebsiteSettingsRow> for WebsiteSettingsRecord {
    fn from(row: WebsiteSettingsRow) -> Self {
        Self {
            home_page: row.home_page,
            brand_html: row.brand_html,
            copyright: row.copyright,
            favicon: row.favicon,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TopBarItemRow {
    field: TopBarField,
    idx: i32,
    label: String,
    url: Option<String>,
    parent_label: Option<String>,
}

impl From<TopBarItemRow> for TopBarItemRecord {
    fn from(row: TopBarItemRow) -> Self {
        Self {
            field: row.field,
            idx: row.idx,
            label: row.label,
            url: row.url,
            parent_label: row.parent_label,
        }
    }
}

#[async_trait]
impl WebsiteSettingsRepo for PostgresRepositories {
    async fn load_website_settings(&self) -> Result<WebsiteSettingsRecord, RepoError> {
        let row = sqlx::query_as::<_, WebsiteSettingsRow>(
            r#"
            SELECT home_page, brand_html, copyright, favicon
            FROM website_settings
            WHERE id = $1
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into).unwrap_or_default())
    }

    async fn list_top_bar_items(
        &self,
        field: TopBarField,
    ) -> Result<Vec<TopBarItemRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TopBarItemRow>(
            r#"
            SELECT field, idx, label, url, parent_label
            FROM top_bar_items
            WHERE field = $1
            ORDER BY idx ASC, id ASC
            "#,
        )
        .bind(field)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
