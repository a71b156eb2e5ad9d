use async_trait::async_trait;
use time::Date;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::content::{BlogPost, ContentRecord, ProductItem, RecordKind, WebPage};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct WebPageRow {
    name: String,
    title: String,
    slug: String,
    published: bool,
    main_section: String,
    description: Option<String>,
}

impl From<WebPageRow> for WebPage {
    fn from(row: WebPageRow) -> Self {
        Self {
            name: row.name,
            title: row.title,
            slug: row.slug,
            published: row.published,
            main_section: row.main_section,
            description: row.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BlogPostRow {
    name: String,
    title: String,
    slug: String,
    published: bool,
    content: String,
    author: Option<String>,
    published_on: Option<Date>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        Self {
            name: row.name,
            title: row.title,
            slug: row.slug,
            published: row.published,
            content: row.content,
            author: row.author,
            published_on: row.published_on,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductItemRow {
    name: String,
    item_name: String,
    slug: String,
    show_in_website: bool,
    description: String,
    price: Option<f64>,
    currency: Option<String>,
    image: Option<String>,
}

impl From<ProductItemRow> for ProductItem {
    fn from(row: ProductItemRow) -> Self {
        Self {
            name: row.name,
            item_name: row.item_name,
            slug: row.slug,
            show_in_website: row.show_in_website,
            description: row.description,
            price: row.price,
            currency: row.currency,
            image: row.image,
        }
    }
}

impl PostgresRepositories {
    async fn fetch_record<R>(&self, sql: &str, name: &str) -> Result<Option<R>, RepoError>
    where
        R: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        sqlx::query_as::<_, R>(sql)
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ContentRepo for PostgresRepositories {
    async fn find_visible_by_slug(
        &self,
        kind: RecordKind,
        slug: &str,
    ) -> Result<Option<String>, RepoError> {
        let sql = format!(
            "SELECT name FROM {} WHERE slug = $1 AND {} ORDER BY name LIMIT 1",
            kind.table(),
            kind.visibility_column()
        );
        sqlx::query_scalar::<_, String>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn load_record(
        &self,
        kind: RecordKind,
        name: &str,
    ) -> Result<Option<ContentRecord>, RepoError> {
        let record = match kind {
            RecordKind::WebPage => self
                .fetch_record::<WebPageRow>(
                    "SELECT name, title, slug, published, main_section, description \
                     FROM web_pages WHERE name = $1",
                    name,
                )
                .await?
                .map(|row| ContentRecord::WebPage(row.into())),
            RecordKind::BlogPost => self
                .fetch_record::<BlogPostRow>(
                    "SELECT name, title, slug, published, content, author, published_on \
                     FROM blog_posts WHERE name = $1",
                    name,
                )
                .await?
                .map(|row| ContentRecord::BlogPost(row.into())),
            RecordKind::ProductItem => self
                .fetch_record::<ProductItemRow>(
                    "SELECT name, item_name, slug, show_in_website, description, price, currency, image \
                     FROM product_items WHERE name = $1",
                    name,
                )
                .await?
                .map(|row| ContentRecord::ProductItem(row.into())),
        };
        Ok(record)
    }

    async fn slug_in_use(
        &self,
        kind: RecordKind,
        slug: &str,
        exclude_name: &str,
    ) -> Result<bool, RepoError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE slug = $1 AND name <> $2)",
            kind.table()
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(slug)
            .bind(exclude_name)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_title(
        &self,
        kind: RecordKind,
        name: &str,
        title: &str,
        slug: &str,
    ) -> Result<(), RepoError> {
        let sql = format!(
            "UPDATE {} SET {} = $1, slug = $2 WHERE name = $3",
            kind.table(),
            kind.title_column()
        );
        let result = sqlx::query(&sql)
            .bind(title)
            .bind(slug)
            .bind(name)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
