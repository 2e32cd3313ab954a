//! `PageRepo` over SQLite: static content pages addressed by slug.

use async_trait::async_trait;
use bozor_core::error::Result;
use bozor_core::models::Page;
use bozor_core::traits::PageRepo;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::{blob_to_uuid, db_err, uuid_to_blob, SqliteMarketRepo};

fn row_to_page(row: &SqliteRow) -> Page {
    Page {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        content: row.get("content"),
        slug: Some(row.get("slug")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl PageRepo for SqliteMarketRepo {
    async fn create_page(&self, page: Page) -> Result<Page> {
        let mut page = page;
        page.validate()?;
        page.updated_at = Utc::now();

        sqlx::query(
            "INSERT INTO pages (id, content, slug, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(page.id))
        .bind(&page.content)
        .bind(page.slug.as_deref())
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("insert page", e))?;

        tracing::debug!(slug = ?page.slug, "page created");
        Ok(page)
    }

    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        let row = sqlx::query("SELECT * FROM pages WHERE slug = ?")
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get page", e))?;
        Ok(row.as_ref().map(row_to_page))
    }
}
