//! `CatalogRepo` over SQLite: categories and subcategories.

use async_trait::async_trait;
use bozor_core::error::Result;
use bozor_core::models::{Category, SubCategory};
use bozor_core::traits::CatalogRepo;
use bozor_core::AppError;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, opt_blob, opt_uuid, uuid_to_blob, SqliteMarketRepo};

fn row_to_category(row: &SqliteRow) -> Category {
    Category {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        ads_count: row.get("ads_count"),
        icon: row.get("icon"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_sub_category(row: &SqliteRow) -> SubCategory {
    SubCategory {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        category_id: opt_uuid(row.get("category_id")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl CatalogRepo for SqliteMarketRepo {
    async fn create_category(&self, category: Category) -> Result<Category> {
        let mut category = category;
        category.validate()?;
        category.updated_at = Utc::now();

        sqlx::query(
            "INSERT INTO categories (id, name, ads_count, icon, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(category.id))
        .bind(&category.name)
        .bind(category.ads_count)
        .bind(&category.icon)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("insert category", e))?;

        tracing::debug!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get category", e))?;
        Ok(row.as_ref().map(row_to_category))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(self.pool())
            .await
            .map_err(|e| db_err("list categories", e))?;
        Ok(rows.iter().map(row_to_category).collect())
    }

    async fn delete_category(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete category", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".into(), id.to_string()));
        }
        tracing::debug!(id = %id, "category deleted");
        Ok(())
    }

    async fn create_sub_category(&self, sub_category: SubCategory) -> Result<SubCategory> {
        let mut sub_category = sub_category;
        sub_category.validate()?;
        sub_category.updated_at = Utc::now();

        sqlx::query(
            "INSERT INTO sub_categories (id, name, category_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(sub_category.id))
        .bind(&sub_category.name)
        .bind(opt_blob(sub_category.category_id))
        .bind(sub_category.created_at)
        .bind(sub_category.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("insert sub category", e))?;

        Ok(sub_category)
    }

    async fn get_sub_category(&self, id: Uuid) -> Result<Option<SubCategory>> {
        let row = sqlx::query("SELECT * FROM sub_categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get sub category", e))?;
        Ok(row.as_ref().map(row_to_sub_category))
    }

    async fn list_sub_categories(&self, category_id: Uuid) -> Result<Vec<SubCategory>> {
        let rows = sqlx::query("SELECT * FROM sub_categories WHERE category_id = ? ORDER BY name ASC")
            .bind(uuid_to_blob(category_id))
            .fetch_all(self.pool())
            .await
            .map_err(|e| db_err("list sub categories", e))?;
        Ok(rows.iter().map(row_to_sub_category).collect())
    }

    async fn delete_sub_category(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM sub_categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete sub category", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("SubCategory".into(), id.to_string()));
        }
        Ok(())
    }
}
