//! `AdRepo` over SQLite: ads, photos, and the moderation sidecar.

use async_trait::async_trait;
use bozor_core::error::Result;
use bozor_core::models::{Ad, AdExtraInfo, AdStatus, Photo};
use bozor_core::traits::AdRepo;
use bozor_core::AppError;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, opt_blob, opt_uuid, uuid_to_blob, SqliteMarketRepo};

fn row_to_ad(row: &SqliteRow) -> Ad {
    Ad {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        currency: row.get("currency"),
        slug: Some(row.get("slug")),
        sub_category_id: opt_uuid(row.get("sub_category_id")),
        address_id: opt_uuid(row.get("address_id")),
        seller_id: opt_uuid(row.get("seller_id")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_photo(row: &SqliteRow) -> Photo {
    Photo {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        ad_id: blob_to_uuid(row.get::<Vec<u8>, _>("ad_id").as_slice()),
        photo: row.get("photo"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_extra_info(row: &SqliteRow) -> AdExtraInfo {
    AdExtraInfo {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        ad_id: blob_to_uuid(row.get::<Vec<u8>, _>("ad_id").as_slice()),
        status: AdStatus::parse(row.get::<String, _>("status").as_str()).unwrap_or_default(),
        expires_at: row.get("expires_at"),
    }
}

#[async_trait]
impl AdRepo for SqliteMarketRepo {
    /// Atomic operation to create an ad and its moderation sidecar.
    ///
    /// A transaction keeps us from ending up with ads that have no extra
    /// info row if the second insert fails.
    async fn create_ad(&self, ad: Ad, extra: AdExtraInfo) -> Result<(Ad, AdExtraInfo)> {
        let mut ad = ad;
        ad.validate()?;
        ad.updated_at = Utc::now();
        let mut extra = extra;
        extra.ad_id = ad.id;

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| db_err("begin create ad", e))?;

        sqlx::query(
            "INSERT INTO ads (id, name, description, price, currency, slug, \
             sub_category_id, address_id, seller_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(ad.id))
        .bind(&ad.name)
        .bind(&ad.description)
        .bind(ad.price)
        .bind(&ad.currency)
        .bind(ad.slug.as_deref())
        .bind(opt_blob(ad.sub_category_id))
        .bind(opt_blob(ad.address_id))
        .bind(opt_blob(ad.seller_id))
        .bind(ad.created_at)
        .bind(ad.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("insert ad", e))?;

        sqlx::query(
            "INSERT INTO ad_extra_infos (id, ad_id, status, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(extra.id))
        .bind(uuid_to_blob(extra.ad_id))
        .bind(extra.status.as_str())
        .bind(extra.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("insert ad extra info", e))?;

        tx.commit().await.map_err(|e| db_err("commit create ad", e))?;

        tracing::info!(id = %ad.id, slug = ?ad.slug, "ad created");
        Ok((ad, extra))
    }

    async fn update_ad(&self, ad: Ad) -> Result<Ad> {
        let mut ad = ad;
        ad.validate()?;
        ad.updated_at = Utc::now();

        let result = sqlx::query(
            "UPDATE ads SET name = ?, description = ?, price = ?, currency = ?, slug = ?, \
             sub_category_id = ?, address_id = ?, seller_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&ad.name)
        .bind(&ad.description)
        .bind(ad.price)
        .bind(&ad.currency)
        .bind(ad.slug.as_deref())
        .bind(opt_blob(ad.sub_category_id))
        .bind(opt_blob(ad.address_id))
        .bind(opt_blob(ad.seller_id))
        .bind(ad.updated_at)
        .bind(uuid_to_blob(ad.id))
        .execute(self.pool())
        .await
        .map_err(|e| db_err("update ad", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ad".into(), ad.id.to_string()));
        }
        Ok(ad)
    }

    /// Retrieves an ad with its photos and extra info in one logical read.
    async fn get_ad(&self, id: Uuid) -> Result<Option<(Ad, Vec<Photo>, Option<AdExtraInfo>)>> {
        let ad_row = sqlx::query("SELECT * FROM ads WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get ad", e))?;

        let ad = match ad_row {
            Some(row) => row_to_ad(&row),
            None => return Ok(None),
        };

        let photos = sqlx::query("SELECT * FROM photos WHERE ad_id = ? ORDER BY created_at ASC")
            .bind(uuid_to_blob(id))
            .fetch_all(self.pool())
            .await
            .map_err(|e| db_err("get ad photos", e))?
            .iter()
            .map(row_to_photo)
            .collect();

        let extra = sqlx::query("SELECT * FROM ad_extra_infos WHERE ad_id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get ad extra info", e))?
            .as_ref()
            .map(row_to_extra_info);

        Ok(Some((ad, photos, extra)))
    }

    async fn list_ads_by_sub_category(
        &self,
        sub_category_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ad>> {
        let rows = sqlx::query(
            "SELECT * FROM ads WHERE sub_category_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(uuid_to_blob(sub_category_id))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(|e| db_err("list ads", e))?;
        Ok(rows.iter().map(row_to_ad).collect())
    }

    async fn delete_ad(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM ads WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete ad", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ad".into(), id.to_string()));
        }
        tracing::info!(id = %id, "ad deleted");
        Ok(())
    }

    async fn add_photo(&self, photo: Photo) -> Result<Photo> {
        let mut photo = photo;
        photo.updated_at = Utc::now();

        sqlx::query(
            "INSERT INTO photos (id, ad_id, photo, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(photo.id))
        .bind(uuid_to_blob(photo.ad_id))
        .bind(&photo.photo)
        .bind(photo.created_at)
        .bind(photo.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("insert photo", e))?;

        Ok(photo)
    }

    async fn upsert_extra_info(&self, info: AdExtraInfo) -> Result<AdExtraInfo> {
        sqlx::query(
            "INSERT INTO ad_extra_infos (id, ad_id, status, expires_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(ad_id) DO UPDATE SET status = excluded.status, \
             expires_at = excluded.expires_at",
        )
        .bind(uuid_to_blob(info.id))
        .bind(uuid_to_blob(info.ad_id))
        .bind(info.status.as_str())
        .bind(info.expires_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("upsert ad extra info", e))?;

        tracing::debug!(ad_id = %info.ad_id, status = info.status.as_str(), "extra info upserted");
        Ok(info)
    }
}
