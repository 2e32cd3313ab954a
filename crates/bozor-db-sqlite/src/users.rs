//! `UserRepo` over SQLite: accounts and seller profiles.

use async_trait::async_trait;
use bozor_core::error::Result;
use bozor_core::models::{Seller, User};
use bozor_core::traits::UserRepo;
use bozor_core::AppError;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, opt_blob, opt_uuid, uuid_to_blob, SqliteMarketRepo};

fn row_to_user(row: &SqliteRow) -> User {
    User {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        username: row.get("username"),
        email: row.get("email"),
        phone_number: row.get("phone_number"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        avatar: row.get("avatar"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_seller(row: &SqliteRow) -> Seller {
    Seller {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        user_id: blob_to_uuid(row.get::<Vec<u8>, _>("user_id").as_slice()),
        patronymic: row.get("patronymic"),
        project_name: row.get("project_name"),
        category_id: opt_uuid(row.get("category_id")),
        address_id: opt_uuid(row.get("address_id")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl UserRepo for SqliteMarketRepo {
    async fn create_user(&self, user: User) -> Result<User> {
        let mut user = user;
        user.validate()?;
        user.updated_at = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, email, phone_number, first_name, last_name, \
             avatar, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(user.id))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.avatar)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("insert user", e))?;

        tracing::info!(id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User> {
        let mut user = user;
        user.validate()?;
        user.updated_at = Utc::now();

        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, phone_number = ?, first_name = ?, \
             last_name = ?, avatar = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.avatar)
        .bind(user.updated_at)
        .bind(uuid_to_blob(user.id))
        .execute(self.pool())
        .await
        .map_err(|e| db_err("update user", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".into(), user.id.to_string()));
        }
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get user", e))?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        // Usernames are stored lowercased; match the normalization here.
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username.trim().to_lowercase())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get user by username", e))?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete user", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".into(), id.to_string()));
        }
        tracing::info!(id = %id, "user deleted");
        Ok(())
    }

    async fn create_seller(&self, seller: Seller) -> Result<Seller> {
        let mut seller = seller;
        seller.validate()?;
        seller.updated_at = Utc::now();

        sqlx::query(
            "INSERT INTO sellers (id, user_id, patronymic, project_name, category_id, \
             address_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(seller.id))
        .bind(uuid_to_blob(seller.user_id))
        .bind(&seller.patronymic)
        .bind(&seller.project_name)
        .bind(opt_blob(seller.category_id))
        .bind(opt_blob(seller.address_id))
        .bind(seller.created_at)
        .bind(seller.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("insert seller", e))?;

        tracing::info!(id = %seller.id, project = %seller.project_name, "seller created");
        Ok(seller)
    }

    async fn get_seller(&self, id: Uuid) -> Result<Option<Seller>> {
        let row = sqlx::query("SELECT * FROM sellers WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get seller", e))?;
        Ok(row.as_ref().map(row_to_seller))
    }

    async fn delete_seller(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM sellers WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete seller", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Seller".into(), id.to_string()));
        }
        Ok(())
    }
}
