//! # bozor-db-sqlite Implementation
//!
//! This crate implements the data mapping between the SQLite relational model
//! and the `bozor-core` domain models. Every write path validates the record
//! first (validate -> persist), and delete policies are enforced by the
//! schema: `ON DELETE CASCADE` for strictly-owned children (photos, ad extra
//! info, seller profiles), `ON DELETE SET NULL` for loose references.

use bozor_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use uuid::Uuid;

mod ads;
mod catalog;
mod geo;
mod pages;
mod users;

/// Embedded schema, applied on connect. Uniqueness of page slugs, ad slugs,
/// and user identity fields is enforced here, not in process.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS countries (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cities (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS districts (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS addresses (
    id               BLOB PRIMARY KEY,
    country_id       BLOB UNIQUE REFERENCES countries(id) ON DELETE SET NULL,
    city_id          BLOB UNIQUE REFERENCES cities(id) ON DELETE SET NULL,
    district_id      BLOB UNIQUE REFERENCES districts(id) ON DELETE SET NULL,
    street           TEXT NOT NULL,
    building_number  TEXT,
    apartment_number TEXT,
    postal_code      TEXT,
    additional_info  TEXT NOT NULL,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pages (
    id          BLOB PRIMARY KEY,
    content     TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL,
    ads_count   INTEGER NOT NULL DEFAULT 0,
    icon        TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sub_categories (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL,
    category_id BLOB REFERENCES categories(id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id           BLOB PRIMARY KEY,
    username     TEXT NOT NULL UNIQUE,
    email        TEXT NOT NULL UNIQUE,
    phone_number TEXT NOT NULL UNIQUE,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    avatar       TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sellers (
    id           BLOB PRIMARY KEY,
    user_id      BLOB NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    patronymic   TEXT,
    project_name TEXT NOT NULL,
    category_id  BLOB REFERENCES categories(id) ON DELETE SET NULL,
    address_id   BLOB REFERENCES addresses(id) ON DELETE SET NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ads (
    id              BLOB PRIMARY KEY,
    name            TEXT NOT NULL,
    description     TEXT NOT NULL,
    price           REAL NOT NULL,
    currency        TEXT NOT NULL,
    slug            TEXT NOT NULL UNIQUE,
    sub_category_id BLOB REFERENCES sub_categories(id) ON DELETE SET NULL,
    address_id      BLOB REFERENCES addresses(id) ON DELETE SET NULL,
    seller_id       BLOB REFERENCES sellers(id) ON DELETE SET NULL,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ad_extra_infos (
    id         BLOB PRIMARY KEY,
    ad_id      BLOB NOT NULL UNIQUE REFERENCES ads(id) ON DELETE CASCADE,
    status     TEXT NOT NULL DEFAULT 'in_moderation',
    expires_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS photos (
    id         BLOB PRIMARY KEY,
    ad_id      BLOB NOT NULL REFERENCES ads(id) ON DELETE CASCADE,
    photo      TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

pub struct SqliteMarketRepo {
    pool: SqlitePool,
}

// Helpers for UUID conversion
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

pub(crate) fn opt_blob(id: Option<Uuid>) -> Option<Vec<u8>> {
    id.map(uuid_to_blob)
}

pub(crate) fn opt_uuid(blob: Option<Vec<u8>>) -> Option<Uuid> {
    blob.map(|b| blob_to_uuid(&b))
}

/// Maps storage failures onto `AppError`: unique-constraint violations become
/// `Conflict`, everything else `Internal`.
pub(crate) fn db_err(what: &str, e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{what}: {}", db.message()))
        }
        _ => AppError::Internal(format!("{what}: {e}")),
    }
}

impl SqliteMarketRepo {
    /// Connects and applies the embedded schema.
    ///
    /// Foreign keys are switched on per connection; SQLite ships with them
    /// off, and the cascade/nullify policies depend on them.
    pub async fn new(url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Internal(format!("bad database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database exists per connection; a larger pool would
        // hand each caller a different empty database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await
            .map_err(|e| db_err("connect", e))?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| db_err("apply schema", e))?;

        tracing::debug!(url, "sqlite schema ready");
        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests;
