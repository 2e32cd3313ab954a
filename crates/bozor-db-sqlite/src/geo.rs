//! `GeoRepo` over SQLite: countries, cities, districts, and addresses.

use async_trait::async_trait;
use bozor_core::error::Result;
use bozor_core::models::{Address, City, Country, District};
use bozor_core::traits::GeoRepo;
use bozor_core::AppError;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, opt_blob, opt_uuid, uuid_to_blob, SqliteMarketRepo};

fn row_to_country(row: &SqliteRow) -> Country {
    Country {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_city(row: &SqliteRow) -> City {
    City {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_district(row: &SqliteRow) -> District {
    District {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_address(row: &SqliteRow) -> Address {
    Address {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        country_id: opt_uuid(row.get("country_id")),
        city_id: opt_uuid(row.get("city_id")),
        district_id: opt_uuid(row.get("district_id")),
        street: row.get("street"),
        building_number: row.get("building_number"),
        apartment_number: row.get("apartment_number"),
        postal_code: row.get("postal_code"),
        additional_info: row.get("additional_info"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl GeoRepo for SqliteMarketRepo {
    async fn create_country(&self, country: Country) -> Result<Country> {
        let mut country = country;
        country.validate()?;
        country.updated_at = Utc::now();

        sqlx::query("INSERT INTO countries (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(country.id))
            .bind(&country.name)
            .bind(country.created_at)
            .bind(country.updated_at)
            .execute(self.pool())
            .await
            .map_err(|e| db_err("insert country", e))?;

        tracing::debug!(id = %country.id, name = %country.name, "country created");
        Ok(country)
    }

    async fn get_country(&self, id: Uuid) -> Result<Option<Country>> {
        let row = sqlx::query("SELECT * FROM countries WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get country", e))?;
        Ok(row.as_ref().map(row_to_country))
    }

    async fn delete_country(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM countries WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete country", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Country".into(), id.to_string()));
        }
        tracing::debug!(id = %id, "country deleted");
        Ok(())
    }

    async fn create_city(&self, city: City) -> Result<City> {
        let mut city = city;
        city.validate()?;
        city.updated_at = Utc::now();

        sqlx::query("INSERT INTO cities (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(city.id))
            .bind(&city.name)
            .bind(city.created_at)
            .bind(city.updated_at)
            .execute(self.pool())
            .await
            .map_err(|e| db_err("insert city", e))?;

        tracing::debug!(id = %city.id, name = %city.name, "city created");
        Ok(city)
    }

    async fn get_city(&self, id: Uuid) -> Result<Option<City>> {
        let row = sqlx::query("SELECT * FROM cities WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get city", e))?;
        Ok(row.as_ref().map(row_to_city))
    }

    async fn delete_city(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete city", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("City".into(), id.to_string()));
        }
        Ok(())
    }

    async fn create_district(&self, district: District) -> Result<District> {
        let mut district = district;
        district.validate()?;
        district.updated_at = Utc::now();

        sqlx::query("INSERT INTO districts (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(district.id))
            .bind(&district.name)
            .bind(district.created_at)
            .bind(district.updated_at)
            .execute(self.pool())
            .await
            .map_err(|e| db_err("insert district", e))?;

        Ok(district)
    }

    async fn get_district(&self, id: Uuid) -> Result<Option<District>> {
        let row = sqlx::query("SELECT * FROM districts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get district", e))?;
        Ok(row.as_ref().map(row_to_district))
    }

    async fn delete_district(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM districts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete district", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("District".into(), id.to_string()));
        }
        Ok(())
    }

    async fn create_address(&self, address: Address) -> Result<Address> {
        let mut address = address;
        address.validate()?;
        address.updated_at = Utc::now();

        sqlx::query(
            "INSERT INTO addresses (id, country_id, city_id, district_id, street, \
             building_number, apartment_number, postal_code, additional_info, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(address.id))
        .bind(opt_blob(address.country_id))
        .bind(opt_blob(address.city_id))
        .bind(opt_blob(address.district_id))
        .bind(&address.street)
        .bind(&address.building_number)
        .bind(&address.apartment_number)
        .bind(&address.postal_code)
        .bind(&address.additional_info)
        .bind(address.created_at)
        .bind(address.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| db_err("insert address", e))?;

        tracing::debug!(id = %address.id, "address created");
        Ok(address)
    }

    async fn get_address(&self, id: Uuid) -> Result<Option<Address>> {
        let row = sqlx::query("SELECT * FROM addresses WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await
            .map_err(|e| db_err("get address", e))?;
        Ok(row.as_ref().map(row_to_address))
    }

    async fn delete_address(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await
            .map_err(|e| db_err("delete address", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Address".into(), id.to_string()));
        }
        tracing::debug!(id = %id, "address deleted");
        Ok(())
    }
}
