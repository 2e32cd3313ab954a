//! # Seed Tool
//!
//! Populates a bozor database with a small demo dataset: a geographic
//! hierarchy, a category tree, one seller, and a handful of ads with photos
//! and moderation sidecars. Everything goes through the repository layer, so
//! the same validate-then-persist path a real caller takes is exercised.

use anyhow::Context;
use bozor_core::models::*;
use bozor_core::paths;
use bozor_core::traits::{AdRepo, CatalogRepo, GeoRepo, PageRepo, UserRepo};
use bozor_db_sqlite::SqliteMarketRepo;
use chrono::{Duration, Utc};
use configs::Settings;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::load().context("loading settings")?;
    let repo = SqliteMarketRepo::new(&settings.database.url)
        .await
        .context("connecting database")?;

    tracing::info!(url = %settings.database.url, "seeding demo data");

    let now = Utc::now();

    let country = repo
        .create_country(Country {
            id: Uuid::now_v7(),
            name: "uzbekistan".into(),
            created_at: now,
            updated_at: now,
        })
        .await?;
    let city = repo
        .create_city(City {
            id: Uuid::now_v7(),
            name: "tashkent".into(),
            created_at: now,
            updated_at: now,
        })
        .await?;
    let district = repo
        .create_district(District {
            id: Uuid::now_v7(),
            name: "yunusabad".into(),
            created_at: now,
            updated_at: now,
        })
        .await?;
    let address = repo
        .create_address(Address {
            id: Uuid::now_v7(),
            country_id: Some(country.id),
            city_id: Some(city.id),
            district_id: Some(district.id),
            street: "amir temur avenue".into(),
            building_number: Some("108".into()),
            apartment_number: Some("14".into()),
            postal_code: Some("100084".into()),
            additional_info: "entrance from the courtyard".into(),
            created_at: now,
            updated_at: now,
        })
        .await?;
    tracing::info!(
        address = %Address::short_address(&country.name, &city.name, &district.name),
        "geography ready"
    );

    let category = repo
        .create_category(Category {
            id: Uuid::now_v7(),
            name: "vehicles".into(),
            ads_count: 0,
            icon: None,
            created_at: now,
            updated_at: now,
        })
        .await?;
    let sub_category = repo
        .create_sub_category(SubCategory {
            id: Uuid::now_v7(),
            name: "bicycles".into(),
            category_id: Some(category.id),
            created_at: now,
            updated_at: now,
        })
        .await?;

    let user = repo
        .create_user(User {
            id: Uuid::now_v7(),
            username: "AzizK".into(),
            email: "Aziz.Karimov@example.com".into(),
            phone_number: "+998912345678".into(),
            first_name: "aziz".into(),
            last_name: "karimov".into(),
            avatar: None,
            created_at: now,
            updated_at: now,
        })
        .await?;
    let mut user = user;
    user.avatar = Some(paths::avatar_path(user.id, "avatar.png"));
    let user = repo.update_user(user).await?;

    let seller = repo
        .create_seller(Seller {
            id: Uuid::now_v7(),
            user_id: user.id,
            patronymic: Some("rustamovich".into()),
            project_name: "Bike Corner".into(),
            category_id: Some(category.id),
            address_id: Some(address.id),
            created_at: now,
            updated_at: now,
        })
        .await?;
    tracing::info!(seller = %seller.full_name(&user), "seller ready");

    for i in 0..settings.seed.ads {
        let ad = Ad {
            id: Uuid::now_v7(),
            name: format!("used bicycle {i}"),
            description: "well maintained, single owner".into(),
            price: 120.0 + f64::from(i) * 10.0,
            currency: "UZS".into(),
            slug: None,
            sub_category_id: Some(sub_category.id),
            address_id: Some(address.id),
            seller_id: Some(seller.id),
            created_at: now,
            updated_at: now,
        };
        let extra = AdExtraInfo {
            id: Uuid::now_v7(),
            ad_id: ad.id,
            status: AdStatus::default(),
            expires_at: now + Duration::days(30),
        };
        let (ad, _) = repo.create_ad(ad, extra).await?;
        repo.add_photo(Photo {
            id: Uuid::now_v7(),
            ad_id: ad.id,
            photo: paths::ad_photo_path(seller.id, &format!("bike_{i}.jpg")),
            created_at: now,
            updated_at: now,
        })
        .await?;
        tracing::info!(slug = ?ad.slug, "ad seeded");
    }

    repo.create_page(Page {
        id: Uuid::now_v7(),
        content: "Welcome to bozor, the neighborhood marketplace. Buy and sell locally.".into(),
        slug: None,
        created_at: now,
        updated_at: now,
    })
    .await?;

    tracing::info!("seed complete");
    Ok(())
}
