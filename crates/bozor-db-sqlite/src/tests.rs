use bozor_core::models::*;
use bozor_core::traits::{AdRepo, CatalogRepo, GeoRepo, PageRepo, UserRepo};
use bozor_core::AppError;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::SqliteMarketRepo;

async fn repo() -> SqliteMarketRepo {
    SqliteMarketRepo::new("sqlite::memory:")
        .await
        .expect("in-memory repo")
}

fn country(name: &str) -> Country {
    Country {
        id: Uuid::now_v7(),
        name: name.into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn address(country_id: Option<Uuid>) -> Address {
    Address {
        id: Uuid::now_v7(),
        country_id,
        city_id: None,
        district_id: None,
        street: "amir temur street".into(),
        building_number: Some("12".into()),
        apartment_number: None,
        postal_code: Some("100000".into()),
        additional_info: "entrance from the courtyard".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn category(name: &str) -> Category {
    Category {
        id: Uuid::now_v7(),
        name: name.into(),
        ads_count: 0,
        icon: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sub_category(name: &str, category_id: Option<Uuid>) -> SubCategory {
    SubCategory {
        id: Uuid::now_v7(),
        name: name.into(),
        category_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn user(username: &str, email: &str, phone: &str) -> User {
    User {
        id: Uuid::now_v7(),
        username: username.into(),
        email: email.into(),
        phone_number: phone.into(),
        first_name: "aziz".into(),
        last_name: "karimov".into(),
        avatar: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn seller(user_id: Uuid, category_id: Option<Uuid>) -> Seller {
    Seller {
        id: Uuid::now_v7(),
        user_id,
        patronymic: None,
        project_name: "Bike Corner".into(),
        category_id,
        address_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn ad(name: &str, sub_category_id: Option<Uuid>, seller_id: Option<Uuid>) -> Ad {
    Ad {
        id: Uuid::now_v7(),
        name: name.into(),
        description: "good condition".into(),
        price: 120.0,
        currency: "USD".into(),
        slug: None,
        sub_category_id,
        address_id: None,
        seller_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn extra_info(ad_id: Uuid) -> AdExtraInfo {
    AdExtraInfo {
        id: Uuid::now_v7(),
        ad_id,
        status: AdStatus::default(),
        expires_at: Utc::now() + Duration::days(30),
    }
}

#[tokio::test]
async fn country_roundtrip_normalizes_name() {
    let repo = repo().await;
    let created = repo.create_country(country("  uzbekistan ")).await.unwrap();
    assert_eq!(created.name, "Uzbekistan");

    let fetched = repo.get_country(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Uzbekistan");
    assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn deleting_country_nullifies_address_reference() {
    let repo = repo().await;
    let c = repo.create_country(country("uzbekistan")).await.unwrap();
    let a = repo.create_address(address(Some(c.id))).await.unwrap();
    assert_eq!(a.country_id, Some(c.id));

    repo.delete_country(c.id).await.unwrap();

    let a = repo.get_address(a.id).await.unwrap().unwrap();
    assert_eq!(a.country_id, None);
    assert_eq!(a.street, "Amir temur street");
}

#[tokio::test]
async fn delete_missing_country_is_not_found() {
    let repo = repo().await;
    let err = repo.delete_country(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_, _)));
}

#[tokio::test]
async fn deleting_category_nullifies_sub_categories_and_sellers() {
    let repo = repo().await;
    let cat = repo.create_category(category("vehicles")).await.unwrap();
    let sub = repo
        .create_sub_category(sub_category("bicycles", Some(cat.id)))
        .await
        .unwrap();
    let u = repo
        .create_user(user("jdoe", "jdoe@example.com", "+998912345678"))
        .await
        .unwrap();
    let s = repo.create_seller(seller(u.id, Some(cat.id))).await.unwrap();

    repo.delete_category(cat.id).await.unwrap();

    let sub = repo.get_sub_category(sub.id).await.unwrap().unwrap();
    assert_eq!(sub.category_id, None);
    let s = repo.get_seller(s.id).await.unwrap().unwrap();
    assert_eq!(s.category_id, None);
}

#[tokio::test]
async fn list_sub_categories_is_scoped_to_category() {
    let repo = repo().await;
    let cat = repo.create_category(category("vehicles")).await.unwrap();
    let other = repo.create_category(category("electronics")).await.unwrap();
    repo.create_sub_category(sub_category("bicycles", Some(cat.id)))
        .await
        .unwrap();
    repo.create_sub_category(sub_category("cars", Some(cat.id)))
        .await
        .unwrap();
    repo.create_sub_category(sub_category("phones", Some(other.id)))
        .await
        .unwrap();

    let subs = repo.list_sub_categories(cat.id).await.unwrap();
    let names: Vec<_> = subs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Bicycles", "Cars"]);
}

#[tokio::test]
async fn ad_create_and_get_with_photos_and_extra_info() {
    let repo = repo().await;
    let cat = repo.create_category(category("vehicles")).await.unwrap();
    let sub = repo
        .create_sub_category(sub_category("bicycles", Some(cat.id)))
        .await
        .unwrap();
    let u = repo
        .create_user(user("jdoe", "jdoe@example.com", "+998912345678"))
        .await
        .unwrap();
    let s = repo.create_seller(seller(u.id, Some(cat.id))).await.unwrap();

    let a = ad("used bicycle", Some(sub.id), Some(s.id));
    let extra = extra_info(a.id);
    let (a, _) = repo.create_ad(a, extra).await.unwrap();
    assert_eq!(a.name, "Used bicycle");
    let slug = a.slug.clone().unwrap();
    assert!(slug.starts_with("used-bicycle-"), "{slug}");

    repo.add_photo(Photo {
        id: Uuid::now_v7(),
        ad_id: a.id,
        photo: bozor_core::paths::ad_photo_path(s.id, "front.jpg"),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    })
    .await
    .unwrap();

    let (fetched, photos, extra) = repo.get_ad(a.id).await.unwrap().unwrap();
    assert_eq!(fetched.slug.as_deref(), Some(slug.as_str()));
    assert_eq!(photos.len(), 1);
    assert_eq!(extra.unwrap().status, AdStatus::InModeration);
}

#[tokio::test]
async fn deleting_ad_cascades_photos_and_extra_info() {
    let repo = repo().await;
    let a = ad("used bicycle", None, None);
    let (a, _) = repo.create_ad(a, extra_info(Uuid::nil())).await.unwrap();
    repo.add_photo(Photo {
        id: Uuid::now_v7(),
        ad_id: a.id,
        photo: "uploads/p.jpg".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    })
    .await
    .unwrap();

    repo.delete_ad(a.id).await.unwrap();
    assert!(repo.get_ad(a.id).await.unwrap().is_none());

    // Cascaded children are gone, so a photo insert now violates the FK.
    let err = repo
        .add_photo(Photo {
            id: Uuid::now_v7(),
            ad_id: a.id,
            photo: "uploads/late.jpg".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}

#[tokio::test]
async fn deleting_seller_nullifies_its_ads() {
    let repo = repo().await;
    let u = repo
        .create_user(user("jdoe", "jdoe@example.com", "+998912345678"))
        .await
        .unwrap();
    let cat = repo.create_category(category("vehicles")).await.unwrap();
    let s = repo.create_seller(seller(u.id, Some(cat.id))).await.unwrap();
    let a = ad("used bicycle", None, Some(s.id));
    let extra = extra_info(a.id);
    let (a, _) = repo.create_ad(a, extra).await.unwrap();

    repo.delete_seller(s.id).await.unwrap();

    let (a, _, _) = repo.get_ad(a.id).await.unwrap().unwrap();
    assert_eq!(a.seller_id, None);
}

#[tokio::test]
async fn deleting_user_cascades_seller_profile() {
    let repo = repo().await;
    let u = repo
        .create_user(user("jdoe", "jdoe@example.com", "+998912345678"))
        .await
        .unwrap();
    let cat = repo.create_category(category("vehicles")).await.unwrap();
    let s = repo.create_seller(seller(u.id, Some(cat.id))).await.unwrap();

    repo.delete_user(u.id).await.unwrap();
    assert!(repo.get_seller(s.id).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_conflicts_even_across_case() {
    let repo = repo().await;
    repo.create_user(user("jdoe", "JDoe@Example.com", "+998912345678"))
        .await
        .unwrap();
    // Different username and phone, same email after lowercasing.
    let err = repo
        .create_user(user("other", "jdoe@example.com", "+79123456789"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn user_lookup_by_username_matches_normalization() {
    let repo = repo().await;
    repo.create_user(user("  JDoe ", "jdoe@example.com", "+998912345678"))
        .await
        .unwrap();
    let found = repo.get_user_by_username("JDOE").await.unwrap().unwrap();
    assert_eq!(found.username, "jdoe");
    assert_eq!(found.first_name, "Aziz");
}

#[tokio::test]
async fn invalid_phone_aborts_user_write() {
    let repo = repo().await;
    let err = repo
        .create_user(user("jdoe", "jdoe@example.com", "+1234567890"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(repo.get_user_by_username("jdoe").await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_currency_aborts_ad_write() {
    let repo = repo().await;
    let mut a = ad("used bicycle", None, None);
    a.currency = "US".into();
    let id = a.id;
    let err = repo.create_ad(a, extra_info(id)).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(repo.get_ad(id).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_extra_info_replaces_status() {
    let repo = repo().await;
    let a = ad("used bicycle", None, None);
    let extra = extra_info(a.id);
    let (a, extra) = repo.create_ad(a, extra).await.unwrap();

    let mut updated = extra;
    updated.status = AdStatus::Active;
    repo.upsert_extra_info(updated).await.unwrap();

    let (_, _, extra) = repo.get_ad(a.id).await.unwrap().unwrap();
    assert_eq!(extra.unwrap().status, AdStatus::Active);
}

#[tokio::test]
async fn list_ads_paginates_by_sub_category() {
    let repo = repo().await;
    let cat = repo.create_category(category("vehicles")).await.unwrap();
    let sub = repo
        .create_sub_category(sub_category("bicycles", Some(cat.id)))
        .await
        .unwrap();
    for i in 0..5 {
        let a = ad(&format!("bike {i}"), Some(sub.id), None);
        repo.create_ad(a, extra_info(Uuid::now_v7())).await.unwrap();
    }

    let first = repo.list_ads_by_sub_category(sub.id, 3, 0).await.unwrap();
    let rest = repo.list_ads_by_sub_category(sub.id, 3, 3).await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(rest.len(), 2);
}

#[tokio::test]
async fn page_slug_is_derived_and_unique() {
    let repo = repo().await;
    let content = "About our marketplace and the people behind it, at length";
    let page = repo
        .create_page(Page {
            id: Uuid::now_v7(),
            content: content.into(),
            slug: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
    let slug = page.slug.clone().unwrap();
    assert!(slug.starts_with("about-our-marketplace"), "{slug}");

    let found = repo.get_page_by_slug(&slug).await.unwrap().unwrap();
    assert_eq!(found.content, content);

    // Same content prefix derives the same slug, which the unique column rejects.
    let err = repo
        .create_page(Page {
            id: Uuid::now_v7(),
            content: content.into(),
            slug: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
