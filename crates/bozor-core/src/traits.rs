//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to be used by callers.
//! Every create/update operation runs the record's `validate()` before
//! touching storage; a validation failure aborts the whole write.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Ad, AdExtraInfo, Address, Category, City, Country, District, Page, Photo, Seller,
    SubCategory, User,
};

/// Geographic hierarchy and addresses.
///
/// Deleting a country/city/district nullifies the reference on any address
/// that pointed at it.
#[async_trait]
pub trait GeoRepo: Send + Sync {
    async fn create_country(&self, country: Country) -> Result<Country>;
    async fn get_country(&self, id: Uuid) -> Result<Option<Country>>;
    async fn delete_country(&self, id: Uuid) -> Result<()>;

    async fn create_city(&self, city: City) -> Result<City>;
    async fn get_city(&self, id: Uuid) -> Result<Option<City>>;
    async fn delete_city(&self, id: Uuid) -> Result<()>;

    async fn create_district(&self, district: District) -> Result<District>;
    async fn get_district(&self, id: Uuid) -> Result<Option<District>>;
    async fn delete_district(&self, id: Uuid) -> Result<()>;

    async fn create_address(&self, address: Address) -> Result<Address>;
    async fn get_address(&self, id: Uuid) -> Result<Option<Address>>;
    async fn delete_address(&self, id: Uuid) -> Result<()>;
}

/// Categories and subcategories.
///
/// Deleting a category nullifies the reference on its subcategories and
/// sellers; deleting a subcategory nullifies the reference on its ads.
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    async fn create_category(&self, category: Category) -> Result<Category>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn delete_category(&self, id: Uuid) -> Result<()>;

    async fn create_sub_category(&self, sub_category: SubCategory) -> Result<SubCategory>;
    async fn get_sub_category(&self, id: Uuid) -> Result<Option<SubCategory>>;
    async fn list_sub_categories(&self, category_id: Uuid) -> Result<Vec<SubCategory>>;
    async fn delete_sub_category(&self, id: Uuid) -> Result<()>;
}

/// Ads with their photos and moderation sidecar.
///
/// Photos and extra info are strictly owned by the ad and cascade with it.
#[async_trait]
pub trait AdRepo: Send + Sync {
    /// Atomically creates the ad and its moderation sidecar.
    async fn create_ad(&self, ad: Ad, extra: AdExtraInfo) -> Result<(Ad, AdExtraInfo)>;
    async fn update_ad(&self, ad: Ad) -> Result<Ad>;
    async fn get_ad(&self, id: Uuid) -> Result<Option<(Ad, Vec<Photo>, Option<AdExtraInfo>)>>;
    async fn list_ads_by_sub_category(
        &self,
        sub_category_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ad>>;
    async fn delete_ad(&self, id: Uuid) -> Result<()>;

    async fn add_photo(&self, photo: Photo) -> Result<Photo>;
    async fn upsert_extra_info(&self, info: AdExtraInfo) -> Result<AdExtraInfo>;
}

/// Accounts and seller profiles.
///
/// A seller profile cascades with its user; deleting a seller nullifies the
/// reference on its ads.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User>;
    async fn update_user(&self, user: User) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn delete_user(&self, id: Uuid) -> Result<()>;

    async fn create_seller(&self, seller: Seller) -> Result<Seller>;
    async fn get_seller(&self, id: Uuid) -> Result<Option<Seller>>;
    async fn delete_seller(&self, id: Uuid) -> Result<()>;
}

/// Static content pages.
#[async_trait]
pub trait PageRepo: Send + Sync {
    async fn create_page(&self, page: Page) -> Result<Page>;
    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>>;
}
