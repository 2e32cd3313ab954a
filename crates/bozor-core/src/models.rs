//! # Domain Models
//!
//! These structs represent the core entities of the bozor marketplace.
//! We use UUID v7 for time-ordered, globally unique identification.
//!
//! Validation is explicit and two-phase: callers invoke `validate()` to
//! normalize and reject field values, then hand the record to a repository
//! for persistence. Constructors never validate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::validate::{normalize, slugify, validate_phone_number, NormalizeOpts};

/// Top level of the geographic hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Country {
    pub fn validate(&mut self) -> Result<()> {
        self.name = normalize(&self.name, NormalizeOpts::new().capitalize())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    pub fn validate(&mut self) -> Result<()> {
        self.name = normalize(&self.name, NormalizeOpts::new().capitalize())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl District {
    pub fn validate(&mut self) -> Result<()> {
        self.name = normalize(&self.name, NormalizeOpts::new().capitalize())?;
        Ok(())
    }
}

/// A full postal address. Country/city/district links are nullified when the
/// referenced record is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub country_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub street: String,
    pub building_number: Option<String>,
    pub apartment_number: Option<String>,
    pub postal_code: Option<String>,
    pub additional_info: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    pub fn validate(&mut self) -> Result<()> {
        self.street = normalize(&self.street, NormalizeOpts::new().capitalize().required())?;
        self.additional_info = normalize(
            &self.additional_info,
            NormalizeOpts::new().capitalize().required(),
        )?;
        Ok(())
    }

    /// "Country, City, District" with the resolved names supplied by the caller.
    pub fn short_address(country: &str, city: &str, district: &str) -> String {
        format!("{country}, {city}, {district}")
    }
}

/// Static content page addressed by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub content: String,
    /// Unique; auto-derived from the content prefix when absent.
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How many leading characters of the content feed the auto-derived slug.
const PAGE_SLUG_PREFIX_CHARS: usize = 50;

impl Page {
    pub fn validate(&mut self) -> Result<()> {
        if self.slug.as_deref().is_none_or(|s| s.trim().is_empty()) {
            let prefix: String = self.content.chars().take(PAGE_SLUG_PREFIX_CHARS).collect();
            self.slug = Some(slugify(&prefix));
        }
        Ok(())
    }
}

/// Top-level product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Denormalized ad counter; maintained by the caller, not by triggers.
    pub ads_count: i64,
    /// Icon upload path, see [`crate::paths::category_icon_path`].
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn validate(&mut self) -> Result<()> {
        self.name = normalize(&self.name, NormalizeOpts::new().capitalize().required())?;
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ads_count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: Uuid,
    pub name: String,
    /// Nullified when the parent category is deleted.
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubCategory {
    pub fn validate(&mut self) -> Result<()> {
        self.name = normalize(&self.name, NormalizeOpts::new().capitalize().required())?;
        Ok(())
    }
}

/// A classified listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// ISO 4217 code, exactly 3 characters.
    pub currency: String,
    /// Unique; auto-derived from the name when absent.
    pub slug: Option<String>,
    pub sub_category_id: Option<Uuid>,
    pub address_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ad {
    pub fn validate(&mut self) -> Result<()> {
        self.name = normalize(&self.name, NormalizeOpts::new().capitalize().required())?;
        self.description =
            normalize(&self.description, NormalizeOpts::new().capitalize().required())?;
        if self.currency.chars().count() != 3 {
            return Err(AppError::ValidationError(
                "The currency code must be exactly 3 characters.".to_string(),
            ));
        }
        if self.slug.as_deref().is_none_or(|s| s.trim().is_empty()) {
            self.slug = Some(Self::derive_slug(&self.name, &self.slug_suffix()));
        }
        Ok(())
    }

    /// `<slugified-name>-<suffix>`. The suffix keeps slugs unique per record;
    /// we draw it from the ad id so no counter coordination is needed.
    pub fn derive_slug(name: &str, suffix: &str) -> String {
        format!("{}-{}", slugify(name), suffix)
    }

    fn slug_suffix(&self) -> String {
        let hex = self.id.simple().to_string();
        hex[hex.len() - 8..].to_string()
    }
}

/// Moderation lifecycle state of an ad. Transitions are driven by external
/// moderation/expiry processes; this layer only stores the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdStatus {
    #[default]
    InModeration,
    Rejected,
    Active,
    Expired,
}

impl AdStatus {
    /// Column value, matching the serde snake_case form.
    pub fn as_str(self) -> &'static str {
        match self {
            AdStatus::InModeration => "in_moderation",
            AdStatus::Rejected => "rejected",
            AdStatus::Active => "active",
            AdStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_moderation" => Some(AdStatus::InModeration),
            "rejected" => Some(AdStatus::Rejected),
            "active" => Some(AdStatus::Active),
            "expired" => Some(AdStatus::Expired),
            _ => None,
        }
    }
}

/// One-to-one moderation sidecar of an [`Ad`]; cascades with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdExtraInfo {
    pub id: Uuid,
    pub ad_id: Uuid,
    pub status: AdStatus,
    pub expires_at: DateTime<Utc>,
}

/// Photo attached to an ad; cascades with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub ad_id: Uuid,
    /// Upload path, see [`crate::paths::ad_photo_path`].
    pub photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A marketplace account. Uniqueness of username/email/phone is enforced by
/// the storage layer; normalization here makes it case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    /// Avatar upload path, see [`crate::paths::avatar_path`].
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn validate(&mut self) -> Result<()> {
        self.first_name = normalize(&self.first_name, NormalizeOpts::new().title())?;
        self.last_name = normalize(&self.last_name, NormalizeOpts::new().title())?;
        self.phone_number =
            normalize(&self.phone_number, NormalizeOpts::new().unique().required())?;
        self.email = normalize(&self.email, NormalizeOpts::new().unique().required())?;
        self.username = normalize(&self.username, NormalizeOpts::new().unique().required())?;
        validate_phone_number(&self.phone_number)?;
        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {}, {} | {}",
            self.username, self.email, self.phone_number
        )
    }
}

/// Seller profile, strictly owned by a [`User`] (cascades with it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: Uuid,
    pub user_id: Uuid,
    pub patronymic: Option<String>,
    pub project_name: String,
    /// Nullified when the category is deleted.
    pub category_id: Option<Uuid>,
    /// Nullified when the address is deleted.
    pub address_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Seller {
    pub fn validate(&mut self) -> Result<()> {
        if let Some(patronymic) = &self.patronymic {
            self.patronymic = Some(normalize(patronymic, NormalizeOpts::new().title())?);
        }
        self.project_name = normalize(&self.project_name, NormalizeOpts::new().required())?;
        Ok(())
    }

    /// "First Last Patronymic" with the owning user's names.
    pub fn full_name(&self, user: &User) -> String {
        match &self.patronymic {
            Some(p) => format!("{} {} {}", user.first_name, user.last_name, p),
            None => format!("{} {}", user.first_name, user.last_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn sample_user() -> User {
        User {
            id: Uuid::now_v7(),
            username: "  JDoe ".into(),
            email: " JDoe@Example.COM ".into(),
            phone_number: "+998912345678".into(),
            first_name: "john".into(),
            last_name: "doe".into(),
            avatar: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn country_name_is_trimmed_and_capitalized() {
        let mut country = Country {
            id: Uuid::now_v7(),
            name: "  uzbekistan ".into(),
            created_at: now(),
            updated_at: now(),
        };
        country.validate().unwrap();
        assert_eq!(country.name, "Uzbekistan");
    }

    #[test]
    fn address_requires_street_and_additional_info() {
        let mut address = Address {
            id: Uuid::now_v7(),
            country_id: None,
            city_id: None,
            district_id: None,
            street: "  amir temur street ".into(),
            building_number: Some("12".into()),
            apartment_number: None,
            postal_code: Some("100000".into()),
            additional_info: "   ".into(),
            created_at: now(),
            updated_at: now(),
        };
        assert!(matches!(
            address.validate(),
            Err(AppError::ValidationError(_))
        ));
        address.additional_info = "second floor".into();
        address.validate().unwrap();
        assert_eq!(address.street, "Amir temur street");
        assert_eq!(address.additional_info, "Second floor");
    }

    #[test]
    fn page_slug_derives_from_content_prefix() {
        let content = "Hello World this is a long test string that keeps going well past fifty";
        let mut page = Page {
            id: Uuid::now_v7(),
            content: content.into(),
            slug: None,
            created_at: now(),
            updated_at: now(),
        };
        page.validate().unwrap();
        let prefix: String = content.chars().take(50).collect();
        assert_eq!(page.slug.as_deref(), Some(slugify(&prefix).as_str()));
    }

    #[test]
    fn page_keeps_explicit_slug() {
        let mut page = Page {
            id: Uuid::now_v7(),
            content: "whatever".into(),
            slug: Some("about-us".into()),
            created_at: now(),
            updated_at: now(),
        };
        page.validate().unwrap();
        assert_eq!(page.slug.as_deref(), Some("about-us"));
    }

    fn sample_ad() -> Ad {
        Ad {
            id: Uuid::now_v7(),
            name: "used bicycle".into(),
            description: "barely ridden".into(),
            price: 120.0,
            currency: "USD".into(),
            slug: None,
            sub_category_id: None,
            address_id: None,
            seller_id: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn ad_slug_is_name_plus_suffix() {
        assert_eq!(Ad::derive_slug("Used Bicycle", "77"), "used-bicycle-77");

        let mut ad = sample_ad();
        ad.validate().unwrap();
        let slug = ad.slug.unwrap();
        assert!(slug.starts_with("used-bicycle-"), "{slug}");
        // Suffix comes from the ad id, so two ads with the same name differ.
        let mut other = sample_ad();
        other.validate().unwrap();
        assert_ne!(Some(&slug), other.slug.as_ref());
    }

    #[test]
    fn ad_currency_must_be_three_chars() {
        let mut ad = sample_ad();
        ad.currency = "US".into();
        assert!(matches!(ad.validate(), Err(AppError::ValidationError(_))));
        ad.currency = "UZS".into();
        ad.validate().unwrap();
        assert_eq!(ad.name, "Used bicycle");
        assert_eq!(ad.description, "Barely ridden");
    }

    #[test]
    fn user_identity_fields_are_lowercased_and_names_title_cased() {
        let mut user = sample_user();
        user.validate().unwrap();
        assert_eq!(user.username, "jdoe");
        assert_eq!(user.email, "jdoe@example.com");
        assert_eq!(user.first_name, "John");
        assert_eq!(user.last_name, "Doe");
    }

    #[test]
    fn user_rejects_bad_phone_after_normalization() {
        let mut user = sample_user();
        user.phone_number = "+1234567890".into();
        assert!(matches!(user.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn ad_status_round_trips_column_values() {
        for status in [
            AdStatus::InModeration,
            AdStatus::Rejected,
            AdStatus::Active,
            AdStatus::Expired,
        ] {
            assert_eq!(AdStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AdStatus::default(), AdStatus::InModeration);
        assert_eq!(AdStatus::parse("unknown"), None);
    }

    #[test]
    fn seller_requires_project_name() {
        let user = sample_user();
        let mut seller = Seller {
            id: Uuid::now_v7(),
            user_id: user.id,
            patronymic: Some("petrovich".into()),
            project_name: " ".into(),
            category_id: None,
            address_id: None,
            created_at: now(),
            updated_at: now(),
        };
        assert!(matches!(seller.validate(), Err(AppError::ValidationError(_))));
        seller.project_name = "Bike Corner".into();
        seller.validate().unwrap();
        assert_eq!(seller.patronymic.as_deref(), Some("Petrovich"));
        assert_eq!(seller.full_name(&user), "john doe Petrovich");
    }
}
