//! # Directory Records
//!
//! Typed rows for the four backend tables, plus the merged view models the
//! directory hands to the presentation layer.
//!
//! ```text
//! Category ─┬─< CategoryTranslation   (one per language)
//!           └─< Business ─< BusinessTranslation (one per language)
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used when a business has no translation in the requested language.
pub const UNNAMED_BUSINESS: &str = "Unnamed Business";

// ============================================================================
// Enums
// ============================================================================

/// Content languages supported by the directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ro,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Ro, Language::Fr, Language::De];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ro => "ro",
            Language::Fr => "fr",
            Language::De => "de",
        }
    }

    /// Native name, as shown in the language picker.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ro => "Română",
            Language::Fr => "Français",
            Language::De => "Deutsch",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::En => "🇬🇧",
            Language::Ro => "🇷🇴",
            Language::Fr => "🇫🇷",
            Language::De => "🇩🇪",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| format!("unsupported language '{s}'"))
    }
}

/// The four known category keys.
///
/// Rows carry `name_key` as free text; keys outside this set still load and
/// are shown with a generic icon and their raw key as name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    TravelAgencies,
    Accommodation,
    Restaurants,
    BankAtms,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 4] = [
        CategoryKey::TravelAgencies,
        CategoryKey::Accommodation,
        CategoryKey::Restaurants,
        CategoryKey::BankAtms,
    ];

    /// Known key for a `name_key` value, if any.
    pub fn from_key(name_key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name_key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::TravelAgencies => "travel_agencies",
            CategoryKey::Accommodation => "accommodation",
            CategoryKey::Restaurants => "restaurants",
            CategoryKey::BankAtms => "bank_atms",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Table Rows
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name_key: String,
    #[serde(default)]
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn key(&self) -> Option<CategoryKey> {
        CategoryKey::from_key(&self.name_key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    pub id: Uuid,
    pub category_id: Uuid,
    pub language: Language,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: Uuid,
    pub category_id: Uuid,
    #[serde(default)]
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessTranslation {
    pub id: Uuid,
    pub business_id: Uuid,
    pub language: Language,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Projection used by the name search (`select=business_id`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TranslationMatch {
    pub business_id: Uuid,
}

// ============================================================================
// View Models (not persisted)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithName {
    #[serde(flatten)]
    pub category: Category,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessWithTranslation {
    #[serde(flatten)]
    pub business: Business,
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}
