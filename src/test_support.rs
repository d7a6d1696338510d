//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{MemoryStore, Table};
use crate::core::models::{
    Business, BusinessTranslation, Category, CategoryKey, CategoryTranslation, Language,
};

/// Deterministic id for fixture number `n`.
pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Fixture timestamps increase with `n`, so `created_at` order is `n` order.
fn at(n: u128) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(n as i64)
}

/// Categories 1..=4 map onto the four known keys.
pub fn category(n: u128) -> Category {
    let key = match n {
        1 => CategoryKey::TravelAgencies,
        2 => CategoryKey::Accommodation,
        3 => CategoryKey::Restaurants,
        _ => CategoryKey::BankAtms,
    };
    keyed_category(n, key.as_str())
}

/// Category `n` with an arbitrary `name_key`.
pub fn keyed_category(n: u128, name_key: &str) -> Category {
    Category {
        id: id(n),
        name_key: name_key.to_string(),
        icon: name_key.to_string(),
        created_at: at(n),
    }
}

pub fn category_translation(n: u128, language: Language, name: &str) -> CategoryTranslation {
    CategoryTranslation {
        id: id(1000 + n),
        category_id: id(n),
        language,
        name: name.to_string(),
        created_at: at(n),
    }
}

/// Business ids start at 100 to stay clear of category ids.
pub fn business(n: u128, category_n: u128, is_active: bool) -> Business {
    Business {
        id: id(100 + n),
        category_id: id(category_n),
        phone: "+40 240 511 111".to_string(),
        latitude: 45.17 + n as f64 * 0.001,
        longitude: 28.80,
        images: Vec::new(),
        is_active,
        created_at: at(n),
        updated_at: at(n),
    }
}

pub fn business_translation(n: u128, language: Language, name: &str) -> BusinessTranslation {
    BusinessTranslation {
        id: id(2000 + n),
        business_id: id(100 + n),
        language,
        name: name.to_string(),
        description: String::new(),
        address: format!("Strada {n}"),
        created_at: at(n),
    }
}

fn rows<T: serde::Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).unwrap())
        .collect()
}

/// A small directory:
///
/// - categories 1–4, English names for all, Romanian for 1 only
/// - business 1, 2 (restaurants), 3 (restaurants, inactive), 4 (accommodation,
///   no translations), 5 and 6 (restaurants, names for wildcard searches)
pub fn sample_store() -> MemoryStore {
    let categories = [category(1), category(2), category(3), category(4)];
    let category_translations = [
        category_translation(1, Language::En, "Travel Agencies"),
        category_translation(2, Language::En, "Accommodation"),
        category_translation(3, Language::En, "Restaurants"),
        category_translation(4, Language::En, "Banks & ATMs"),
        category_translation(1, Language::Ro, "Agenții de turism"),
    ];
    let businesses = [
        business(2, 3, true),
        business(1, 3, true),
        business(3, 3, false),
        business(4, 2, true),
        business(5, 3, true),
        business(6, 3, true),
    ];
    let business_translations = [
        business_translation(1, Language::En, "Old Town Cafe"),
        business_translation(1, Language::Ro, "Cafeneaua Orașului Vechi"),
        business_translation(2, Language::En, "Danube Fish House"),
        business_translation(3, Language::En, "Closed Cafe"),
        business_translation(5, Language::En, "Pizza 100% off"),
        business_translation(6, Language::En, "1000 offers bistro"),
    ];

    MemoryStore::new()
        .with_rows(Table::Categories, rows(&categories))
        .with_rows(Table::CategoryTranslations, rows(&category_translations))
        .with_rows(Table::Businesses, rows(&businesses))
        .with_rows(Table::BusinessTranslations, rows(&business_translations))
}
