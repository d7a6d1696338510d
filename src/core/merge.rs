//! # Translation Merge
//!
//! Left-joins base records with their translation rows for one language.
//!
//! ```text
//! for each base row:
//!     t = first translation where t.subject == row.id && t.language == L
//!     view = row + (t.name | default, t.description | "", t.address | "")
//! ```
//!
//! Duplicate translations for the same (record, language) pair are resolved by
//! store order: the first one wins.

use uuid::Uuid;

use super::models::{
    Business, BusinessTranslation, BusinessWithTranslation, Category, CategoryTranslation,
    CategoryWithName, Language, UNNAMED_BUSINESS,
};

/// A row that localizes some base record.
pub trait Translation {
    /// Id of the base record this row translates.
    fn subject_id(&self) -> Uuid;
    fn language(&self) -> Language;
}

impl Translation for CategoryTranslation {
    fn subject_id(&self) -> Uuid {
        self.category_id
    }

    fn language(&self) -> Language {
        self.language
    }
}

impl Translation for BusinessTranslation {
    fn subject_id(&self) -> Uuid {
        self.business_id
    }

    fn language(&self) -> Language {
        self.language
    }
}

/// First translation of `subject` in `language`.
pub fn find_translation<T: Translation>(
    translations: &[T],
    subject: Uuid,
    language: Language,
) -> Option<&T> {
    translations
        .iter()
        .find(|t| t.subject_id() == subject && t.language() == language)
}

/// Empty translated text counts as missing.
fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Applies an optional translation row to a business.
pub fn translate_business(
    business: Business,
    translation: Option<&BusinessTranslation>,
) -> BusinessWithTranslation {
    BusinessWithTranslation {
        name: or_default(translation.map(|t| t.name.as_str()), UNNAMED_BUSINESS),
        description: or_default(translation.map(|t| t.description.as_str()), ""),
        address: or_default(translation.map(|t| t.address.as_str()), ""),
        category_name: None,
        business,
    }
}

pub fn merge_businesses(
    businesses: Vec<Business>,
    translations: &[BusinessTranslation],
    language: Language,
) -> Vec<BusinessWithTranslation> {
    businesses
        .into_iter()
        .map(|business| {
            let translation = find_translation(translations, business.id, language);
            translate_business(business, translation)
        })
        .collect()
}

/// Missing translations fall back to the category's raw key.
pub fn merge_categories(
    categories: Vec<Category>,
    translations: &[CategoryTranslation],
    language: Language,
) -> Vec<CategoryWithName> {
    categories
        .into_iter()
        .map(|category| {
            let name = or_default(
                find_translation(translations, category.id, language).map(|t| t.name.as_str()),
                category.name_key.as_str(),
            );
            CategoryWithName { category, name }
        })
        .collect()
}
