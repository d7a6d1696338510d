//! Localized interface text.
//!
//! Content (business and category names) comes translated from the backend;
//! this table only covers the CLI's own labels and messages. Missing entries
//! fall back to English.

use super::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Categories,
    Businesses,
    NoBusinesses,
    NoResults,
    SearchTooShort,
    BusinessNotFound,
    LoadFailed,
    RetryHint,
    Phone,
    Address,
    Call,
    Directions,
    DistanceFromCenter,
    CurrentLanguage,
    LanguageChanged,
}

pub fn tr(language: Language, text: Text) -> &'static str {
    localized(language, text).unwrap_or_else(|| english(text))
}

fn english(text: Text) -> &'static str {
    match text {
        Text::Categories => "Categories",
        Text::Businesses => "Businesses",
        Text::NoBusinesses => "No businesses found in this category.",
        Text::NoResults => "No results.",
        Text::SearchTooShort => "Type at least 2 characters to search.",
        Text::BusinessNotFound => "Business not found",
        Text::LoadFailed => "Failed to load data. Please try again.",
        Text::RetryHint => "Run the command again to retry.",
        Text::Phone => "Phone",
        Text::Address => "Address",
        Text::Call => "Call",
        Text::Directions => "Directions",
        Text::DistanceFromCenter => "from city centre",
        Text::CurrentLanguage => "Current language",
        Text::LanguageChanged => "Language changed to",
    }
}

fn localized(language: Language, text: Text) -> Option<&'static str> {
    let s = match (language, text) {
        (Language::En, _) => return None,

        (Language::Ro, Text::Categories) => "Categorii",
        (Language::Ro, Text::Businesses) => "Afaceri",
        (Language::Ro, Text::NoBusinesses) => "Nu există afaceri în această categorie.",
        (Language::Ro, Text::NoResults) => "Niciun rezultat.",
        (Language::Ro, Text::SearchTooShort) => "Introduceți cel puțin 2 caractere.",
        (Language::Ro, Text::BusinessNotFound) => "Afacerea nu a fost găsită",
        (Language::Ro, Text::LoadFailed) => "Datele nu au putut fi încărcate. Încercați din nou.",
        (Language::Ro, Text::RetryHint) => "Rulați din nou comanda pentru a reîncerca.",
        (Language::Ro, Text::Phone) => "Telefon",
        (Language::Ro, Text::Address) => "Adresă",
        (Language::Ro, Text::Call) => "Sună",
        (Language::Ro, Text::Directions) => "Indicații",
        (Language::Ro, Text::DistanceFromCenter) => "de centrul orașului",
        (Language::Ro, Text::CurrentLanguage) => "Limba curentă",
        (Language::Ro, Text::LanguageChanged) => "Limba a fost schimbată în",

        (Language::Fr, Text::Categories) => "Catégories",
        (Language::Fr, Text::Businesses) => "Établissements",
        (Language::Fr, Text::NoBusinesses) => "Aucun établissement dans cette catégorie.",
        (Language::Fr, Text::NoResults) => "Aucun résultat.",
        (Language::Fr, Text::SearchTooShort) => "Saisissez au moins 2 caractères.",
        (Language::Fr, Text::BusinessNotFound) => "Établissement introuvable",
        (Language::Fr, Text::LoadFailed) => "Échec du chargement. Veuillez réessayer.",
        (Language::Fr, Text::RetryHint) => "Relancez la commande pour réessayer.",
        (Language::Fr, Text::Phone) => "Téléphone",
        (Language::Fr, Text::Address) => "Adresse",
        (Language::Fr, Text::Call) => "Appeler",
        (Language::Fr, Text::Directions) => "Itinéraire",
        (Language::Fr, Text::DistanceFromCenter) => "du centre-ville",
        (Language::Fr, Text::CurrentLanguage) => "Langue actuelle",
        (Language::Fr, Text::LanguageChanged) => "Langue changée en",

        (Language::De, Text::Categories) => "Kategorien",
        (Language::De, Text::Businesses) => "Unternehmen",
        (Language::De, Text::NoBusinesses) => "Keine Unternehmen in dieser Kategorie.",
        (Language::De, Text::NoResults) => "Keine Ergebnisse.",
        (Language::De, Text::SearchTooShort) => "Bitte mindestens 2 Zeichen eingeben.",
        (Language::De, Text::BusinessNotFound) => "Unternehmen nicht gefunden",
        (Language::De, Text::LoadFailed) => "Laden fehlgeschlagen. Bitte erneut versuchen.",
        (Language::De, Text::RetryHint) => "Befehl erneut ausführen, um es nochmal zu versuchen.",
        (Language::De, Text::Phone) => "Telefon",
        (Language::De, Text::Address) => "Adresse",
        (Language::De, Text::Call) => "Anrufen",
        (Language::De, Text::Directions) => "Route",
        (Language::De, Text::DistanceFromCenter) => "vom Stadtzentrum",
        (Language::De, Text::CurrentLanguage) => "Aktuelle Sprache",
        (Language::De, Text::LanguageChanged) => "Sprache geändert zu",
    };
    Some(s)
}
