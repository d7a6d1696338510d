//! Plain-text rendering of directory view models.
//!
//! Every function returns a `String` so output can be asserted in tests and
//! printed as-is by the command runner.

use unicode_width::UnicodeWidthStr;

use crate::core::categories::{CITY_CENTER, category_icon, distance_km, within_map_frame};
use crate::core::i18n::{Text, tr};
use crate::core::models::{BusinessWithTranslation, CategoryWithName, Language};
use crate::core::validation::{
    DEFAULT_IMAGE_DOMAINS, is_valid_coordinates, is_valid_http_url, is_valid_image_url,
    is_valid_tel_url,
};

/// Column width used for wrapped descriptions.
pub const TEXT_WIDTH: usize = 72;

/// Pads `s` with spaces to `width` terminal columns.
fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(w)));
    out
}

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("{title}\n"));
    out.push_str(&format!("{}\n", "─".repeat(UnicodeWidthStr::width(title).max(3))));
}

/// `tel:` link for a phone number, if it is dialable.
pub fn dial_url(phone: &str) -> Option<String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let url = format!("tel:{compact}");
    is_valid_tel_url(&url).then_some(url)
}

/// Google Maps directions link to a coordinate, if the coordinate is valid.
pub fn directions_url(latitude: f64, longitude: f64) -> Option<String> {
    if !is_valid_coordinates(latitude, longitude) {
        return None;
    }
    let url = format!(
        "https://www.google.com/maps/dir/?api=1&destination={latitude},{longitude}"
    );
    is_valid_http_url(&url).then_some(url)
}

pub fn render_categories(categories: &[CategoryWithName], language: Language) -> String {
    let mut out = String::new();
    heading(&mut out, tr(language, Text::Categories));

    let width = categories
        .iter()
        .map(|c| UnicodeWidthStr::width(c.name.as_str()))
        .max()
        .unwrap_or(0);

    for c in categories {
        out.push_str(&format!(
            "{}  {}  {}\n",
            category_icon(&c.category.name_key),
            pad(&c.name, width),
            c.category.id
        ));
    }
    out
}

pub fn render_business_list(
    title: &str,
    businesses: &[BusinessWithTranslation],
    language: Language,
    empty: Text,
) -> String {
    let mut out = String::new();
    heading(&mut out, title);

    if businesses.is_empty() {
        out.push_str(&format!("{}\n", tr(language, empty)));
        return out;
    }

    let width = businesses
        .iter()
        .map(|b| UnicodeWidthStr::width(b.name.as_str()))
        .max()
        .unwrap_or(0);

    for b in businesses {
        out.push_str(&format!("{}  {}", pad(&b.name, width), b.business.id));
        if !b.address.is_empty() {
            out.push_str(&format!("  {}", b.address));
        }
        out.push('\n');
    }
    out
}

pub fn render_business_detail(business: &BusinessWithTranslation, language: Language) -> String {
    let mut out = String::new();
    heading(&mut out, &business.name);

    if let Some(ref category) = business.category_name {
        out.push_str(&format!("{category}\n"));
    }
    if !business.address.is_empty() {
        out.push_str(&format!("{}: {}\n", tr(language, Text::Address), business.address));
    }
    if !business.business.phone.is_empty() {
        out.push_str(&format!("{}: {}\n", tr(language, Text::Phone), business.business.phone));
        if let Some(url) = dial_url(&business.business.phone) {
            out.push_str(&format!("{}: {url}\n", tr(language, Text::Call)));
        }
    }

    if !business.description.is_empty() {
        out.push('\n');
        for line in textwrap::wrap(&business.description, TEXT_WIDTH) {
            out.push_str(&format!("{line}\n"));
        }
        out.push('\n');
    }

    if let Some(url) = directions_url(business.business.latitude, business.business.longitude) {
        out.push_str(&format!("{}: {url}\n", tr(language, Text::Directions)));
    }

    for image in business
        .business
        .images
        .iter()
        .filter(|url| is_valid_image_url(url, DEFAULT_IMAGE_DOMAINS))
    {
        out.push_str(&format!("🖼  {image}\n"));
    }
    out
}

/// Businesses with coordinates, nearest to the city centre first.
///
/// Points outside the default map frame get a compass marker instead of a pin.
pub fn render_map(businesses: &[BusinessWithTranslation], language: Language) -> String {
    let mut located: Vec<(&BusinessWithTranslation, f64)> = businesses
        .iter()
        .filter(|b| is_valid_coordinates(b.business.latitude, b.business.longitude))
        .map(|b| {
            let d = distance_km(CITY_CENTER, (b.business.latitude, b.business.longitude));
            (b, d)
        })
        .collect();
    located.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut out = String::new();
    heading(&mut out, tr(language, Text::Businesses));
    if located.is_empty() {
        out.push_str(&format!("{}\n", tr(language, Text::NoResults)));
        return out;
    }

    let width = located
        .iter()
        .map(|(b, _)| UnicodeWidthStr::width(b.name.as_str()))
        .max()
        .unwrap_or(0);

    for (b, d) in located {
        let marker = if within_map_frame(b.business.latitude, b.business.longitude) {
            "📍"
        } else {
            "🧭"
        };
        out.push_str(&format!(
            "{marker} {}  {:>9.5}, {:>9.5}  {:.1} km {}\n",
            pad(&b.name, width),
            b.business.latitude,
            b.business.longitude,
            d,
            tr(language, Text::DistanceFromCenter)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::merge::{merge_businesses, merge_categories, translate_business};
    use crate::test_support::{
        business, business_translation, category, category_translation, keyed_category,
    };

    #[test]
    fn test_dial_url_strips_spaces() {
        assert_eq!(dial_url("+40 240 511 111").as_deref(), Some("tel:+40240511111"));
        assert_eq!(dial_url("call us"), None);
    }

    #[test]
    fn test_directions_url() {
        assert_eq!(
            directions_url(45.1785, 28.8039).as_deref(),
            Some("https://www.google.com/maps/dir/?api=1&destination=45.1785,28.8039")
        );
        assert_eq!(directions_url(120.0, 0.0), None);
    }

    #[test]
    fn test_categories_render_icons_and_names() {
        let merged = merge_categories(
            vec![category(1), category(3), keyed_category(7, "pharmacies")],
            &[category_translation(3, Language::En, "Restaurants")],
            Language::En,
        );
        let text = render_categories(&merged, Language::En);
        assert!(text.starts_with("Categories\n"));
        assert!(text.contains("✈️  travel_agencies"));
        assert!(text.contains("🍽️  Restaurants"));
        assert!(text.contains("📍  pharmacies"));
    }

    #[test]
    fn test_empty_list_shows_localized_message() {
        let text = render_business_list("Afaceri", &[], Language::Ro, Text::NoBusinesses);
        assert!(text.contains("Nu există afaceri"));
    }

    #[test]
    fn test_list_includes_address() {
        let merged = merge_businesses(
            vec![business(1, 3, true)],
            &[business_translation(1, Language::En, "Old Town Cafe")],
            Language::En,
        );
        let text = render_business_list("Restaurants", &merged, Language::En, Text::NoBusinesses);
        assert!(text.contains("Old Town Cafe"));
        assert!(text.contains("Strada 1"));
    }

    #[test]
    fn test_detail_wraps_description_and_links() {
        let mut t = business_translation(1, Language::En, "Old Town Cafe");
        t.description = "word ".repeat(40);
        let mut view = translate_business(business(1, 3, true), Some(&t));
        view.category_name = Some("Restaurants".to_string());
        view.business.images = vec![
            "https://abc.supabase.co/storage/v1/object/public/a.jpg".to_string(),
            "https://elsewhere.example/b.jpg".to_string(),
        ];

        let text = render_business_detail(&view, Language::En);
        assert!(text.contains("Restaurants\n"));
        assert!(text.contains("Call: tel:+40240511111"));
        assert!(text.contains("Directions: https://www.google.com/maps/dir/?api=1&destination="));
        let description: Vec<&str> = text.lines().filter(|l| l.starts_with("word")).collect();
        assert!(description.len() >= 2);
        assert!(description.iter().all(|l| UnicodeWidthStr::width(*l) <= TEXT_WIDTH));
        assert!(text.contains("a.jpg"));
        assert!(!text.contains("b.jpg"));
    }

    #[test]
    fn test_map_sorts_by_distance() {
        let mut far = business(2, 3, true);
        far.latitude = 45.30;
        let near = business(1, 3, true);
        let merged = merge_businesses(
            vec![far, near],
            &[
                business_translation(1, Language::En, "Near"),
                business_translation(2, Language::En, "Far"),
            ],
            Language::En,
        );
        let text = render_map(&merged, Language::En);
        let near_pos = text.find("Near").unwrap();
        let far_pos = text.find("Far").unwrap();
        assert!(near_pos < far_pos);
        assert!(text.contains("📍 Near"));
        assert!(text.contains("🧭 Far"));
        assert!(text.contains("km from city centre"));
    }
}
