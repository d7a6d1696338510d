//! Category icons and map geometry helpers.

use super::models::CategoryKey;

/// Centre of Tulcea, Romania. The map view is framed around it.
pub const CITY_CENTER: (f64, f64) = (45.1785, 28.8039);

/// Map frame around the centre, in degrees.
pub const MAP_DELTA: (f64, f64) = (0.05, 0.05);

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Icon for categories whose key is not one of the known four.
pub const DEFAULT_CATEGORY_ICON: &str = "📍";

/// Icon shown next to a category, by its `name_key`.
pub fn category_icon(name_key: &str) -> &'static str {
    match CategoryKey::from_key(name_key) {
        Some(CategoryKey::TravelAgencies) => "✈️",
        Some(CategoryKey::Accommodation) => "🏨",
        Some(CategoryKey::Restaurants) => "🍽️",
        Some(CategoryKey::BankAtms) => "🏧",
        None => DEFAULT_CATEGORY_ICON,
    }
}

/// Great-circle distance in kilometres (haversine).
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Whether a point falls inside the default map frame around the city centre.
pub fn within_map_frame(latitude: f64, longitude: f64) -> bool {
    (latitude - CITY_CENTER.0).abs() <= MAP_DELTA.0
        && (longitude - CITY_CENTER.1).abs() <= MAP_DELTA.1
}
