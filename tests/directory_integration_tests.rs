use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tulcea_guide::backend::{MemoryStore, PostgrestStore, StoreError, Table};
use tulcea_guide::cli::{Command, execute};
use tulcea_guide::core::models::Language;
use tulcea_guide::directory::{Directory, DirectoryError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

const CATEGORY_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
const BUSINESS_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
const OTHER_BUSINESS_ID: &str = "550e8400-e29b-41d4-a716-446655440001";

fn directory(server: &MockServer) -> Directory {
    directory_with_timeout(server, Duration::from_secs(5))
}

fn directory_with_timeout(server: &MockServer, timeout: Duration) -> Directory {
    let store = PostgrestStore::new(&server.uri(), "anon-key".to_string()).unwrap();
    Directory::with_timeout(Arc::new(store), timeout)
}

fn business_row(id: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "category_id": CATEGORY_ID,
        "phone": "+40 240 511 111",
        "latitude": 45.1785,
        "longitude": 28.8039,
        "images": [],
        "is_active": is_active,
        "created_at": "2024-01-01T10:00:00+00:00",
        "updated_at": "2024-01-01T10:00:00+00:00"
    })
}

fn translation_row(business_id: &str, language: &str, name: &str) -> Value {
    json!({
        "id": "9b2f5c1e-0000-4000-8000-000000000001",
        "business_id": business_id,
        "language": language,
        "name": name,
        "description": "On the Danube promenade",
        "address": "Strada Isaccei 1",
        "created_at": "2024-01-01T10:00:00+00:00"
    })
}

fn no_rows() -> ResponseTemplate {
    ResponseTemplate::new(406).set_body_json(json!({
        "code": "PGRST116",
        "details": "The result contains 0 rows",
        "hint": null,
        "message": "JSON object requested, multiple (or no) rows returned"
    }))
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_categories_merge_translations_with_key_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .and(query_param("order", "created_at.asc"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": CATEGORY_ID, "name_key": "restaurants", "icon": "restaurant",
             "created_at": "2024-01-01T00:00:00Z"},
            {"id": BUSINESS_ID, "name_key": "bank_atms", "icon": "cash",
             "created_at": "2024-01-02T00:00:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/category_translations"))
        .and(query_param("language", "eq.ro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": OTHER_BUSINESS_ID, "category_id": CATEGORY_ID, "language": "ro",
             "name": "Restaurante", "created_at": "2024-01-01T00:00:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let categories = directory(&server)
        .fetch_categories_with_translations(Language::Ro)
        .await
        .unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Restaurante");
    assert_eq!(categories[1].name, "bank_atms");
}

#[tokio::test]
async fn test_unknown_category_key_is_listed_with_known_ones() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": CATEGORY_ID, "name_key": "restaurants", "icon": "restaurant",
             "created_at": "2024-01-01T00:00:00Z"},
            {"id": BUSINESS_ID, "name_key": "pharmacies", "icon": "pill",
             "created_at": "2024-01-02T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/category_translations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let categories = directory(&server)
        .fetch_categories_with_translations(Language::En)
        .await
        .unwrap();

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["restaurants", "pharmacies"]);
    assert_eq!(categories[1].category.key(), None);
}

#[tokio::test]
async fn test_backend_failure_is_reported_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "PGRST301", "message": "JWT expired"
        })))
        .mount(&server)
        .await;

    let err = directory(&server).fetch_categories().await.unwrap_err();
    match err {
        DirectoryError::Backend {
            table: Table::Categories,
            source: StoreError::Api { status, code, message },
        } => {
            assert_eq!(status, 401);
            assert_eq!(code.as_deref(), Some("PGRST301"));
            assert_eq!(message, "JWT expired");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// Businesses by category
// ============================================================================

#[tokio::test]
async fn test_businesses_by_category_filters_active_and_merges() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .and(query_param("category_id", format!("eq.{CATEGORY_ID}")))
        .and(query_param("is_active", "eq.true"))
        .and(query_param("order", "created_at.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            business_row(BUSINESS_ID, true),
            business_row(OTHER_BUSINESS_ID, true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .and(query_param(
            "business_id",
            format!("in.({BUSINESS_ID},{OTHER_BUSINESS_ID})"),
        ))
        .and(query_param("language", "eq.en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            translation_row(BUSINESS_ID, "en", "Hotel Delta")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let businesses = directory(&server)
        .fetch_businesses_by_category(CATEGORY_ID, Language::En)
        .await
        .unwrap();

    assert_eq!(businesses.len(), 2);
    assert_eq!(businesses[0].name, "Hotel Delta");
    assert_eq!(businesses[0].address, "Strada Isaccei 1");
    assert_eq!(businesses[1].name, "Unnamed Business");
    assert_eq!(businesses[1].description, "");
}

#[tokio::test]
async fn test_inactive_rows_from_backend_are_dropped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            business_row(BUSINESS_ID, false)
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let all = directory(&server)
        .fetch_all_businesses(Language::En)
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_empty_category_skips_translation_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let businesses = directory(&server)
        .fetch_businesses_by_category(CATEGORY_ID, Language::En)
        .await
        .unwrap();
    assert!(businesses.is_empty());
}

#[tokio::test]
async fn test_translation_failure_fails_the_operation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            business_row(BUSINESS_ID, true)
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = directory(&server)
        .fetch_businesses_by_category(CATEGORY_ID, Language::En)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DirectoryError::Backend {
            table: Table::BusinessTranslations,
            source: StoreError::Api { status: 500, .. }
        }
    ));
}

#[tokio::test]
async fn test_invalid_identifiers_never_reach_the_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = directory(&server);
    let err = dir
        .fetch_businesses_by_category("1; drop table businesses", Language::En)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));

    let err = dir
        .fetch_business_by_id("550e8400e29b41d4a716446655440000", Language::En)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));
}

// ============================================================================
// Business by id
// ============================================================================

#[tokio::test]
async fn test_business_by_id_absent_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .and(header("Accept", "application/vnd.pgrst.object+json"))
        .respond_with(no_rows())
        .expect(1)
        .mount(&server)
        .await;

    let business = directory(&server)
        .fetch_business_by_id(BUSINESS_ID, Language::En)
        .await
        .unwrap();
    assert!(business.is_none());
}

#[tokio::test]
async fn test_business_by_id_without_translation_uses_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .and(query_param("id", format!("eq.{BUSINESS_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(business_row(BUSINESS_ID, true)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .and(query_param("language", "eq.fr"))
        .and(query_param("limit", "1"))
        .respond_with(no_rows())
        .expect(1)
        .mount(&server)
        .await;

    let business = directory(&server)
        .fetch_business_by_id(BUSINESS_ID, Language::Fr)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(business.name, "Unnamed Business");
    assert_eq!(business.business.phone, "+40 240 511 111");
}

#[tokio::test]
async fn test_business_by_id_translation_error_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(business_row(BUSINESS_ID, true)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = directory(&server)
        .fetch_business_by_id(BUSINESS_ID, Language::En)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Backend { .. }));
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_escapes_wildcards_and_refetches_translations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .and(query_param("select", "business_id"))
        .and(query_param("name", "ilike.%100\\% off%"))
        .and(query_param("language", "eq.en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"business_id": BUSINESS_ID},
            {"business_id": BUSINESS_ID}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .and(query_param("id", format!("in.({BUSINESS_ID})")))
        .and(query_param("is_active", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            business_row(BUSINESS_ID, true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .and(query_param("select", "*"))
        .and(query_param("business_id", format!("in.({BUSINESS_ID})")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            translation_row(BUSINESS_ID, "en", "Pizza 100% off")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = directory(&server)
        .search_businesses("  100% off ", Language::En)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Pizza 100% off");
}

#[tokio::test]
async fn test_search_drops_asterisks_from_pattern() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/business_translations"))
        .and(query_param("name", "ilike.%OldCafe%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let results = directory(&server)
        .search_businesses("Old*Cafe", Language::En)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_one_character_search_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let results = directory(&server)
        .search_businesses("a", Language::En)
        .await
        .unwrap();
    assert!(results.is_empty());
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = directory_with_timeout(&server, Duration::from_millis(50))
        .fetch_categories()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::Timeout {
            table: Table::Categories,
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_rows_are_backend_parse_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "not-a-uuid", "name_key": "restaurants", "created_at": "2024-01-01T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let err = directory(&server).fetch_categories().await.unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::Backend {
            source: StoreError::Parse(_),
            ..
        }
    ));
}

// ============================================================================
// Demo snapshot
// ============================================================================

fn demo_directory() -> Directory {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/tulcea.json");
    Directory::new(Arc::new(MemoryStore::load(&path).unwrap()))
}

#[tokio::test]
async fn test_demo_snapshot_lists_translated_categories() {
    let out = execute(&demo_directory(), &Command::Categories, Language::De, false)
        .await
        .unwrap();
    assert!(out.contains("Reisebüros"));
    assert!(out.contains("Banken & Geldautomaten"));
}

#[tokio::test]
async fn test_demo_snapshot_search_falls_back_per_business() {
    let results = demo_directory()
        .search_businesses("delta", Language::En)
        .await
        .unwrap();
    let names: Vec<&str> = results.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Danube Delta Tours", "Hotel Delta"]);

    // Only English rows are searched; the Romanian name does not match.
    let results = demo_directory()
        .search_businesses("Orașului", Language::En)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_demo_snapshot_map_excludes_inactive() {
    let all = demo_directory().fetch_all_businesses(Language::En).await.unwrap();
    assert_eq!(all.len(), 6);
    assert!(all.iter().all(|b| b.business.is_active));
    assert!(all.iter().any(|b| b.name == "Unnamed Business"));
}
