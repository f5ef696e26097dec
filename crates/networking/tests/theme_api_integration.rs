//! Integration tests for the HTTP theme resolver
//!
//! These tests use wiremock to serve the theme endpoint and exercise the full
//! request/response cycle, error classification, and retry behavior.

use app_core::resolver::{ResolveError, ThemeResolver};
use networking::{HttpThemeResolver, ThemeApiConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn theme_document() -> serde_json::Value {
    json!({
        "version": 1,
        "themes": {
            "midnight": {
                "name": "🌙 Midnight",
                "description": "Deep blue night",
                "order": 2,
                "colors": { "background": "#0f1729", "primary": "#3b82f6" }
            },
            "emerald": {
                "name": "🌿 Emerald",
                "description": "Fresh and vibrant green",
                "order": 1,
                "colors": { "background": "#eafff2", "primary": "#059669" }
            }
        }
    })
}

fn resolver(server: &MockServer) -> HttpThemeResolver {
    let config = ThemeApiConfig::new(server.uri())
        .with_initial_retry_delay(Duration::from_millis(10))
        .with_max_retry_delay(Duration::from_millis(20))
        .with_retry_budget(Duration::from_millis(300));
    HttpThemeResolver::new(config).unwrap()
}

// =============================================================================
// Successful Request Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_themes_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(theme_document()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let themes = resolver(&mock_server).fetch_themes().await.unwrap();

    // Declaration order is kept; listing order comes from `order`
    assert_eq!(themes.keys(), vec!["midnight", "emerald"]);
    assert_eq!(themes.version(), Some(1));
    assert_eq!(themes.get("emerald").unwrap().color("primary"), Some("#059669"));

    let listed: Vec<String> = themes.list_themes().into_iter().map(|s| s.key).collect();
    assert_eq!(listed, vec!["emerald", "midnight"]);
}

#[tokio::test]
async fn test_custom_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/static/themes.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(theme_document()))
        .mount(&mock_server)
        .await;

    let config = ThemeApiConfig::new(mock_server.uri()).with_path("/static/themes.json");
    let themes = HttpThemeResolver::new(config).unwrap().fetch_themes().await.unwrap();
    assert_eq!(themes.len(), 2);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = resolver(&mock_server).fetch_themes().await.unwrap_err();
    match err {
        ResolveError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/api/themes"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = resolver(&mock_server).fetch_themes().await.unwrap_err();
    assert!(matches!(err, ResolveError::Parse(_)));
}

#[tokio::test]
async fn test_document_without_themes_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": 1 })))
        .mount(&mock_server)
        .await;

    let themes = resolver(&mock_server).fetch_themes().await.unwrap();
    assert!(themes.is_empty());
}

#[tokio::test]
async fn test_malformed_entry_does_not_fail_the_map() {
    let mock_server = MockServer::start().await;

    let mut document = theme_document();
    document["themes"]["broken"] = json!({ "name": "Broken", "colors": null, "order": 1.5 });

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(&mock_server)
        .await;

    let themes = resolver(&mock_server).fetch_themes().await.unwrap();
    assert_eq!(themes.len(), 3);
    assert_eq!(themes.get("midnight").unwrap().color("primary"), Some("#3b82f6"));
    assert!(themes.get("broken").unwrap().colors.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = ThemeApiConfig::new("http://127.0.0.1:9").with_retry_budget(Duration::ZERO);
    let err = HttpThemeResolver::new(config).unwrap().fetch_themes().await.unwrap_err();
    assert!(matches!(err, ResolveError::Transport(_)));
}

// =============================================================================
// Retry Tests
// =============================================================================

#[tokio::test]
async fn test_server_error_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(theme_document()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let themes = resolver(&mock_server).fetch_themes().await.unwrap();
    assert!(themes.contains("midnight"));
}

#[tokio::test]
async fn test_server_error_exhausts_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = resolver(&mock_server).fetch_themes().await.unwrap_err();
    assert!(matches!(err, ResolveError::Status { status: 500, .. }));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.len() > 1);
}
