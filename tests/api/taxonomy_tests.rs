//! Tag and Category API Tests

use axum::http::StatusCode;
use serde_json::json;
use test_case::test_case;

use crate::common::TestApp;

#[test_case("/api/v1/tags" ; "tags")]
#[test_case("/api/v1/categories" ; "categories")]
#[tokio::test]
async fn test_create_and_delete_term(base: &str) {
    let app = TestApp::new();

    let (status, body) = app
        .post_json_auth(base, json!({"locale": "en", "name": "Cloud Hosting"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, _) = app.delete_auth(&format!("{}/{}", base, id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete_auth(&format!("{}/{}", base, id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_tag_slug_conflicts() {
    let app = TestApp::new();
    let body = json!({"locale": "en", "name": "Rust", "slug": "rust"});

    let (status, _) = app.post_json_auth("/api/v1/tags", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post_json_auth("/api/v1/tags", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 10005);
}

#[tokio::test]
async fn test_deleting_tag_unlinks_service() {
    let app = TestApp::new();
    let (_, tag) = app
        .post_json_auth("/api/v1/tags", json!({"locale": "en", "name": "Design"}))
        .await;
    let tag = tag["id"].as_i64().unwrap();

    let (_, service) = app
        .post_json_auth(
            "/api/v1/services",
            json!({"locale": "en", "title": "Logo design", "tags": [tag]}),
        )
        .await;
    let service = service["id"].as_i64().unwrap();

    let (status, _) = app.delete_auth(&format!("/api/v1/tags/{}", tag)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get_auth(&format!("/api/v1/services/{}", service)).await;
    assert_eq!(body["tags"], json!([]));
}
