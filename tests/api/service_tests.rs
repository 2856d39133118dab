//! Service and Post API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use content_server::domain::EntityKind;

use crate::common::{TestApp, TEST_USER_ID};

/// Requests without a bearer token are rejected
#[tokio::test]
async fn test_api_requires_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/v1/services/1").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 10003);
}

#[tokio::test]
async fn test_service_crud() {
    // Arrange
    let app = TestApp::new();
    let payload = json!({
        "locale": "en",
        "title": "Cloud Migration",
        "deliverables": [{"title": "Runbook"}],
        "faqs": [{"question": "Cost?", "answer": "Fixed"}],
    });

    // Act
    let (status, created) = app.post_json_auth("/api/v1/services", payload).await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app.get_auth(&format!("/api/v1/services/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "cloud-migration-en");
    assert_eq!(body["created_by"], TEST_USER_ID);
    assert_eq!(body["deliverables"], json!([{"title": "Runbook", "description": null}]));

    // Omitted collections are kept, explicit null clears
    let (status, _) = app
        .put_json_auth(
            &format!("/api/v1/services/{}", id),
            json!({"locale": "en", "title": "Cloud Migration", "faqs": null}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get_auth(&format!("/api/v1/services/{}", id)).await;
    assert_eq!(body["deliverables"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["faqs"], json!([]));

    let (status, _) = app.delete_auth(&format!("/api/v1/services/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.store.entity(EntityKind::Service, id).is_none());

    let (status, _) = app.get_auth(&format!("/api/v1/services/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_service_is_not_found() {
    let app = TestApp::new();

    let (status, _) = app
        .put_json_auth("/api/v1/services/404", json!({"locale": "en", "title": "Ghost"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete_auth("/api/v1/services/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post_json_auth("/api/v1/services/404/translations", json!({"locale": "vi"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_payload_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json_auth("/api/v1/services", json!({"locale": "e", "title": ""}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
    assert!(app.store.entities(EntityKind::Service).is_empty());
}

#[tokio::test]
async fn test_link_to_missing_row_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json_auth(
            "/api/v1/services",
            json!({"locale": "en", "title": "Orphan", "tags": [999_999]}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
    assert!(app.store.entities(EntityKind::Service).is_empty());
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let app = TestApp::new();
    let payload = json!({"locale": "en", "slug": "audit", "title": "Audit"});

    let (status, _) = app.post_json_auth("/api/v1/services", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post_json_auth("/api/v1/services", payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_sync_creates_then_refreshes() {
    let app = TestApp::new();
    let (_, created) = app
        .post_json_auth("/api/v1/services", json!({"locale": "en", "title": "Hosting"}))
        .await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/services/{}/translations", id);

    let (status, first) = app.post_json_auth(&uri, json!({"locale": "vi"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["created"], true);

    let (status, second) = app
        .post_json_auth(&uri, json!({"locale": "vi", "mode": "manual"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["sibling_id"], first["sibling_id"]);

    let (status, _) = app.post_json_auth(&uri, json!({"locale": "en"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auto_sync_without_translator_is_bad_gateway() {
    let app = TestApp::new();
    let (_, created) = app
        .post_json_auth("/api/v1/services", json!({"locale": "en", "title": "Hosting"}))
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .post_json_auth(
            &format!("/api/v1/services/{}/translations", id),
            json!({"locale": "vi", "mode": "auto"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], 10008);
    assert_eq!(app.store.entities(EntityKind::Service).len(), 1);
}

#[tokio::test]
async fn test_propagate_images_endpoint() {
    let app = TestApp::new();
    let (_, created) = app
        .post_json_auth(
            "/api/v1/services",
            json!({"locale": "en", "title": "Studio", "hero_asset_id": 77}),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    let (_, sibling) = app
        .post_json_auth(
            &format!("/api/v1/services/{}/translations", id),
            json!({"locale": "fr"}),
        )
        .await;
    let sibling_id = sibling["sibling_id"].as_i64().unwrap();

    let (status, body) = app
        .put_json_auth(
            &format!("/api/v1/services/{}", id),
            json!({"locale": "en", "title": "Studio", "hero_asset_id": 78}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, body) = app
        .post_json_auth(&format!("/api/v1/services/{}/images/propagate", id), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, body) = app.get_auth(&format!("/api/v1/services/{}", sibling_id)).await;
    assert_eq!(body["hero_asset_id"], 78);
}

#[tokio::test]
async fn test_post_crud_with_related_service() {
    let app = TestApp::new();
    let (_, service) = app
        .post_json_auth("/api/v1/services", json!({"locale": "en", "title": "SEO"}))
        .await;
    let service = service["id"].as_i64().unwrap();

    let (status, created) = app
        .post_json_auth(
            "/api/v1/posts",
            json!({"locale": "en", "title": "Why SEO", "related_services": [service]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let post = created["id"].as_i64().unwrap();

    let (status, body) = app.get_auth(&format!("/api/v1/posts/{}", post)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["related_services"], json!([service]));
    assert_eq!(body["slug"], "why-seo-en");

    let (status, _) = app.delete_auth(&format!("/api/v1/services/{}", service)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get_auth(&format!("/api/v1/posts/{}", post)).await;
    assert_eq!(body["related_services"], json!([]));

    let (status, _) = app.delete_auth(&format!("/api/v1/posts/{}", post)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
