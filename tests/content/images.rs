//! Media propagation across locale siblings

use std::sync::Arc;

use serde_json::json;

use content_server::application::services::{ContentService, SyncMode};
use content_server::domain::{EntityKind, MediaRefs};
use content_server::infrastructure::memory::InMemoryContentStore;
use content_server::infrastructure::translation::DisabledTranslator;
use content_server::shared::error::ContentError;

use crate::common::{content_service, seed_service, service_body, service_request};

#[tokio::test]
async fn test_media_reaches_every_sibling() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let source = seed_service(&content, service_body("en", "Photography")).await;

    let vi = content
        .sync_service_locale(source, None, "vi".into(), SyncMode::Manual)
        .await
        .unwrap()
        .sibling_id;
    let fr = content
        .sync_service_locale(source, None, "fr".into(), SyncMode::Manual)
        .await
        .unwrap()
        .sibling_id;

    let before = store.entity(EntityKind::Service, vi).unwrap();

    let mut body = service_body("en", "Photography");
    body["hero_asset_id"] = json!(101);
    body["og_asset_id"] = json!(202);
    content
        .update_service(source, None, service_request(body))
        .await
        .unwrap();

    let updated = content.propagate_service_images(source).await.unwrap();
    assert_eq!(updated, 2);

    let expected = MediaRefs {
        hero_asset_id: Some(101),
        og_asset_id: Some(202),
    };
    for id in [vi, fr] {
        let sibling = store.entity(EntityKind::Service, id).unwrap();
        assert_eq!(sibling.fields.media, expected);
    }

    let after = store.entity(EntityKind::Service, vi).unwrap();
    assert_eq!(after.fields.title, before.fields.title);
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn test_source_without_media_leaves_siblings_alone() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let mut body = service_body("en", "Video");
    body["slug_group"] = json!("video");
    let source = seed_service(&content, body).await;

    let mut body = service_body("vi", "Video");
    body["slug_group"] = json!("video");
    body["hero_asset_id"] = json!(5);
    let sibling = seed_service(&content, body).await;

    assert_eq!(content.propagate_service_images(source).await.unwrap(), 0);
    let stored = store.entity(EntityKind::Service, sibling).unwrap();
    assert_eq!(stored.fields.media.hero_asset_id, Some(5));
}

#[tokio::test]
async fn test_propagate_from_missing_source() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let err = content.propagate_service_images(8).await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound(_)));
}
