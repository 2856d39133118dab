//! Nested collection writes through the content service

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use content_server::application::dto::request::TermRequest;
use content_server::application::services::{
    ContentService, TaxonomyService, TaxonomyServiceImpl,
};
use content_server::domain::services::DefaultSlugGenerator;
use content_server::domain::{ChildRows, Collection, Deliverable, EntityKind};
use content_server::infrastructure::memory::InMemoryContentStore;
use content_server::infrastructure::translation::DisabledTranslator;
use content_server::shared::error::{ConstraintKind, ContentError};

use crate::common::{content_service, seed_service, service_body, service_request};

async fn tag(store: &InMemoryContentStore, name: &str) -> i64 {
    TaxonomyServiceImpl::new(store.clone(), Arc::new(DefaultSlugGenerator::new()))
        .create_term(
            EntityKind::Tag,
            TermRequest {
                locale: "en".into(),
                name: name.into(),
                slug: None,
            },
        )
        .await
        .unwrap()
}

fn deliverable(title: &str) -> Deliverable {
    Deliverable {
        title: title.into(),
        description: None,
    }
}

#[tokio::test]
async fn test_absent_empty_and_present_collections() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let t1 = tag(&store, "One").await;
    let t2 = tag(&store, "Two").await;

    let mut body = service_body("en", "Consulting");
    body["tags"] = json!([t1, t2]);
    body["deliverables"] = json!([{"title": "Plan"}, {"title": "Report"}]);
    let id = seed_service(&content, body).await;

    // Tags absent, deliverables empty
    let mut body = service_body("en", "Consulting");
    body["deliverables"] = json!([]);
    content
        .update_service(id, None, service_request(body))
        .await
        .unwrap();

    let detail = content.get_service(id).await.unwrap();
    assert_eq!(
        detail.collection(Collection::ServiceTags),
        Some(&ChildRows::Links(vec![t1, t2]))
    );
    assert_eq!(
        detail.collection(Collection::ServiceDeliverables),
        Some(&ChildRows::Deliverables(vec![]))
    );

    // Tags present
    let mut body = service_body("en", "Consulting");
    body["tags"] = json!([t2]);
    content
        .update_service(id, None, service_request(body))
        .await
        .unwrap();

    let detail = content.get_service(id).await.unwrap();
    assert_eq!(
        detail.collection(Collection::ServiceTags),
        Some(&ChildRows::Links(vec![t2]))
    );
}

#[tokio::test]
async fn test_repeated_update_is_idempotent() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let t1 = tag(&store, "One").await;
    let id = seed_service(&content, service_body("en", "Hosting")).await;

    let mut body = service_body("en", "Hosting");
    body["tags"] = json!([t1]);
    body["deliverables"] = json!([{"title": "Server"}, {"title": "Backups"}]);
    body["faqs"] = json!([{"question": "Uptime?", "answer": "99.9%"}]);

    content
        .update_service(id, None, service_request(body.clone()))
        .await
        .unwrap();
    let first = content.get_service(id).await.unwrap();

    content
        .update_service(id, None, service_request(body))
        .await
        .unwrap();
    let second = content.get_service(id).await.unwrap();

    assert_eq!(first.collections, second.collections);
    assert_eq!(
        store.count_rows("service_deliverables", "service_id", id).unwrap(),
        2
    );
}

#[tokio::test]
async fn test_failing_collection_rolls_back_the_whole_update() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let t1 = tag(&store, "One").await;

    let mut body = service_body("en", "Original");
    body["tags"] = json!([t1]);
    body["deliverables"] = json!([{"title": "Kept"}]);
    let id = seed_service(&content, body).await;

    let mut body = service_body("en", "Changed");
    body["slug"] = json!("changed-en");
    body["deliverables"] = json!([{"title": "Replaced"}]);
    body["tags"] = json!([t1, 999_999]);
    let err = content
        .update_service(id, None, service_request(body))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ContentError::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));

    let detail = content.get_service(id).await.unwrap();
    assert_eq!(detail.entity.fields.title, "Original");
    assert_eq!(
        detail.collection(Collection::ServiceTags),
        Some(&ChildRows::Links(vec![t1]))
    );
    assert_eq!(
        detail.collection(Collection::ServiceDeliverables),
        Some(&ChildRows::Deliverables(vec![deliverable("Kept")]))
    );
}

#[tokio::test]
async fn test_ordered_links_keep_payload_order() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let a = seed_service(&content, service_body("en", "Alpha")).await;
    let b = seed_service(&content, service_body("en", "Beta")).await;
    let c = seed_service(&content, service_body("en", "Gamma")).await;

    let mut body = service_body("en", "Hub");
    body["related_services"] = json!([c, a, b]);
    let hub = seed_service(&content, body).await;

    let detail = content.get_service(hub).await.unwrap();
    assert_eq!(
        detail.collection(Collection::RelatedServices),
        Some(&ChildRows::Links(vec![c, a, b]))
    );
}

#[tokio::test]
async fn test_update_of_missing_service_is_not_found() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let mut body = service_body("en", "Ghost");
    body["deliverables"] = json!([{"title": "Nothing"}]);
    let err = content
        .update_service(404, None, service_request(body))
        .await
        .unwrap_err();

    assert!(matches!(err, ContentError::NotFound(_)));
    assert_eq!(
        store.count_rows("service_deliverables", "service_id", 404).unwrap(),
        0
    );
}

#[tokio::test]
async fn test_duplicate_slug_is_a_unique_violation() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    seed_service(&content, service_body("en", "Same Title")).await;

    let err = content
        .create_service(None, service_request(service_body("en", "Same Title")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ContentError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            ..
        }
    ));
    assert_eq!(store.entities(EntityKind::Service).len(), 1);
}
