//! Deletes and dependent-row cleanup

use std::sync::Arc;

use serde_json::json;

use content_server::application::dto::request::TermRequest;
use content_server::application::services::{
    ContentService, TaxonomyService, TaxonomyServiceImpl,
};
use content_server::domain::services::DefaultSlugGenerator;
use content_server::domain::{ChildRows, Collection, EntityKind};
use content_server::infrastructure::memory::InMemoryContentStore;
use content_server::infrastructure::translation::DisabledTranslator;

use crate::common::{
    content_service, post_body, seed_post, seed_service, service_body, service_request,
};

#[tokio::test]
async fn test_delete_clears_references_on_both_sides() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let a = seed_service(&content, service_body("en", "Service A")).await;
    let mut body = service_body("en", "Service B");
    body["related_services"] = json!([a]);
    let b = seed_service(&content, body).await;

    let mut body = service_body("en", "Service A");
    body["related_services"] = json!([b]);
    content
        .update_service(a, None, service_request(body))
        .await
        .unwrap();

    let mut body = post_body("en", "Announcing A");
    body["related_services"] = json!([a, b]);
    let post = seed_post(&content, body).await;

    assert!(content.delete_service(a).await.unwrap());

    assert!(store.entity(EntityKind::Service, a).is_none());
    let b_detail = content.get_service(b).await.unwrap();
    assert_eq!(
        b_detail.collection(Collection::RelatedServices),
        Some(&ChildRows::Links(vec![]))
    );
    let post_detail = content.get_post(post).await.unwrap();
    assert_eq!(
        post_detail.collection(Collection::PostRelatedServices),
        Some(&ChildRows::Links(vec![b]))
    );
    assert_eq!(
        store
            .count_rows("service_related_services", "related_service_id", a)
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_delete_removes_owned_children() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let mut body = service_body("en", "Migration");
    body["deliverables"] = json!([{"title": "Plan"}]);
    body["process_steps"] = json!([{"title": "Audit"}, {"title": "Move"}]);
    body["faqs"] = json!([{"question": "Downtime?", "answer": "None"}]);
    let id = seed_service(&content, body).await;

    assert!(content.delete_service(id).await.unwrap());

    for table in ["service_deliverables", "service_process_steps", "service_faqs"] {
        assert_eq!(store.count_rows(table, "service_id", id).unwrap(), 0, "{}", table);
    }
}

#[tokio::test]
async fn test_delete_post_referenced_by_service() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let post = seed_post(&content, post_body("en", "Case study")).await;
    let mut body = service_body("en", "Branding");
    body["related_posts"] = json!([post]);
    let service = seed_service(&content, body).await;

    assert!(content.delete_post(post).await.unwrap());

    let detail = content.get_service(service).await.unwrap();
    assert_eq!(
        detail.collection(Collection::ServiceRelatedPosts),
        Some(&ChildRows::Links(vec![]))
    );
}

#[tokio::test]
async fn test_delete_missing_entity_reports_false() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    assert!(!content.delete_service(12345).await.unwrap());
    assert!(!content.delete_post(12345).await.unwrap());
}

#[tokio::test]
async fn test_delete_category_unlinks_services_and_posts() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let taxonomy = TaxonomyServiceImpl::new(store.clone(), Arc::new(DefaultSlugGenerator::new()));

    let category = taxonomy
        .create_term(
            EntityKind::Category,
            TermRequest {
                locale: "en".into(),
                name: "Design".into(),
                slug: Some("design".into()),
            },
        )
        .await
        .unwrap();

    let mut body = service_body("en", "Logo design");
    body["categories"] = json!([category]);
    let service = seed_service(&content, body).await;
    let mut body = post_body("en", "Logo trends");
    body["categories"] = json!([category]);
    let post = seed_post(&content, body).await;

    assert!(taxonomy.delete_term(EntityKind::Category, category).await.unwrap());

    assert_eq!(
        store.count_rows("service_categories", "service_id", service).unwrap(),
        0
    );
    assert_eq!(
        store.count_rows("post_categories", "post_id", post).unwrap(),
        0
    );
}
