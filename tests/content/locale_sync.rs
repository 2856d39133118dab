//! Locale sibling synchronization

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use content_server::application::services::{ContentService, SyncMode};
use content_server::domain::services::{TranslationError, Translator};
use content_server::domain::{Collection, EntityKind, TranslatableFields};
use content_server::infrastructure::memory::InMemoryContentStore;
use content_server::infrastructure::translation::DisabledTranslator;
use content_server::shared::error::ContentError;

use crate::common::{content_service, seed_service, service_body, service_request};

/// Prefixes every title with the target locale and counts calls.
#[derive(Default)]
struct PrefixTranslator {
    calls: AtomicUsize,
}

#[async_trait]
impl Translator for PrefixTranslator {
    async fn translate(
        &self,
        fields: &TranslatableFields,
        _from_locale: &str,
        to_locale: &str,
    ) -> Result<TranslatableFields, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TranslatableFields {
            title: format!("{} {}", to_locale, fields.title),
            ..fields.clone()
        })
    }
}

#[tokio::test]
async fn test_sync_twice_keeps_one_sibling_per_locale() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let mut body = service_body("en", "Web Design");
    body["deliverables"] = json!([{"title": "Mockups"}, {"title": "Site"}]);
    let source = seed_service(&content, body).await;

    let first = content
        .sync_service_locale(source, None, "vi".into(), SyncMode::Manual)
        .await
        .unwrap();
    let second = content
        .sync_service_locale(source, None, "vi".into(), SyncMode::Manual)
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.sibling_id, second.sibling_id);
    assert_eq!(store.entities(EntityKind::Service).len(), 2);

    let source_detail = content.get_service(source).await.unwrap();
    let sibling_detail = content.get_service(first.sibling_id).await.unwrap();
    assert_eq!(sibling_detail.entity.fields.slug, "web-design-vi");
    assert_eq!(
        sibling_detail.entity.slug_group(),
        source_detail.entity.slug_group()
    );
    assert_eq!(
        sibling_detail.collection(Collection::ServiceDeliverables),
        source_detail.collection(Collection::ServiceDeliverables)
    );
}

#[tokio::test]
async fn test_resync_copies_latest_source_state() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let source = seed_service(&content, service_body("en", "Support")).await;

    let outcome = content
        .sync_service_locale(source, None, "fr".into(), SyncMode::Manual)
        .await
        .unwrap();

    let mut body = service_body("en", "Support");
    body["sort_order"] = json!(9);
    body["faqs"] = json!([{"question": "Hours?", "answer": "24/7"}]);
    content
        .update_service(source, None, service_request(body))
        .await
        .unwrap();

    content
        .sync_service_locale(source, None, "fr".into(), SyncMode::Manual)
        .await
        .unwrap();

    let sibling = content.get_service(outcome.sibling_id).await.unwrap();
    assert_eq!(sibling.entity.fields.sort_order, 9);
    assert_eq!(sibling.collection(Collection::ServiceFaqs).map(|r| r.len()), Some(1));
}

#[tokio::test]
async fn test_auto_sync_translates_outside_the_write() {
    let store = InMemoryContentStore::new();
    let translator = Arc::new(PrefixTranslator::default());
    let content = content_service(&store, translator.clone());
    let source = seed_service(&content, service_body("en", "Branding")).await;

    let outcome = content
        .sync_service_locale(source, Some(3), "de".into(), SyncMode::Auto)
        .await
        .unwrap();

    let sibling = store.entity(EntityKind::Service, outcome.sibling_id).unwrap();
    assert_eq!(sibling.fields.title, "de Branding");
    assert_eq!(sibling.fields.slug, "de-branding-de");
    assert_eq!(sibling.created_by, Some(3));
    assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_auto_sync_without_translator_fails_cleanly() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));
    let source = seed_service(&content, service_body("en", "Branding")).await;

    let err = content
        .sync_service_locale(source, None, "de".into(), SyncMode::Auto)
        .await
        .unwrap_err();

    assert!(matches!(err, ContentError::TranslationFailed(_)));
    assert_eq!(store.entities(EntityKind::Service).len(), 1);
}

#[test_case(SyncMode::Manual ; "manual")]
#[test_case(SyncMode::Auto ; "auto")]
#[tokio::test]
async fn test_sync_rejects_source_locale(mode: SyncMode) {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(PrefixTranslator::default()));
    let source = seed_service(&content, service_body("en", "Branding")).await;

    let err = content
        .sync_service_locale(source, None, "en".into(), mode)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::SameLocale));
}

#[tokio::test]
async fn test_sync_of_missing_source() {
    let store = InMemoryContentStore::new();
    let content = content_service(&store, Arc::new(DisabledTranslator));

    let err = content
        .sync_service_locale(31337, None, "vi".into(), SyncMode::Manual)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::SourceNotFound));
}
