//! Content Service
//!
//! Public operations on Services and Posts. Each operation runs in exactly one
//! unit of work (locale sync uses a read-only one first) and reports its
//! outcome to the `content_operations_total` metric.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::request::{ContentBody, PostRequest, ServiceRequest};
use crate::application::services::entity_writer::{write_entity, EntityWrite, WriteTarget};
use crate::application::services::image_propagator::propagate_images;
use crate::application::services::janitor;
use crate::application::services::locale_sync::{
    LocaleSynchronizer, SyncMode, SyncOutcome, SyncRequest,
};
use crate::domain::services::{SlugGenerator, Translator};
use crate::domain::{
    ChildRows, Collection, ContentEntity, ContentFields, ContentTransaction, EntityKind,
    NestedField, UnitOfWork,
};
use crate::infrastructure::database::{finish, read_only};
use crate::infrastructure::metrics;
use crate::shared::error::ContentError;

/// Content service trait
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Create a Service with its collections
    async fn create_service(
        &self,
        actor: Option<i64>,
        request: ServiceRequest,
    ) -> Result<i64, ContentError>;

    /// Overwrite a Service; collections absent from the request are kept
    async fn update_service(
        &self,
        id: i64,
        actor: Option<i64>,
        request: ServiceRequest,
    ) -> Result<i64, ContentError>;

    /// Get a Service with all of its collections
    async fn get_service(&self, id: i64) -> Result<ContentDetail, ContentError>;

    /// Delete a Service and every row referencing it
    async fn delete_service(&self, id: i64) -> Result<bool, ContentError>;

    /// Create or refresh the sibling of a Service in another locale
    async fn sync_service_locale(
        &self,
        id: i64,
        actor: Option<i64>,
        locale: String,
        mode: SyncMode,
    ) -> Result<SyncOutcome, ContentError>;

    /// Copy the media references of a Service onto its locale siblings
    async fn propagate_service_images(&self, id: i64) -> Result<u64, ContentError>;

    async fn create_post(&self, actor: Option<i64>, request: PostRequest)
        -> Result<i64, ContentError>;

    async fn update_post(
        &self,
        id: i64,
        actor: Option<i64>,
        request: PostRequest,
    ) -> Result<i64, ContentError>;

    async fn get_post(&self, id: i64) -> Result<ContentDetail, ContentError>;

    async fn delete_post(&self, id: i64) -> Result<bool, ContentError>;

    /// Open and discard a transaction to check the store is reachable
    async fn health_check(&self) -> Result<(), ContentError>;
}

/// A content row together with every collection it owns.
#[derive(Debug, Clone)]
pub struct ContentDetail {
    pub entity: ContentEntity,
    pub collections: Vec<(Collection, ChildRows)>,
}

impl ContentDetail {
    pub fn collection(&self, collection: Collection) -> Option<&ChildRows> {
        self.collections
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, rows)| rows)
    }
}

fn observe<T>(kind: EntityKind, operation: &str, result: &Result<T, ContentError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.label(),
    };
    metrics::record_operation(kind.as_str(), operation, outcome);
}

fn push_nested<T>(
    nested: &mut Vec<(Collection, ChildRows)>,
    collection: Collection,
    field: NestedField<T>,
    wrap: fn(Vec<T>) -> ChildRows,
) {
    if let Some(rows) = field.into_rows() {
        nested.push((collection, wrap(rows)));
    }
}

/// ContentService implementation
pub struct ContentServiceImpl<U>
where
    U: UnitOfWork,
{
    uow: U,
    translator: Arc<dyn Translator>,
    slugs: Arc<dyn SlugGenerator>,
    slug_retry_limit: u32,
}

impl<U> ContentServiceImpl<U>
where
    U: UnitOfWork,
{
    pub fn new(
        uow: U,
        translator: Arc<dyn Translator>,
        slugs: Arc<dyn SlugGenerator>,
        slug_retry_limit: u32,
    ) -> Self {
        Self {
            uow,
            translator,
            slugs,
            slug_retry_limit,
        }
    }

    fn fields(&self, body: &ContentBody, slug_group: Option<String>) -> ContentFields {
        let slug = match &body.slug {
            Some(slug) => slug.clone(),
            None => self.slugs.slugify(&body.title, &body.locale),
        };

        ContentFields {
            locale: body.locale.clone(),
            slug,
            slug_group,
            title: body.title.clone(),
            excerpt: body.excerpt.clone(),
            body: body.body.clone(),
            seo_title: body.seo_title.clone(),
            seo_description: body.seo_description.clone(),
            status: body.status,
            published_at: body.published_at,
            sort_order: body.sort_order,
            media: body.media(),
        }
    }

    fn service_write(
        &self,
        request: ServiceRequest,
        actor: Option<i64>,
        target: WriteTarget,
    ) -> EntityWrite {
        let slug_group = match (request.slug_group.clone(), target) {
            (Some(group), _) => Some(group),
            (None, WriteTarget::Create) => Some(uuid::Uuid::new_v4().to_string()),
            (None, WriteTarget::Update(_)) => None,
        };
        let fields = self.fields(&request.content, slug_group);

        let mut nested = Vec::new();
        push_nested(&mut nested, Collection::ServiceTags, request.tags, ChildRows::Links);
        push_nested(
            &mut nested,
            Collection::ServiceCategories,
            request.categories,
            ChildRows::Links,
        );
        push_nested(
            &mut nested,
            Collection::ServiceDeliverables,
            request.deliverables,
            ChildRows::Deliverables,
        );
        push_nested(
            &mut nested,
            Collection::ServiceProcessSteps,
            request.process_steps,
            ChildRows::ProcessSteps,
        );
        push_nested(&mut nested, Collection::ServiceFaqs, request.faqs, ChildRows::Faqs);
        push_nested(
            &mut nested,
            Collection::RelatedServices,
            request.related_services,
            ChildRows::Links,
        );
        push_nested(
            &mut nested,
            Collection::ServiceRelatedPosts,
            request.related_posts,
            ChildRows::Links,
        );

        EntityWrite {
            kind: EntityKind::Service,
            fields,
            nested,
            actor,
        }
    }

    fn post_write(&self, request: PostRequest, actor: Option<i64>) -> EntityWrite {
        let fields = self.fields(&request.content, None);

        let mut nested = Vec::new();
        push_nested(&mut nested, Collection::PostTags, request.tags, ChildRows::Links);
        push_nested(
            &mut nested,
            Collection::PostCategories,
            request.categories,
            ChildRows::Links,
        );
        push_nested(
            &mut nested,
            Collection::RelatedPosts,
            request.related_posts,
            ChildRows::Links,
        );
        push_nested(
            &mut nested,
            Collection::PostRelatedServices,
            request.related_services,
            ChildRows::Links,
        );

        EntityWrite {
            kind: EntityKind::Post,
            fields,
            nested,
            actor,
        }
    }

    async fn write(&self, target: WriteTarget, write: EntityWrite) -> Result<i64, ContentError> {
        let mut tx = self.uow.begin().await?;
        let outcome = write_entity(&mut tx, target, &write).await;
        let id = finish(tx, outcome).await?;

        tracing::info!(kind = %write.kind, id, nested = write.nested.len(), "Committed content write");
        Ok(id)
    }

    async fn detail(&self, kind: EntityKind, id: i64) -> Result<ContentDetail, ContentError> {
        let mut tx = self.uow.begin().await?;
        let outcome = load_detail(&mut tx, kind, id).await;
        read_only(tx, outcome).await
    }

    async fn propagate(&self, kind: EntityKind, id: i64) -> Result<u64, ContentError> {
        let mut tx = self.uow.begin().await?;
        let outcome = propagate_images(&mut tx, kind, id).await;
        let updated = finish(tx, outcome).await?;

        tracing::info!(%kind, id, updated, "Propagated media to siblings");
        Ok(updated)
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool, ContentError> {
        let mut tx = self.uow.begin().await?;
        let outcome = janitor::delete_entity(&mut tx, kind, id).await;
        let deleted = finish(tx, outcome).await?;

        tracing::info!(%kind, id, deleted, "Committed content delete");
        Ok(deleted)
    }
}

async fn load_detail<X>(tx: &mut X, kind: EntityKind, id: i64) -> Result<ContentDetail, ContentError>
where
    X: ContentTransaction,
{
    let entity = tx
        .find_entity(kind, id)
        .await?
        .ok_or_else(|| ContentError::NotFound(format!("{} {}", kind, id)))?;

    let mut collections = Vec::new();
    for collection in Collection::owned_by(kind) {
        let rows = tx.load_children(collection.relation(), id).await?;
        collections.push((collection, rows));
    }

    Ok(ContentDetail {
        entity,
        collections,
    })
}

#[async_trait]
impl<U> ContentService for ContentServiceImpl<U>
where
    U: UnitOfWork + 'static,
{
    #[tracing::instrument(skip(self, request), fields(locale = %request.content.locale))]
    async fn create_service(
        &self,
        actor: Option<i64>,
        request: ServiceRequest,
    ) -> Result<i64, ContentError> {
        let write = self.service_write(request, actor, WriteTarget::Create);
        let result = self.write(WriteTarget::Create, write).await;
        observe(EntityKind::Service, "create", &result);
        result
    }

    #[tracing::instrument(skip(self, request))]
    async fn update_service(
        &self,
        id: i64,
        actor: Option<i64>,
        request: ServiceRequest,
    ) -> Result<i64, ContentError> {
        let target = WriteTarget::Update(id);
        let write = self.service_write(request, actor, target);
        let result = self.write(target, write).await;
        observe(EntityKind::Service, "update", &result);
        result
    }

    #[tracing::instrument(skip(self))]
    async fn get_service(&self, id: i64) -> Result<ContentDetail, ContentError> {
        self.detail(EntityKind::Service, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_service(&self, id: i64) -> Result<bool, ContentError> {
        let result = self.delete(EntityKind::Service, id).await;
        observe(EntityKind::Service, "delete", &result);
        result
    }

    #[tracing::instrument(skip(self))]
    async fn sync_service_locale(
        &self,
        id: i64,
        actor: Option<i64>,
        locale: String,
        mode: SyncMode,
    ) -> Result<SyncOutcome, ContentError> {
        let synchronizer = LocaleSynchronizer::new(
            self.translator.as_ref(),
            self.slugs.as_ref(),
            self.slug_retry_limit,
        );
        let request = SyncRequest {
            source_id: id,
            target_locale: locale,
            mode,
            actor,
        };

        let result = synchronizer.sync(&self.uow, &request).await;
        observe(EntityKind::Service, "sync", &result);
        result
    }

    #[tracing::instrument(skip(self))]
    async fn propagate_service_images(&self, id: i64) -> Result<u64, ContentError> {
        let result = self.propagate(EntityKind::Service, id).await;
        observe(EntityKind::Service, "propagate_images", &result);
        result
    }

    #[tracing::instrument(skip(self, request), fields(locale = %request.content.locale))]
    async fn create_post(
        &self,
        actor: Option<i64>,
        request: PostRequest,
    ) -> Result<i64, ContentError> {
        let write = self.post_write(request, actor);
        let result = self.write(WriteTarget::Create, write).await;
        observe(EntityKind::Post, "create", &result);
        result
    }

    #[tracing::instrument(skip(self, request))]
    async fn update_post(
        &self,
        id: i64,
        actor: Option<i64>,
        request: PostRequest,
    ) -> Result<i64, ContentError> {
        let write = self.post_write(request, actor);
        let result = self.write(WriteTarget::Update(id), write).await;
        observe(EntityKind::Post, "update", &result);
        result
    }

    #[tracing::instrument(skip(self))]
    async fn get_post(&self, id: i64) -> Result<ContentDetail, ContentError> {
        self.detail(EntityKind::Post, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_post(&self, id: i64) -> Result<bool, ContentError> {
        let result = self.delete(EntityKind::Post, id).await;
        observe(EntityKind::Post, "delete", &result);
        result
    }

    async fn health_check(&self) -> Result<(), ContentError> {
        let tx = self.uow.begin().await?;
        tx.rollback().await
    }
}
