//! Taxonomy Service
//!
//! Tags and categories. Deleting a term first removes every content link
//! pointing at it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::request::TermRequest;
use crate::application::services::janitor;
use crate::domain::services::slug::slugify_text;
use crate::domain::services::SlugGenerator;
use crate::domain::{ContentTransaction, EntityKind, TermFields, UnitOfWork};
use crate::infrastructure::database::finish;
use crate::infrastructure::metrics;
use crate::shared::error::ContentError;

/// Taxonomy service trait
#[async_trait]
pub trait TaxonomyService: Send + Sync {
    /// Create a tag or category, returning its id
    async fn create_term(&self, kind: EntityKind, request: TermRequest) -> Result<i64, ContentError>;

    /// Delete a tag or category and unlink it from all content
    async fn delete_term(&self, kind: EntityKind, id: i64) -> Result<bool, ContentError>;
}

/// TaxonomyService implementation
pub struct TaxonomyServiceImpl<U>
where
    U: UnitOfWork,
{
    uow: U,
    slugs: Arc<dyn SlugGenerator>,
}

impl<U> TaxonomyServiceImpl<U>
where
    U: UnitOfWork,
{
    pub fn new(uow: U, slugs: Arc<dyn SlugGenerator>) -> Self {
        Self { uow, slugs }
    }
}

fn term_kind(kind: EntityKind) -> Result<EntityKind, ContentError> {
    if kind.is_content() {
        return Err(ContentError::Infrastructure(format!(
            "{} is not a taxonomy kind",
            kind
        )));
    }
    Ok(kind)
}

#[async_trait]
impl<U> TaxonomyService for TaxonomyServiceImpl<U>
where
    U: UnitOfWork + 'static,
{
    #[tracing::instrument(skip(self, request))]
    async fn create_term(&self, kind: EntityKind, request: TermRequest) -> Result<i64, ContentError> {
        let kind = term_kind(kind)?;
        let slug = match request.slug {
            Some(slug) => slugify_text(&slug),
            None => self.slugs.slugify(&request.name, &request.locale),
        };
        let fields = TermFields {
            locale: request.locale,
            name: request.name,
            slug,
        };

        let mut tx = self.uow.begin().await?;
        let outcome = tx.insert_term(kind, &fields).await;
        let result = finish(tx, outcome).await;

        metrics::record_operation(
            kind.as_str(),
            "create",
            result.as_ref().map_or_else(|e| e.label(), |_| "ok"),
        );
        result
    }

    #[tracing::instrument(skip(self))]
    async fn delete_term(&self, kind: EntityKind, id: i64) -> Result<bool, ContentError> {
        let kind = term_kind(kind)?;

        let mut tx = self.uow.begin().await?;
        let outcome = janitor::delete_entity(&mut tx, kind, id).await;
        let result = finish(tx, outcome).await;

        metrics::record_operation(
            kind.as_str(),
            "delete",
            result.as_ref().map_or_else(|e| e.label(), |_| "ok"),
        );
        result
    }
}
