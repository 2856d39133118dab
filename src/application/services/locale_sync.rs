//! Locale Synchronizer
//!
//! Creates or refreshes the sibling of a Service in another locale inside the
//! source's `slug_group`.
//!
//! The flow uses two units of work. The source is read in a short read-only
//! transaction, translation (auto mode) happens with no transaction open, and
//! the sibling is then written in its own transaction that re-reads the source
//! so it copies the latest committed state.

use serde::{Deserialize, Serialize};

use crate::application::services::entity_writer::{write_entity, EntityWrite, WriteTarget};
use crate::domain::services::slug::with_suffix;
use crate::domain::services::{SlugGenerator, Translator};
use crate::domain::{
    Collection, ContentEntity, ContentFields, ContentTransaction, EntityKind, TranslatableFields,
    UnitOfWork,
};
use crate::infrastructure::database::{finish, read_only};
use crate::shared::error::ContentError;

/// How the sibling's human-language fields are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Translate through the translation collaborator.
    Auto,
    /// Copy the source text verbatim.
    #[default]
    Manual,
}

#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub source_id: i64,
    pub target_locale: String,
    pub mode: SyncMode,
    pub actor: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub sibling_id: i64,
    /// `false` when an existing sibling was overwritten.
    pub created: bool,
}

/// Finds or creates locale siblings of Services.
pub struct LocaleSynchronizer<'a> {
    translator: &'a dyn Translator,
    slugs: &'a dyn SlugGenerator,
    slug_retry_limit: u32,
}

impl<'a> LocaleSynchronizer<'a> {
    pub fn new(
        translator: &'a dyn Translator,
        slugs: &'a dyn SlugGenerator,
        slug_retry_limit: u32,
    ) -> Self {
        Self {
            translator,
            slugs,
            slug_retry_limit,
        }
    }

    pub async fn sync<U>(&self, uow: &U, request: &SyncRequest) -> Result<SyncOutcome, ContentError>
    where
        U: UnitOfWork,
    {
        let mut tx = uow.begin().await?;
        let outcome = tx.find_entity(EntityKind::Service, request.source_id).await;
        let source = read_only(tx, outcome)
            .await?
            .ok_or(ContentError::SourceNotFound)?;
        if source.locale() == request.target_locale {
            return Err(ContentError::SameLocale);
        }

        let text = match request.mode {
            SyncMode::Manual => source.fields.translatable(),
            SyncMode::Auto => self
                .translator
                .translate(
                    &source.fields.translatable(),
                    source.locale(),
                    &request.target_locale,
                )
                .await
                .map_err(|e| ContentError::TranslationFailed(e.to_string()))?,
        };

        let mut tx = uow.begin().await?;
        let outcome = self.write_sibling(&mut tx, request, &text).await;
        let outcome = finish(tx, outcome).await?;

        tracing::info!(
            source_id = request.source_id,
            sibling_id = outcome.sibling_id,
            locale = %request.target_locale,
            created = outcome.created,
            "Synchronized locale sibling"
        );
        Ok(outcome)
    }

    async fn write_sibling<X>(
        &self,
        tx: &mut X,
        request: &SyncRequest,
        text: &TranslatableFields,
    ) -> Result<SyncOutcome, ContentError>
    where
        X: ContentTransaction,
    {
        let source = tx
            .find_entity(EntityKind::Service, request.source_id)
            .await?
            .ok_or(ContentError::SourceNotFound)?;
        if source.locale() == request.target_locale {
            return Err(ContentError::SameLocale);
        }
        let slug_group = source
            .slug_group()
            .ok_or_else(|| {
                ContentError::Infrastructure(format!("service {} has no slug_group", source.id))
            })?
            .to_string();

        let existing = tx
            .find_by_slug_group(EntityKind::Service, &slug_group)
            .await?
            .into_iter()
            .find(|sibling| sibling.locale() == request.target_locale)
            .map(|sibling| sibling.id);

        let slug = self
            .free_slug(tx, &text.title, &request.target_locale, existing)
            .await?;

        let mut nested = Vec::new();
        for collection in Collection::owned_by(EntityKind::Service) {
            let rows = tx
                .load_children(collection.relation(), source.id)
                .await?;
            nested.push((collection, rows));
        }

        let write = EntityWrite {
            kind: EntityKind::Service,
            fields: sibling_fields(&source, &request.target_locale, slug, slug_group, text),
            nested,
            actor: request.actor,
        };
        let target = existing.map_or(WriteTarget::Create, WriteTarget::Update);
        let sibling_id = write_entity(tx, target, &write).await?;

        Ok(SyncOutcome {
            sibling_id,
            created: existing.is_none(),
        })
    }

    /// Slug for the sibling, suffixed `-2`, `-3`, ... while taken by another row.
    async fn free_slug<X>(
        &self,
        tx: &mut X,
        title: &str,
        locale: &str,
        sibling: Option<i64>,
    ) -> Result<String, ContentError>
    where
        X: ContentTransaction,
    {
        let base = self.slugs.slugify(title, locale);

        for attempt in 0..=self.slug_retry_limit {
            let candidate = match attempt {
                0 => base.clone(),
                n => with_suffix(&base, n + 1),
            };
            if !tx
                .slug_taken(EntityKind::Service, locale, &candidate, sibling)
                .await?
            {
                return Ok(candidate);
            }
        }

        tracing::warn!(slug = %base, locale, "No free slug for locale sibling");
        Err(ContentError::unique("services_locale_slug_key"))
    }
}

fn sibling_fields(
    source: &ContentEntity,
    locale: &str,
    slug: String,
    slug_group: String,
    text: &TranslatableFields,
) -> ContentFields {
    ContentFields {
        locale: locale.to_string(),
        slug,
        slug_group: Some(slug_group),
        title: text.title.clone(),
        excerpt: text.excerpt.clone(),
        body: text.body.clone(),
        seo_title: text.seo_title.clone(),
        seo_description: text.seo_description.clone(),
        status: source.fields.status,
        published_at: source.fields.published_at,
        sort_order: source.fields.sort_order,
        media: source.fields.media,
    }
}
