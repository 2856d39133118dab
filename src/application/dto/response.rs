//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{ContentDetail, SyncOutcome};
use crate::domain::{ChildRows, Collection, ContentStatus, Deliverable, Faq, ProcessStep};

/// Id of a written row
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

/// Scalar fields of a Service or Post
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub id: i64,
    pub locale: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug_group: Option<String>,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub status: ContentStatus,
    pub published_at: Option<String>,
    pub sort_order: i32,
    pub hero_asset_id: Option<i64>,
    pub og_asset_id: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ContentDetail> for ContentResponse {
    fn from(detail: &ContentDetail) -> Self {
        let entity = &detail.entity;
        let fields = &entity.fields;
        Self {
            id: entity.id,
            locale: fields.locale.clone(),
            slug: fields.slug.clone(),
            slug_group: fields.slug_group.clone(),
            title: fields.title.clone(),
            excerpt: fields.excerpt.clone(),
            body: fields.body.clone(),
            seo_title: fields.seo_title.clone(),
            seo_description: fields.seo_description.clone(),
            status: fields.status,
            published_at: fields.published_at.map(|t| t.to_rfc3339()),
            sort_order: fields.sort_order,
            hero_asset_id: fields.media.hero_asset_id,
            og_asset_id: fields.media.og_asset_id,
            created_by: entity.created_by,
            updated_by: entity.updated_by,
            created_at: entity.created_at.to_rfc3339(),
            updated_at: entity.updated_at.to_rfc3339(),
        }
    }
}

fn links(detail: &ContentDetail, collection: Collection) -> Vec<i64> {
    match detail.collection(collection) {
        Some(ChildRows::Links(ids)) => ids.clone(),
        _ => Vec::new(),
    }
}

/// Service with all of its collections
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    #[serde(flatten)]
    pub content: ContentResponse,
    pub tags: Vec<i64>,
    pub categories: Vec<i64>,
    pub deliverables: Vec<Deliverable>,
    pub process_steps: Vec<ProcessStep>,
    pub faqs: Vec<Faq>,
    pub related_services: Vec<i64>,
    pub related_posts: Vec<i64>,
}

impl From<ContentDetail> for ServiceResponse {
    fn from(detail: ContentDetail) -> Self {
        let deliverables = match detail.collection(Collection::ServiceDeliverables) {
            Some(ChildRows::Deliverables(rows)) => rows.clone(),
            _ => Vec::new(),
        };
        let process_steps = match detail.collection(Collection::ServiceProcessSteps) {
            Some(ChildRows::ProcessSteps(rows)) => rows.clone(),
            _ => Vec::new(),
        };
        let faqs = match detail.collection(Collection::ServiceFaqs) {
            Some(ChildRows::Faqs(rows)) => rows.clone(),
            _ => Vec::new(),
        };

        Self {
            content: ContentResponse::from(&detail),
            tags: links(&detail, Collection::ServiceTags),
            categories: links(&detail, Collection::ServiceCategories),
            deliverables,
            process_steps,
            faqs,
            related_services: links(&detail, Collection::RelatedServices),
            related_posts: links(&detail, Collection::ServiceRelatedPosts),
        }
    }
}

/// Post with all of its collections
#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(flatten)]
    pub content: ContentResponse,
    pub tags: Vec<i64>,
    pub categories: Vec<i64>,
    pub related_posts: Vec<i64>,
    pub related_services: Vec<i64>,
}

impl From<ContentDetail> for PostResponse {
    fn from(detail: ContentDetail) -> Self {
        Self {
            content: ContentResponse::from(&detail),
            tags: links(&detail, Collection::PostTags),
            categories: links(&detail, Collection::PostCategories),
            related_posts: links(&detail, Collection::RelatedPosts),
            related_services: links(&detail, Collection::PostRelatedServices),
        }
    }
}

/// Result of a locale sync
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub sibling_id: i64,
    pub created: bool,
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        Self {
            sibling_id: outcome.sibling_id,
            created: outcome.created,
        }
    }
}

/// Result of an image propagation
#[derive(Debug, Serialize)]
pub struct PropagateResponse {
    pub updated: u64,
}
