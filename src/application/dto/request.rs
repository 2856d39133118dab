//! Request DTOs
//!
//! Data structures for API request bodies. Nested collections are
//! [`NestedField`]s: a missing key leaves the stored rows alone, `[]` clears
//! them and a non-empty array replaces them.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::application::services::SyncMode;
use crate::domain::{ContentStatus, Deliverable, Faq, MediaRefs, NestedField, ProcessStep};

/// Scalar fields shared by Service and Post bodies.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContentBody {
    #[validate(length(min = 2, max = 10, message = "Locale must be 2-10 characters"))]
    pub locale: String,

    /// Generated from the title when absent.
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub excerpt: Option<String>,
    pub body: Option<String>,

    #[validate(length(max = 255, message = "SEO title must be at most 255 characters"))]
    pub seo_title: Option<String>,

    #[validate(length(max = 500, message = "SEO description must be at most 500 characters"))]
    pub seo_description: Option<String>,

    #[serde(default)]
    pub status: ContentStatus,

    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub sort_order: i32,

    pub hero_asset_id: Option<i64>,
    pub og_asset_id: Option<i64>,
}

impl ContentBody {
    pub fn media(&self) -> MediaRefs {
        MediaRefs {
            hero_asset_id: self.hero_asset_id,
            og_asset_id: self.og_asset_id,
        }
    }
}

/// Create or replace a Service
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServiceRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub content: ContentBody,

    /// New groups get a generated id; updates keep the stored group when absent.
    #[validate(length(min = 1, max = 255, message = "Slug group must be 1-255 characters"))]
    pub slug_group: Option<String>,

    #[serde(default)]
    pub tags: NestedField<i64>,
    #[serde(default)]
    pub categories: NestedField<i64>,
    #[serde(default)]
    pub deliverables: NestedField<Deliverable>,
    #[serde(default)]
    pub process_steps: NestedField<ProcessStep>,
    #[serde(default)]
    pub faqs: NestedField<Faq>,
    #[serde(default)]
    pub related_services: NestedField<i64>,
    #[serde(default)]
    pub related_posts: NestedField<i64>,
}

/// Create or replace a Post
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub content: ContentBody,

    #[serde(default)]
    pub tags: NestedField<i64>,
    #[serde(default)]
    pub categories: NestedField<i64>,
    #[serde(default)]
    pub related_posts: NestedField<i64>,
    #[serde(default)]
    pub related_services: NestedField<i64>,
}

/// Locale sync request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SyncLocaleRequest {
    #[validate(length(min = 2, max = 10, message = "Locale must be 2-10 characters"))]
    pub locale: String,

    #[serde(default)]
    pub mode: SyncMode,
}

/// Create tag or category request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TermRequest {
    #[validate(length(min = 2, max = 10, message = "Locale must be 2-10 characters"))]
    pub locale: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 120, message = "Slug must be 1-120 characters"))]
    pub slug: Option<String>,
}
