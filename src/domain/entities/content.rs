//! Content entity (Service | Post).
//!
//! Maps to the `services` and `posts` tables in the database schema. Both
//! tables share the same scalar columns; only `services` carries a
//! `slug_group` linking locale translations of the same item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of row the write engine can create or delete.
///
/// Services and Posts are content entities. Tags and Categories are taxonomy
/// terms that content entities link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Service,
    Post,
    Tag,
    Category,
}

impl EntityKind {
    /// Table holding rows of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Service => "services",
            Self::Post => "posts",
            Self::Tag => "tags",
            Self::Category => "categories",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Post => "post",
            Self::Tag => "tag",
            Self::Category => "category",
        }
    }

    /// Whether rows of this kind carry the full content scalar shape.
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Service | Self::Post)
    }

    /// Whether rows of this kind are linked across locales by `slug_group`.
    pub fn has_slug_group(&self) -> bool {
        matches!(self, Self::Service)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status matching the database VARCHAR constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    /// Convert from database string representation.
    pub fn from_db(s: &str) -> Self {
        match s {
            "published" => Self::Published,
            "archived" => Self::Archived,
            _ => Self::Draft,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

/// Shared media references of a content row.
///
/// Points at externally managed assets; copied by value, never owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaRefs {
    pub hero_asset_id: Option<i64>,
    pub og_asset_id: Option<i64>,
}

impl MediaRefs {
    pub fn is_empty(&self) -> bool {
        self.hero_asset_id.is_none() && self.og_asset_id.is_none()
    }
}

/// Every scalar column of a content row that a writer supplies.
///
/// Updates use PUT semantics: the whole struct is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFields {
    pub locale: String,
    pub slug: String,
    /// Ignored for kinds without translation linkage.
    pub slug_group: Option<String>,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub sort_order: i32,
    pub media: MediaRefs,
}

impl ContentFields {
    /// The human-language fields a translation pass rewrites.
    pub fn translatable(&self) -> TranslatableFields {
        TranslatableFields {
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            body: self.body.clone(),
            seo_title: self.seo_title.clone(),
            seo_description: self.seo_description.clone(),
        }
    }
}

/// Fields copied verbatim in manual sync and translated in auto sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatableFields {
    pub title: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

/// A stored Service or Post row.
///
/// Maps to the `services` / `posts` tables:
/// - id: BIGSERIAL PRIMARY KEY
/// - locale: VARCHAR(10) NOT NULL
/// - slug: VARCHAR(255) NOT NULL, UNIQUE (locale, slug)
/// - slug_group: VARCHAR(255) NOT NULL, UNIQUE (slug_group, locale) (services only)
/// - title, excerpt, body, seo_title, seo_description
/// - status: VARCHAR(20) NOT NULL DEFAULT 'draft'
/// - published_at: TIMESTAMPTZ NULL
/// - sort_order: INTEGER NOT NULL DEFAULT 0
/// - hero_asset_id, og_asset_id: BIGINT NULL
/// - created_by, updated_by: BIGINT NULL
/// - created_at, updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntity {
    pub id: i64,
    pub kind: EntityKind,
    pub fields: ContentFields,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntity {
    pub fn locale(&self) -> &str {
        &self.fields.locale
    }

    pub fn slug_group(&self) -> Option<&str> {
        self.fields.slug_group.as_deref()
    }
}
