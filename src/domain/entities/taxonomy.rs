//! Taxonomy term entity (Tag | Category).
//!
//! Maps to the `tags` and `categories` tables:
//! - id: BIGSERIAL PRIMARY KEY
//! - locale: VARCHAR(10) NOT NULL
//! - name: VARCHAR(100) NOT NULL
//! - slug: VARCHAR(120) NOT NULL, UNIQUE (locale, slug)
//! - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityKind;

/// Scalar columns of a new taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFields {
    pub locale: String,
    pub name: String,
    pub slug: String,
}

/// A stored tag or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTerm {
    pub id: i64,
    pub kind: EntityKind,
    pub fields: TermFields,
    pub created_at: DateTime<Utc>,
}
