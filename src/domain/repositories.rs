//! Storage ports of the content write engine.
//!
//! A [`UnitOfWork`] hands out one [`ContentTransaction`] per public operation.
//! Every statement of that operation goes through the transaction, which is
//! then committed or rolled back as a whole. Dropping a transaction without
//! committing discards its writes.

use async_trait::async_trait;

use crate::domain::entities::{
    ChildRow, ChildRows, ContentEntity, ContentFields, EntityKind, MediaRefs, TermFields,
};
use crate::domain::value_objects::Relation;
use crate::shared::error::ContentError;

/// Provider of transactions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Tx: ContentTransaction;

    /// Acquire a connection and open a transaction on it.
    async fn begin(&self) -> Result<Self::Tx, ContentError>;
}

/// Statement-level access to the content schema inside one transaction.
///
/// Row-count returning methods report affected rows so callers can detect
/// absent ids without relying on errors.
#[async_trait]
pub trait ContentTransaction: Send {
    /// Insert a content row and return its generated id.
    async fn insert_entity(
        &mut self,
        kind: EntityKind,
        fields: &ContentFields,
        actor: Option<i64>,
    ) -> Result<i64, ContentError>;

    /// Overwrite every scalar column of a content row.
    async fn update_entity(
        &mut self,
        kind: EntityKind,
        id: i64,
        fields: &ContentFields,
        actor: Option<i64>,
    ) -> Result<u64, ContentError>;

    async fn find_entity(
        &mut self,
        kind: EntityKind,
        id: i64,
    ) -> Result<Option<ContentEntity>, ContentError>;

    /// All rows of `kind` sharing `slug_group`, ordered by id.
    async fn find_by_slug_group(
        &mut self,
        kind: EntityKind,
        slug_group: &str,
    ) -> Result<Vec<ContentEntity>, ContentError>;

    /// Whether `(locale, slug)` is used by a row other than `excluding`.
    async fn slug_taken(
        &mut self,
        kind: EntityKind,
        locale: &str,
        slug: &str,
        excluding: Option<i64>,
    ) -> Result<bool, ContentError>;

    /// Write both media references onto every row of the group except
    /// `excluding`.
    async fn update_group_media(
        &mut self,
        kind: EntityKind,
        slug_group: &str,
        media: MediaRefs,
        excluding: i64,
    ) -> Result<u64, ContentError>;

    /// `DELETE FROM {table} WHERE {column} = id`.
    async fn delete_rows(
        &mut self,
        table: &'static str,
        column: &'static str,
        id: i64,
    ) -> Result<u64, ContentError>;

    /// Insert one child row. `sort_order` is `Some` only on ordered tables.
    async fn insert_child(
        &mut self,
        relation: &'static Relation,
        parent_id: i64,
        sort_order: Option<i32>,
        row: ChildRow<'_>,
    ) -> Result<(), ContentError>;

    /// Current rows of one collection in stored order.
    async fn load_children(
        &mut self,
        relation: &'static Relation,
        parent_id: i64,
    ) -> Result<ChildRows, ContentError>;

    /// Delete the row of `kind` with this id.
    async fn delete_entity(&mut self, kind: EntityKind, id: i64) -> Result<u64, ContentError>;

    /// Insert a tag or category and return its generated id.
    async fn insert_term(
        &mut self,
        kind: EntityKind,
        fields: &TermFields,
    ) -> Result<i64, ContentError>;

    async fn commit(self) -> Result<(), ContentError>;

    async fn rollback(self) -> Result<(), ContentError>;
}
