//! In-Memory Content Store
//!
//! Implements the unit-of-work and transaction ports without a database.
//! A transaction works on a snapshot of the whole store; commit swaps the
//! snapshot in and rollback or drop discards it. Transactions are serialized:
//! `begin` waits until the previous transaction has finished, so every
//! snapshot starts from the latest committed state. Ids come from one
//! store-wide sequence and, as with a Postgres sequence, are never handed out
//! twice, even when the transaction that drew them rolls back.
//!
//! The store enforces the same unique keys and non-cascading foreign keys as
//! `migrations/`, reporting violations with the constraint names PostgreSQL
//! would use, so atomicity and delete ordering behave as they do against the
//! real schema.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{Mutex as WriterLock, OwnedMutexGuard};

use crate::domain::{
    ChildRow, ChildRows, ContentEntity, ContentFields, ContentTransaction, Deliverable,
    EntityKind, Faq, MediaRefs, ProcessStep, Relation, RowShape, TaxonomyTerm, TermFields,
    UnitOfWork, RELATIONS,
};
use crate::shared::error::ContentError;

#[derive(Debug, Clone)]
enum StoredPayload {
    Link,
    Deliverable(Deliverable),
    ProcessStep(ProcessStep),
    Faq(Faq),
}

#[derive(Debug, Clone)]
struct StoredChild {
    row_id: i64,
    owner_id: i64,
    target_id: Option<i64>,
    sort_order: Option<i32>,
    payload: StoredPayload,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    entities: BTreeMap<(EntityKind, i64), ContentEntity>,
    terms: BTreeMap<(EntityKind, i64), TaxonomyTerm>,
    children: HashMap<&'static str, Vec<StoredChild>>,
}

impl StoreState {
    fn row_exists(&self, kind: EntityKind, id: i64) -> bool {
        if kind.is_content() {
            self.entities.contains_key(&(kind, id))
        } else {
            self.terms.contains_key(&(kind, id))
        }
    }

    fn check_content_keys(
        &self,
        kind: EntityKind,
        fields: &ContentFields,
        excluding: Option<i64>,
    ) -> Result<(), ContentError> {
        let others = self
            .entities
            .values()
            .filter(|e| e.kind == kind && Some(e.id) != excluding);

        for other in others {
            if other.fields.locale == fields.locale && other.fields.slug == fields.slug {
                return Err(ContentError::unique(format!("{}_locale_slug_key", kind.table())));
            }
            if kind.has_slug_group()
                && other.fields.locale == fields.locale
                && other.fields.slug_group == fields.slug_group
            {
                return Err(ContentError::unique(format!(
                    "{}_slug_group_locale_key",
                    kind.table()
                )));
            }
        }

        if kind.has_slug_group() && fields.slug_group.is_none() {
            return Err(ContentError::Infrastructure(
                "null value in column \"slug_group\"".into(),
            ));
        }

        Ok(())
    }

    /// First foreign key that still references the row, if any.
    fn referencing_constraint(&self, kind: EntityKind, id: i64) -> Option<String> {
        RELATIONS.iter().find_map(|relation| {
            let rows = self.children.get(relation.table)?;
            if relation.owner == kind && rows.iter().any(|r| r.owner_id == id) {
                return Some(format!("{}_{}_fkey", relation.table, relation.owner_column));
            }
            let target = relation.target.filter(|t| t.kind == kind)?;
            rows.iter()
                .any(|r| r.target_id == Some(id))
                .then(|| format!("{}_{}_fkey", relation.table, target.column))
        })
    }
}

fn relation_for_table(table: &str) -> Result<&'static Relation, ContentError> {
    RELATIONS
        .iter()
        .find(|relation| relation.table == table)
        .ok_or_else(|| ContentError::Infrastructure(format!("relation \"{}\" does not exist", table)))
}

/// Which stored id a column of a child table maps to.
enum ColumnRef {
    Owner,
    Target,
}

fn column_ref(relation: &Relation, column: &str) -> Result<ColumnRef, ContentError> {
    if relation.owner_column == column {
        return Ok(ColumnRef::Owner);
    }
    match relation.target {
        Some(target) if target.column == column => Ok(ColumnRef::Target),
        _ => Err(ContentError::Infrastructure(format!(
            "column \"{}\" does not exist on {}",
            column, relation.table
        ))),
    }
}

/// Shared in-memory store. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    state: Arc<Mutex<StoreState>>,
    writer: Arc<WriterLock<()>>,
    ids: Arc<AtomicI64>,
}

impl InMemoryContentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed content row, bypassing any transaction.
    pub fn entity(&self, kind: EntityKind, id: i64) -> Option<ContentEntity> {
        self.state.lock().entities.get(&(kind, id)).cloned()
    }

    /// Committed content rows of a kind, ordered by id.
    pub fn entities(&self, kind: EntityKind) -> Vec<ContentEntity> {
        self.state
            .lock()
            .entities
            .values()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of committed rows in `table` whose `column` equals `id`.
    pub fn count_rows(&self, table: &str, column: &str, id: i64) -> Result<usize, ContentError> {
        let relation = relation_for_table(table)?;
        let column = column_ref(relation, column)?;
        let state = self.state.lock();
        let Some(rows) = state.children.get(relation.table) else {
            return Ok(0);
        };
        Ok(rows
            .iter()
            .filter(|r| match column {
                ColumnRef::Owner => r.owner_id == id,
                ColumnRef::Target => r.target_id == Some(id),
            })
            .count())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryContentStore {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, ContentError> {
        let writer = Arc::clone(&self.writer).lock_owned().await;
        let working = self.state.lock().clone();
        Ok(InMemoryTransaction {
            store: Arc::clone(&self.state),
            ids: Arc::clone(&self.ids),
            working,
            _writer: writer,
        })
    }
}

/// Snapshot transaction over an [`InMemoryContentStore`].
///
/// Holds the store's writer lock until it is committed, rolled back or dropped.
pub struct InMemoryTransaction {
    store: Arc<Mutex<StoreState>>,
    ids: Arc<AtomicI64>,
    working: StoreState,
    _writer: OwnedMutexGuard<()>,
}

impl InMemoryTransaction {
    fn next_id(&self) -> i64 {
        self.ids.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl ContentTransaction for InMemoryTransaction {
    async fn insert_entity(
        &mut self,
        kind: EntityKind,
        fields: &ContentFields,
        actor: Option<i64>,
    ) -> Result<i64, ContentError> {
        if !kind.is_content() {
            return Err(ContentError::Infrastructure(format!("{} rows have no content columns", kind)));
        }
        self.working.check_content_keys(kind, fields, None)?;

        let id = self.next_id();
        let now = Utc::now();
        let mut fields = fields.clone();
        if !kind.has_slug_group() {
            fields.slug_group = None;
        }

        self.working.entities.insert(
            (kind, id),
            ContentEntity {
                id,
                kind,
                fields,
                created_by: actor,
                updated_by: actor,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update_entity(
        &mut self,
        kind: EntityKind,
        id: i64,
        fields: &ContentFields,
        actor: Option<i64>,
    ) -> Result<u64, ContentError> {
        let Some(existing) = self.working.entities.get(&(kind, id)) else {
            return Ok(0);
        };

        let mut fields = fields.clone();
        if !kind.has_slug_group() {
            fields.slug_group = None;
        } else if fields.slug_group.is_none() {
            fields.slug_group = existing.fields.slug_group.clone();
        }
        self.working.check_content_keys(kind, &fields, Some(id))?;

        let Some(entity) = self.working.entities.get_mut(&(kind, id)) else {
            return Ok(0);
        };
        entity.fields = fields;
        entity.updated_by = actor;
        entity.updated_at = Utc::now();
        Ok(1)
    }

    async fn find_entity(
        &mut self,
        kind: EntityKind,
        id: i64,
    ) -> Result<Option<ContentEntity>, ContentError> {
        Ok(self.working.entities.get(&(kind, id)).cloned())
    }

    async fn find_by_slug_group(
        &mut self,
        kind: EntityKind,
        slug_group: &str,
    ) -> Result<Vec<ContentEntity>, ContentError> {
        Ok(self
            .working
            .entities
            .values()
            .filter(|e| e.kind == kind && e.slug_group() == Some(slug_group))
            .cloned()
            .collect())
    }

    async fn slug_taken(
        &mut self,
        kind: EntityKind,
        locale: &str,
        slug: &str,
        excluding: Option<i64>,
    ) -> Result<bool, ContentError> {
        Ok(self.working.entities.values().any(|e| {
            e.kind == kind
                && Some(e.id) != excluding
                && e.fields.locale == locale
                && e.fields.slug == slug
        }))
    }

    async fn update_group_media(
        &mut self,
        kind: EntityKind,
        slug_group: &str,
        media: MediaRefs,
        excluding: i64,
    ) -> Result<u64, ContentError> {
        let mut updated = 0;
        for entity in self.working.entities.values_mut() {
            if entity.kind == kind && entity.id != excluding && entity.slug_group() == Some(slug_group) {
                entity.fields.media = media;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_rows(
        &mut self,
        table: &'static str,
        column: &'static str,
        id: i64,
    ) -> Result<u64, ContentError> {
        let relation = relation_for_table(table)?;
        let column = column_ref(relation, column)?;
        let Some(rows) = self.working.children.get_mut(relation.table) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|r| match column {
            ColumnRef::Owner => r.owner_id != id,
            ColumnRef::Target => r.target_id != Some(id),
        });
        Ok((before - rows.len()) as u64)
    }

    async fn insert_child(
        &mut self,
        relation: &'static Relation,
        parent_id: i64,
        sort_order: Option<i32>,
        row: ChildRow<'_>,
    ) -> Result<(), ContentError> {
        if !self.working.row_exists(relation.owner, parent_id) {
            return Err(ContentError::foreign_key(format!(
                "{}_{}_fkey",
                relation.table, relation.owner_column
            )));
        }

        let (target_id, payload) = match (row, relation.target) {
            (ChildRow::Link(target_id), Some(target)) => {
                if !self.working.row_exists(target.kind, target_id) {
                    return Err(ContentError::foreign_key(format!(
                        "{}_{}_fkey",
                        relation.table, target.column
                    )));
                }
                let duplicate = self
                    .working
                    .children
                    .get(relation.table)
                    .is_some_and(|rows| {
                        rows.iter()
                            .any(|r| r.owner_id == parent_id && r.target_id == Some(target_id))
                    });
                if duplicate {
                    return Err(ContentError::unique(format!("{}_pkey", relation.table)));
                }
                (Some(target_id), StoredPayload::Link)
            }
            (ChildRow::Deliverable(d), None) if relation.shape == RowShape::Deliverable => {
                (None, StoredPayload::Deliverable(d.clone()))
            }
            (ChildRow::ProcessStep(s), None) if relation.shape == RowShape::ProcessStep => {
                (None, StoredPayload::ProcessStep(s.clone()))
            }
            (ChildRow::Faq(f), None) if relation.shape == RowShape::Faq => {
                (None, StoredPayload::Faq(f.clone()))
            }
            _ => {
                return Err(ContentError::Infrastructure(format!(
                    "row does not match the shape of {}",
                    relation.table
                )))
            }
        };

        let row_id = self.next_id();
        self.working
            .children
            .entry(relation.table)
            .or_default()
            .push(StoredChild {
                row_id,
                owner_id: parent_id,
                target_id,
                sort_order: if relation.ordered { sort_order } else { None },
                payload,
            });
        Ok(())
    }

    async fn load_children(
        &mut self,
        relation: &'static Relation,
        parent_id: i64,
    ) -> Result<ChildRows, ContentError> {
        let mut rows: Vec<&StoredChild> = self
            .working
            .children
            .get(relation.table)
            .map(|rows| rows.iter().filter(|r| r.owner_id == parent_id).collect())
            .unwrap_or_default();

        if relation.ordered {
            rows.sort_by_key(|r| (r.sort_order.unwrap_or_default(), r.row_id));
        } else {
            rows.sort_by_key(|r| (r.target_id, r.row_id));
        }

        let mut loaded = ChildRows::empty(relation.shape);
        for row in rows {
            match (&mut loaded, &row.payload) {
                (ChildRows::Links(ids), StoredPayload::Link) => {
                    ids.extend(row.target_id);
                }
                (ChildRows::Deliverables(list), StoredPayload::Deliverable(d)) => {
                    list.push(d.clone())
                }
                (ChildRows::ProcessSteps(list), StoredPayload::ProcessStep(s)) => {
                    list.push(s.clone())
                }
                (ChildRows::Faqs(list), StoredPayload::Faq(f)) => list.push(f.clone()),
                _ => {
                    return Err(ContentError::Infrastructure(format!(
                        "corrupt row in {}",
                        relation.table
                    )))
                }
            }
        }
        Ok(loaded)
    }

    async fn delete_entity(&mut self, kind: EntityKind, id: i64) -> Result<u64, ContentError> {
        if !self.working.row_exists(kind, id) {
            return Ok(0);
        }
        if let Some(constraint) = self.working.referencing_constraint(kind, id) {
            return Err(ContentError::foreign_key(constraint));
        }

        if kind.is_content() {
            self.working.entities.remove(&(kind, id));
        } else {
            self.working.terms.remove(&(kind, id));
        }
        Ok(1)
    }

    async fn insert_term(
        &mut self,
        kind: EntityKind,
        fields: &TermFields,
    ) -> Result<i64, ContentError> {
        if kind.is_content() {
            return Err(ContentError::Infrastructure(format!("{} is not a taxonomy kind", kind)));
        }
        let clash = self
            .working
            .terms
            .values()
            .any(|t| t.kind == kind && t.fields.locale == fields.locale && t.fields.slug == fields.slug);
        if clash {
            return Err(ContentError::unique(format!("{}_locale_slug_key", kind.table())));
        }

        let id = self.next_id();
        self.working.terms.insert(
            (kind, id),
            TaxonomyTerm {
                id,
                kind,
                fields: fields.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn commit(self) -> Result<(), ContentError> {
        *self.store.lock() = self.working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), ContentError> {
        Ok(())
    }
}
