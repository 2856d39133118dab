//! Relationship table of the content schema.
//!
//! Every child or join table that hangs off a content entity is declared
//! exactly once in [`RELATIONS`]. The collection replacer reads table and
//! column names from here, and the delete plan used before removing a parent
//! row is derived from the same list, so the cleanup order cannot drift from
//! the schema.

use serde::{Deserialize, Serialize};

use crate::domain::entities::EntityKind;

/// Shape of the rows stored in a child table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowShape {
    /// `(owner_id, target_id[, sort_order])`
    Link,
    Deliverable,
    ProcessStep,
    Faq,
}

/// A named nested collection of a content entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    ServiceTags,
    ServiceCategories,
    ServiceDeliverables,
    ServiceProcessSteps,
    ServiceFaqs,
    RelatedServices,
    ServiceRelatedPosts,
    PostTags,
    PostCategories,
    RelatedPosts,
    PostRelatedServices,
}

impl Collection {
    pub fn relation(self) -> &'static Relation {
        RELATIONS
            .iter()
            .find(|relation| relation.collection == self)
            .unwrap_or_else(|| unreachable!("every collection is declared in RELATIONS"))
    }

    /// Collections owned by rows of `kind`, in declaration order.
    pub fn owned_by(kind: EntityKind) -> impl Iterator<Item = Collection> {
        RELATIONS
            .iter()
            .filter(move |relation| relation.owner == kind)
            .map(|relation| relation.collection)
    }
}

/// The referenced side of a link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget {
    pub kind: EntityKind,
    pub column: &'static str,
}

/// One child or join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub collection: Collection,
    pub table: &'static str,
    pub owner: EntityKind,
    pub owner_column: &'static str,
    /// Present for link tables, absent for owned-child tables.
    pub target: Option<LinkTarget>,
    pub shape: RowShape,
    /// Whether the table stores an explicit `sort_order`.
    pub ordered: bool,
}

impl Relation {
    /// Whether the table links a kind to itself (`related_*`).
    pub fn is_self_referencing(&self) -> bool {
        self.target.is_some_and(|target| target.kind == self.owner)
    }
}

const fn link(
    collection: Collection,
    table: &'static str,
    owner: EntityKind,
    owner_column: &'static str,
    target_kind: EntityKind,
    target_column: &'static str,
    ordered: bool,
) -> Relation {
    Relation {
        collection,
        table,
        owner,
        owner_column,
        target: Some(LinkTarget {
            kind: target_kind,
            column: target_column,
        }),
        shape: RowShape::Link,
        ordered,
    }
}

const fn owned(
    collection: Collection,
    table: &'static str,
    shape: RowShape,
) -> Relation {
    Relation {
        collection,
        table,
        owner: EntityKind::Service,
        owner_column: "service_id",
        target: None,
        shape,
        ordered: true,
    }
}

/// Every child and join table of the schema. Keep in lock-step with
/// `migrations/`.
pub static RELATIONS: [Relation; 11] = [
    link(Collection::ServiceTags, "service_tags", EntityKind::Service, "service_id", EntityKind::Tag, "tag_id", false),
    link(Collection::ServiceCategories, "service_categories", EntityKind::Service, "service_id", EntityKind::Category, "category_id", false),
    owned(Collection::ServiceDeliverables, "service_deliverables", RowShape::Deliverable),
    owned(Collection::ServiceProcessSteps, "service_process_steps", RowShape::ProcessStep),
    owned(Collection::ServiceFaqs, "service_faqs", RowShape::Faq),
    link(Collection::RelatedServices, "service_related_services", EntityKind::Service, "service_id", EntityKind::Service, "related_service_id", true),
    link(Collection::ServiceRelatedPosts, "service_related_posts", EntityKind::Service, "service_id", EntityKind::Post, "post_id", true),
    link(Collection::PostTags, "post_tags", EntityKind::Post, "post_id", EntityKind::Tag, "tag_id", false),
    link(Collection::PostCategories, "post_categories", EntityKind::Post, "post_id", EntityKind::Category, "category_id", false),
    link(Collection::RelatedPosts, "post_related_posts", EntityKind::Post, "post_id", EntityKind::Post, "related_post_id", true),
    link(Collection::PostRelatedServices, "post_related_services", EntityKind::Post, "post_id", EntityKind::Service, "service_id", true),
];

/// Cleanup stage, in the order the stages run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CleanupStage {
    /// Rows owned by another kind that point at the entity.
    CrossEntity,
    /// Self-referencing rows, on either column.
    SelfReference,
    /// Owned-child rows of the entity.
    OwnedChildren,
    /// Link rows owned by the entity.
    Links,
}

/// One `DELETE FROM {table} WHERE {column} = $1` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cleanup {
    pub stage: CleanupStage,
    pub table: &'static str,
    pub column: &'static str,
}

/// Ordered list of deletes that clear every reference to a `kind` row.
pub fn delete_plan(kind: EntityKind) -> Vec<Cleanup> {
    let mut plan = Vec::new();

    for relation in RELATIONS.iter() {
        match relation.target {
            Some(target) if relation.owner == kind && target.kind == kind => {
                plan.push(Cleanup {
                    stage: CleanupStage::SelfReference,
                    table: relation.table,
                    column: relation.owner_column,
                });
                plan.push(Cleanup {
                    stage: CleanupStage::SelfReference,
                    table: relation.table,
                    column: target.column,
                });
            }
            Some(target) if target.kind == kind => plan.push(Cleanup {
                stage: CleanupStage::CrossEntity,
                table: relation.table,
                column: target.column,
            }),
            Some(_) if relation.owner == kind => plan.push(Cleanup {
                stage: CleanupStage::Links,
                table: relation.table,
                column: relation.owner_column,
            }),
            None if relation.owner == kind => plan.push(Cleanup {
                stage: CleanupStage::OwnedChildren,
                table: relation.table,
                column: relation.owner_column,
            }),
            _ => {}
        }
    }

    // Stable: declaration order is kept within a stage.
    plan.sort_by_key(|cleanup| cleanup.stage);
    plan
}
