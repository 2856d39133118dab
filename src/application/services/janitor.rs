//! Dependent-Row Janitor
//!
//! The schema declares no cascading foreign keys, so every row referencing a
//! parent must be removed before the parent itself. The steps come from
//! [`delete_plan`], which is derived from the relationship table.

use crate::domain::{delete_plan, ContentTransaction, EntityKind};
use crate::shared::error::ContentError;

/// Remove every row in other tables that references `(kind, id)`.
///
/// Must run in the same transaction as the parent delete.
pub async fn prepare_delete<X>(tx: &mut X, kind: EntityKind, id: i64) -> Result<u64, ContentError>
where
    X: ContentTransaction,
{
    let mut removed = 0;
    for step in delete_plan(kind) {
        let rows = tx.delete_rows(step.table, step.column, id).await?;
        if rows > 0 {
            tracing::debug!(table = step.table, column = step.column, rows, "Removed dependent rows");
        }
        removed += rows;
    }
    Ok(removed)
}

/// Clear the dependents of `(kind, id)` and delete the row.
///
/// Returns `false` when no such row existed.
pub async fn delete_entity<X>(tx: &mut X, kind: EntityKind, id: i64) -> Result<bool, ContentError>
where
    X: ContentTransaction,
{
    let dependents = prepare_delete(tx, kind, id).await?;
    let deleted = tx.delete_entity(kind, id).await?;

    tracing::debug!(%kind, id, dependents, deleted, "Deleted entity");
    Ok(deleted > 0)
}
