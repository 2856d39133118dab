//! Child-Collection Replacer
//!
//! Replace-all writes of one nested collection: every stored row of the
//! parent is deleted, then the given rows are inserted in array order. Ordered
//! tables get `sort_order = index`. Running it twice with the same rows leaves
//! the same state.

use crate::domain::{ChildRows, Collection, ContentTransaction};
use crate::shared::error::ContentError;

/// Replace the rows of `collection` owned by `parent_id` with `rows`.
///
/// An empty `rows` clears the collection. Runs inside the caller's
/// transaction; any failing statement is returned as-is so the caller can
/// roll back.
pub async fn replace_collection<X>(
    tx: &mut X,
    parent_id: i64,
    collection: Collection,
    rows: &ChildRows,
) -> Result<(), ContentError>
where
    X: ContentTransaction,
{
    let relation = collection.relation();
    if rows.shape() != relation.shape {
        return Err(ContentError::Infrastructure(format!(
            "{:?} rows cannot be written to {}",
            rows.shape(),
            relation.table
        )));
    }

    let removed = tx
        .delete_rows(relation.table, relation.owner_column, parent_id)
        .await?;

    for (index, row) in rows.rows().into_iter().enumerate() {
        let sort_order = if relation.ordered {
            Some(i32::try_from(index).map_err(|_| {
                ContentError::Infrastructure(format!("too many rows for {}", relation.table))
            })?)
        } else {
            None
        };
        tx.insert_child(relation, parent_id, sort_order, row).await?;
    }

    tracing::debug!(
        table = relation.table,
        parent_id,
        removed,
        inserted = rows.len(),
        "Replaced child collection"
    );

    Ok(())
}
