//! Entity Writer
//!
//! Inserts or updates the parent row of a content entity and replaces every
//! nested collection present in the write. Collections that were not sent are
//! not in the write at all and keep their stored rows.

use crate::application::services::collection_replacer::replace_collection;
use crate::domain::{ChildRows, Collection, ContentFields, ContentTransaction, EntityKind};
use crate::shared::error::ContentError;

/// Whether a write creates a new row or overwrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Create,
    Update(i64),
}

/// Everything the writer needs to persist one entity.
#[derive(Debug, Clone)]
pub struct EntityWrite {
    pub kind: EntityKind,
    pub fields: ContentFields,
    /// Collections to replace, in the order they are written. An empty row
    /// list clears the collection.
    pub nested: Vec<(Collection, ChildRows)>,
    pub actor: Option<i64>,
}

impl EntityWrite {
    fn check(&self) -> Result<(), ContentError> {
        if !self.kind.is_content() {
            return Err(ContentError::Infrastructure(format!(
                "{} rows are not written by the entity writer",
                self.kind
            )));
        }
        if let Some((collection, _)) = self
            .nested
            .iter()
            .find(|(collection, _)| collection.relation().owner != self.kind)
        {
            return Err(ContentError::Infrastructure(format!(
                "{:?} is not a collection of {}",
                collection, self.kind
            )));
        }
        Ok(())
    }
}

/// Write the parent row and its nested collections inside `tx`.
///
/// Returns the id of the written row. Updating an id that does not exist
/// fails with `NotFound` before any collection is touched.
pub async fn write_entity<X>(
    tx: &mut X,
    target: WriteTarget,
    write: &EntityWrite,
) -> Result<i64, ContentError>
where
    X: ContentTransaction,
{
    write.check()?;

    let id = match target {
        WriteTarget::Create => {
            tx.insert_entity(write.kind, &write.fields, write.actor)
                .await?
        }
        WriteTarget::Update(id) => {
            let affected = tx
                .update_entity(write.kind, id, &write.fields, write.actor)
                .await?;
            if affected == 0 {
                return Err(ContentError::NotFound(format!("{} {}", write.kind, id)));
            }
            id
        }
    };

    for (collection, rows) in &write.nested {
        replace_collection(tx, id, *collection, rows).await?;
    }

    Ok(id)
}
