//! Image Propagator
//!
//! Copies the hero and OG asset references of a row onto every other row of
//! its `slug_group` with a single bulk update.

use crate::domain::{ContentTransaction, EntityKind};
use crate::shared::error::ContentError;

/// Propagate the media of `(kind, source_id)` to its siblings.
///
/// Returns the number of siblings written. Nothing is written when the source
/// has neither reference set or the kind has no locale grouping.
pub async fn propagate_images<X>(
    tx: &mut X,
    kind: EntityKind,
    source_id: i64,
) -> Result<u64, ContentError>
where
    X: ContentTransaction,
{
    let source = tx
        .find_entity(kind, source_id)
        .await?
        .ok_or_else(|| ContentError::NotFound(format!("{} {}", kind, source_id)))?;

    let Some(slug_group) = source.slug_group() else {
        return Ok(0);
    };
    if source.fields.media.is_empty() {
        tracing::debug!(source_id, "Source has no media, nothing to propagate");
        return Ok(0);
    }

    tx.update_group_media(kind, slug_group, source.fields.media, source.id)
        .await
}
