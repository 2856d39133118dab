//! Unit of Work Pattern Implementation
//!
//! Provides transactional boundaries for content operations.
//! Every public write runs inside exactly one transaction that is committed
//! only when all of its statements succeeded.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use super::content_transaction::PgContentTransaction;
use crate::domain::{ContentTransaction, UnitOfWork};
use crate::infrastructure::metrics;
use crate::shared::error::ContentError;

/// PostgreSQL Unit of Work implementation.
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: Arc<PgPool>,
}

impl PgUnitOfWork {
    /// Create a new Unit of Work instance.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create from a PgPool directly.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    type Tx = PgContentTransaction;

    async fn begin(&self) -> Result<PgContentTransaction, ContentError> {
        let tx = self.pool.begin().await?;
        Ok(PgContentTransaction::new(tx))
    }
}

/// Close a transaction according to the outcome of the work done in it.
///
/// Commits on `Ok` and rolls back on `Err`. A failed rollback is logged and
/// the original error is returned; the store discards the transaction when
/// its connection goes back to the pool either way.
///
/// # Example
/// ```ignore
/// let mut tx = uow.begin().await?;
/// let outcome = write_entity(&mut tx, request).await;
/// let id = finish(tx, outcome).await?;
/// ```
pub async fn finish<T, X>(tx: X, outcome: Result<T, ContentError>) -> Result<T, ContentError>
where
    X: ContentTransaction,
{
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            metrics::record_rollback(e.label());
            tracing::warn!(reason = e.label(), "Rolling back unit of work");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = ?rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

/// Discard a transaction that only read, passing the read outcome through.
pub async fn read_only<T, X>(tx: X, outcome: Result<T, ContentError>) -> Result<T, ContentError>
where
    X: ContentTransaction,
{
    if let Err(rollback_err) = tx.rollback().await {
        tracing::debug!(error = ?rollback_err, "Read-only rollback failed");
    }
    outcome
}
