//! Translation collaborator.

use async_trait::async_trait;

use crate::domain::entities::TranslatableFields;

/// Translation collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation is not configured")]
    NotConfigured,

    #[error("translation request failed: {0}")]
    Request(String),

    #[error("unexpected translation response: {0}")]
    InvalidResponse(String),
}

/// Translates the human-language fields of a content row between locales.
///
/// Only called by the locale synchronizer in auto mode, and never while a
/// transaction is open.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        fields: &TranslatableFields,
        from_locale: &str,
        to_locale: &str,
    ) -> Result<TranslatableFields, TranslationError>;
}
