//! # Domain Services
//!
//! Collaborators the write engine depends on but does not implement itself.
//!
//! - **SlugGenerator**: title + locale to URL slug
//! - **Translator**: field translation between locales

pub mod slug;
pub mod translation;

pub use slug::{DefaultSlugGenerator, SlugGenerator};
pub use translation::{TranslationError, Translator};
