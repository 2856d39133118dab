//! # Domain Entities
//!
//! - **ContentEntity**: a Service or Post row with its scalar fields
//! - **TaxonomyTerm**: a Tag or Category row
//! - **NestedField / ChildRows**: payload and stored form of child collections

mod content;
mod nested;
mod taxonomy;

pub use content::{
    ContentEntity, ContentFields, ContentStatus, EntityKind, MediaRefs, TranslatableFields,
};
pub use nested::{ChildRow, ChildRows, Deliverable, Faq, NestedField, ProcessStep};
pub use taxonomy::{TaxonomyTerm, TermFields};
